use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repository::Collection;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub article_id: Uuid,
    pub title: String,
    pub content: String,
    pub author: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content: String,
    pub published: Option<bool>,
}

/// 入库记录由 handler 组装，作者取当前登录的管理员。
#[derive(Debug)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub author: String,
    pub published: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

impl Collection for Article {
    type Id = Uuid;
    type New = NewArticle;
    type Patch = UpdateArticleRequest;

    const NAME: &'static str = "articles";
    const COLUMNS: &'static str =
        "article_id, title, content, author, published, created_at, updated_at";

    async fn insert(pool: &PgPool, new: &Self::New) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO articles (title, content, author, published)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(&new.title)
            .bind(&new.content)
            .bind(&new.author)
            .bind(new.published)
            .fetch_one(pool)
            .await
    }

    async fn fetch_by_id(pool: &PgPool, id: &Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM articles WHERE article_id = $1",
            Self::COLUMNS
        );
        sqlx::query_as(&sql).bind(id).fetch_optional(pool).await
    }

    async fn fetch_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM articles ORDER BY created_at DESC",
            Self::COLUMNS
        );
        sqlx::query_as(&sql).fetch_all(pool).await
    }

    async fn apply_patch(
        pool: &PgPool,
        id: &Uuid,
        patch: &Self::Patch,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE articles
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                published = COALESCE($4, published),
                updated_at = now()
            WHERE article_id = $1
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.content)
            .bind(patch.published)
            .fetch_optional(pool)
            .await
    }

    async fn remove(pool: &PgPool, id: &Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE article_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
