use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repository::Collection;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dojo {
    pub dojo_id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub leader_id: Option<Uuid>,
    pub banner_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDojoRequest {
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub leader_id: Option<Uuid>,
    pub banner_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateDojoRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub leader_id: Option<Uuid>,
    pub banner_url: Option<String>,
}

impl Collection for Dojo {
    type Id = Uuid;
    type New = CreateDojoRequest;
    type Patch = UpdateDojoRequest;

    const NAME: &'static str = "dojos";
    const COLUMNS: &'static str =
        "dojo_id, name, location, description, leader_id, banner_url, created_at, updated_at";

    async fn insert(pool: &PgPool, new: &Self::New) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO dojos (name, location, description, leader_id, banner_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(&new.name)
            .bind(&new.location)
            .bind(&new.description)
            .bind(new.leader_id)
            .bind(&new.banner_url)
            .fetch_one(pool)
            .await
    }

    async fn fetch_by_id(pool: &PgPool, id: &Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM dojos WHERE dojo_id = $1", Self::COLUMNS);
        sqlx::query_as(&sql).bind(id).fetch_optional(pool).await
    }

    async fn fetch_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM dojos ORDER BY created_at DESC", Self::COLUMNS);
        sqlx::query_as(&sql).fetch_all(pool).await
    }

    async fn apply_patch(
        pool: &PgPool,
        id: &Uuid,
        patch: &Self::Patch,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE dojos
            SET name = COALESCE($2, name),
                location = COALESCE($3, location),
                description = COALESCE($4, description),
                leader_id = COALESCE($5, leader_id),
                banner_url = COALESCE($6, banner_url),
                updated_at = now()
            WHERE dojo_id = $1
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.location)
            .bind(&patch.description)
            .bind(patch.leader_id)
            .bind(&patch.banner_url)
            .fetch_optional(pool)
            .await
    }

    async fn remove(pool: &PgPool, id: &Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dojos WHERE dojo_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
