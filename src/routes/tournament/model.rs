use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repository::Collection;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tournament {
    pub tournament_id: Uuid,
    pub name: String,
    pub format: String,
    pub status: String,
    pub max_participants: i32,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub banner_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    pub format: Option<String>,
    pub max_participants: Option<i32>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub banner_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateTournamentRequest {
    pub name: Option<String>,
    pub format: Option<String>,
    pub status: Option<String>,
    pub max_participants: Option<i32>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub banner_url: Option<String>,
}

impl Collection for Tournament {
    type Id = Uuid;
    type New = CreateTournamentRequest;
    type Patch = UpdateTournamentRequest;

    const NAME: &'static str = "tournaments";
    const COLUMNS: &'static str = "tournament_id, name, format, status, max_participants, \
                                   starts_at, ends_at, banner_url, created_at, updated_at";

    async fn insert(pool: &PgPool, new: &Self::New) -> Result<Self, sqlx::Error> {
        // 新建的大赛一律从报名状态开始
        let sql = format!(
            r#"
            INSERT INTO tournaments (name, format, status, max_participants, starts_at, ends_at, banner_url)
            VALUES ($1, COALESCE($2, 'single_elimination'), 'upcoming', COALESCE($3, 16), $4, $5, $6)
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(&new.name)
            .bind(&new.format)
            .bind(new.max_participants)
            .bind(new.starts_at)
            .bind(new.ends_at)
            .bind(&new.banner_url)
            .fetch_one(pool)
            .await
    }

    async fn fetch_by_id(pool: &PgPool, id: &Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM tournaments WHERE tournament_id = $1",
            Self::COLUMNS
        );
        sqlx::query_as(&sql).bind(id).fetch_optional(pool).await
    }

    async fn fetch_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM tournaments ORDER BY starts_at DESC NULLS LAST, created_at DESC",
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
            UPDATE tournaments
            SET name = COALESCE($2, name),
                format = COALESCE($3, format),
                status = COALESCE($4, status),
                max_participants = COALESCE($5, max_participants),
                starts_at = COALESCE($6, starts_at),
                ends_at = COALESCE($7, ends_at),
                banner_url = COALESCE($8, banner_url),
                updated_at = now()
            WHERE tournament_id = $1
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.format)
            .bind(&patch.status)
            .bind(patch.max_participants)
            .bind(patch.starts_at)
            .bind(patch.ends_at)
            .bind(&patch.banner_url)
            .fetch_optional(pool)
            .await
    }

    async fn remove(pool: &PgPool, id: &Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tournaments WHERE tournament_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
