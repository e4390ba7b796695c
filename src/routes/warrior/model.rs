use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repository::Collection;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Warrior {
    pub warrior_id: Uuid,
    pub name: String,
    pub power_level: i32,
    pub rank: String,
    pub dojo_id: Option<Uuid>,
    pub avatar_url: Option<String>,
    pub win_count: i32,
    pub loss_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWarriorRequest {
    pub name: String,
    pub power_level: Option<i32>,
    pub rank: Option<String>,
    pub dojo_id: Option<Uuid>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateWarriorRequest {
    pub name: Option<String>,
    pub power_level: Option<i32>,
    pub rank: Option<String>,
    pub dojo_id: Option<Uuid>,
    pub avatar_url: Option<String>,
    pub win_count: Option<i32>,
    pub loss_count: Option<i32>,
}

impl Collection for Warrior {
    type Id = Uuid;
    type New = CreateWarriorRequest;
    type Patch = UpdateWarriorRequest;

    const NAME: &'static str = "warriors";
    const COLUMNS: &'static str = "warrior_id, name, power_level, rank, dojo_id, avatar_url, \
                                   win_count, loss_count, created_at, updated_at";

    async fn insert(pool: &PgPool, new: &Self::New) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO warriors (name, power_level, rank, dojo_id, avatar_url)
            VALUES ($1, COALESCE($2, 100), COALESCE($3, 'novice'), $4, $5)
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(&new.name)
            .bind(new.power_level)
            .bind(&new.rank)
            .bind(new.dojo_id)
            .bind(&new.avatar_url)
            .fetch_one(pool)
            .await
    }

    async fn fetch_by_id(pool: &PgPool, id: &Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM warriors WHERE warrior_id = $1",
            Self::COLUMNS
        );
        sqlx::query_as(&sql).bind(id).fetch_optional(pool).await
    }

    async fn fetch_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM warriors ORDER BY power_level DESC, created_at DESC",
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
            UPDATE warriors
            SET name = COALESCE($2, name),
                power_level = COALESCE($3, power_level),
                rank = COALESCE($4, rank),
                dojo_id = COALESCE($5, dojo_id),
                avatar_url = COALESCE($6, avatar_url),
                win_count = COALESCE($7, win_count),
                loss_count = COALESCE($8, loss_count),
                updated_at = now()
            WHERE warrior_id = $1
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(patch.power_level)
            .bind(&patch.rank)
            .bind(patch.dojo_id)
            .bind(&patch.avatar_url)
            .bind(patch.win_count)
            .bind(patch.loss_count)
            .fetch_optional(pool)
            .await
    }

    async fn remove(pool: &PgPool, id: &Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM warriors WHERE warrior_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
