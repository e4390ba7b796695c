use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repository::Collection;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Battle {
    pub battle_id: Uuid,
    pub tournament_id: Option<Uuid>,
    pub challenger_id: Uuid,
    pub defender_id: Uuid,
    pub status: String,
    pub winner_id: Option<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBattleRequest {
    pub tournament_id: Option<Uuid>,
    pub challenger_id: Uuid,
    pub defender_id: Uuid,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateBattleRequest {
    pub tournament_id: Option<Uuid>,
    pub status: Option<String>,
    pub winner_id: Option<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Collection for Battle {
    type Id = Uuid;
    type New = CreateBattleRequest;
    type Patch = UpdateBattleRequest;

    const NAME: &'static str = "battles";
    const COLUMNS: &'static str = "battle_id, tournament_id, challenger_id, defender_id, \
                                   status, winner_id, scheduled_at, created_at, updated_at";

    async fn insert(pool: &PgPool, new: &Self::New) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO battles (tournament_id, challenger_id, defender_id, status, scheduled_at)
            VALUES ($1, $2, $3, 'scheduled', $4)
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(new.tournament_id)
            .bind(new.challenger_id)
            .bind(new.defender_id)
            .bind(new.scheduled_at)
            .fetch_one(pool)
            .await
    }

    async fn fetch_by_id(pool: &PgPool, id: &Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM battles WHERE battle_id = $1", Self::COLUMNS);
        sqlx::query_as(&sql).bind(id).fetch_optional(pool).await
    }

    async fn fetch_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM battles ORDER BY scheduled_at DESC NULLS LAST, created_at DESC",
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
            UPDATE battles
            SET tournament_id = COALESCE($2, tournament_id),
                status = COALESCE($3, status),
                winner_id = COALESCE($4, winner_id),
                scheduled_at = COALESCE($5, scheduled_at),
                updated_at = now()
            WHERE battle_id = $1
            RETURNING {}
            "#,
            Self::COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(patch.tournament_id)
            .bind(&patch.status)
            .bind(patch.winner_id)
            .bind(patch.scheduled_at)
            .fetch_optional(pool)
            .await
    }

    async fn remove(pool: &PgPool, id: &Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM battles WHERE battle_id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
