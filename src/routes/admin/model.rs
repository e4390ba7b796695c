use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::utils::verify_password;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub admin_id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub admin: AdminInfo,
}

#[derive(Debug, Serialize)]
pub struct SessionCheckResponse {
    pub authenticated: bool,
    pub admin: Option<AdminInfo>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

impl Admin {
    /// 只认激活状态的管理员记录。
    pub async fn find_active_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT admin_id, username, is_active, last_login_at
            FROM admins
            WHERE username = $1 AND is_active = true
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// 核对凭据库中的口令散列。凭据行不存在按校验失败处理，不算错误。
    pub async fn verify_credentials(
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<bool, sqlx::Error> {
        let hash: Option<String> = sqlx::query_scalar(
            r#"
            SELECT password_hash
            FROM admin_credentials
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        match hash {
            Some(hash) => verify_password(password, &hash)
                .map_err(|e| sqlx::Error::Protocol(format!("Failed to verify password: {}", e))),
            None => Ok(false),
        }
    }

    pub async fn touch_last_login(pool: &PgPool, admin_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE admins
            SET last_login_at = now()
            WHERE admin_id = $1
            "#,
        )
        .bind(admin_id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
