use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::{
    AppState,
    routes::admin::Admin,
    utils::{error_codes, error_to_api_response},
};

pub const ADMIN_TOKEN_COOKIE: &str = "admin_token";
pub const ADMIN_USERNAME_COOKIE: &str = "admin_username";

/// 守卫校验通过后写入请求扩展的管理员身份。
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin_id: Uuid,
    pub username: String,
}

/// 会话凭据 cookie：httpOnly、SameSite=Strict，生存期与会话一致。
pub fn session_cookie(name: &'static str, value: String, max_age_secs: u64) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(!cfg!(debug_assertions))
        .max_age(time::Duration::seconds(max_age_secs as i64))
        .build()
}

pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ADMIN_TOKEN_COOKIE).path("/").build())
        .remove(Cookie::build(ADMIN_USERNAME_COOKIE).path("/").build())
}

/// 按当前请求携带的 cookie 解析管理员身份。
/// 两个 cookie 必须同时在场，令牌须对应服务端未过期的会话，
/// 且对应的管理员记录此刻仍处于激活状态。
pub async fn resolve_admin(
    state: &AppState,
    jar: &CookieJar,
) -> Result<Option<AdminContext>, sqlx::Error> {
    let token = match jar.get(ADMIN_TOKEN_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => return Ok(None),
    };
    let username = match jar.get(ADMIN_USERNAME_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => return Ok(None),
    };

    let session = match state.sessions.validate(&token) {
        Some(session) => session,
        None => return Ok(None),
    };
    if session.username != username {
        return Ok(None);
    }

    // 凭据库与管理员身份库可能不一致，放行前重查激活状态
    match Admin::find_active_by_username(&state.pool, &username).await? {
        Some(admin) => Ok(Some(AdminContext {
            admin_id: admin.admin_id,
            username: admin.username,
        })),
        None => {
            state.sessions.revoke(&token);
            tracing::warn!("Session revoked for {}: no active admin record", username);
            Ok(None)
        }
    }
}

pub async fn admin_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match resolve_admin(&state, &jar).await {
        Ok(Some(ctx)) => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            clear_session_cookies(jar),
            error_to_api_response::<()>(error_codes::AUTH_FAILED, "未授权访问".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Admin identity lookup failed in session guard: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "内部服务器错误".to_string(),
                ),
            )
                .into_response()
        }
    }
}
