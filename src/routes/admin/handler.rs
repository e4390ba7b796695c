use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    AppState,
    middleware::{
        ADMIN_TOKEN_COOKIE, ADMIN_USERNAME_COOKIE, clear_session_cookies, resolve_admin,
        session_cookie,
    },
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{
    Admin, AdminInfo, LoginRequest, LoginResponse, LogoutResponse, SessionCheckResponse,
};

fn invalid_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        error_to_api_response::<()>(error_codes::AUTH_FAILED, "用户名或密码错误".to_string()),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "内部服务器错误".to_string()),
    )
        .into_response()
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Response {
    // 先核对口令
    match Admin::verify_credentials(&state.pool, &req.username, &req.password).await {
        Ok(true) => {}
        Ok(false) => return invalid_credentials(),
        Err(e) => {
            // 基础设施错误不向调用方透露细节
            tracing::error!("Credential verification failed for {}: {:?}", req.username, e);
            return internal_error();
        }
    }

    // 口令正确也必须有激活的管理员记录，两库不一致时拒绝登录
    let admin = match Admin::find_active_by_username(&state.pool, &req.username).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            tracing::warn!(
                "Valid credentials but no active admin record for {}",
                req.username
            );
            return invalid_credentials();
        }
        Err(e) => {
            tracing::error!("Admin lookup failed for {}: {:?}", req.username, e);
            return internal_error();
        }
    };

    if let Err(e) = Admin::touch_last_login(&state.pool, admin.admin_id).await {
        tracing::warn!("Failed to update last login for {}: {:?}", admin.username, e);
    }

    let token = state.sessions.issue(&admin.username);
    let max_age = state.config.admin_session_expiration_secs;
    let jar = jar
        .add(session_cookie(ADMIN_TOKEN_COOKIE, token, max_age))
        .add(session_cookie(
            ADMIN_USERNAME_COOKIE,
            admin.username.clone(),
            max_age,
        ));

    tracing::info!("Admin {} logged in", admin.username);
    (
        StatusCode::OK,
        jar,
        success_to_api_response(LoginResponse {
            success: true,
            admin: AdminInfo {
                id: admin.admin_id,
                username: admin.username,
            },
        }),
    )
        .into_response()
}

#[axum::debug_handler]
pub async fn check_session(State(state): State<AppState>, jar: CookieJar) -> Response {
    match resolve_admin(&state, &jar).await {
        Ok(Some(ctx)) => (
            StatusCode::OK,
            success_to_api_response(SessionCheckResponse {
                authenticated: true,
                admin: Some(AdminInfo {
                    id: ctx.admin_id,
                    username: ctx.username,
                }),
            }),
        )
            .into_response(),
        // 未认证不是错误，返回 200 并顺带清掉残留的 cookie
        Ok(None) => (
            StatusCode::OK,
            clear_session_cookies(jar),
            success_to_api_response(SessionCheckResponse {
                authenticated: false,
                admin: None,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Admin identity lookup failed in session check: {:?}", e);
            internal_error()
        }
    }
}

#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(ADMIN_TOKEN_COOKIE) {
        state.sessions.revoke(cookie.value());
    }

    // 注销总是成功，没有会话时也一样
    (
        StatusCode::OK,
        clear_session_cookies(jar),
        success_to_api_response(LogoutResponse { success: true }),
    )
        .into_response()
}
