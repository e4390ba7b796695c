use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    AppState,
    middleware::AdminContext,
    repository::{CachedRepository, RepoError},
    utils::{error_codes, error_to_api_response, success_to_api_response},
};

use super::model::{CreateWarriorRequest, UpdateWarriorRequest, Warrior};

fn warriors(state: &AppState) -> CachedRepository<Warrior> {
    CachedRepository::new(state.pool.clone(), state.cache.clone())
}

#[axum::debug_handler]
pub async fn list_warriors(State(state): State<AppState>) -> Response {
    match warriors(&state).get_all().await {
        Ok(list) => (StatusCode::OK, success_to_api_response(list)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list warriors: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "获取武者列表失败".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn get_warrior(State(state): State<AppState>, Path(warrior_id): Path<Uuid>) -> Response {
    match warriors(&state).get_by_id(&warrior_id).await {
        Ok(warrior) => (StatusCode::OK, success_to_api_response(warrior)).into_response(),
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "武者不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get warrior {}: {}", warrior_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "获取武者信息失败".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn create_warrior(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Json(req): Json<CreateWarriorRequest>,
) -> Response {
    // 名称长度校验
    if req.name.len() < 2 || req.name.len() > 64 {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response::<()>(
                error_codes::VALIDATION_ERROR,
                "武者名称长度必须在2到64个字符之间".to_string(),
            ),
        )
            .into_response();
    }

    match warriors(&state).create(req).await {
        Ok(warrior) => {
            tracing::info!(
                "Admin {} created warrior {}",
                admin.username,
                warrior.warrior_id
            );
            (StatusCode::CREATED, success_to_api_response(warrior)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create warrior: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "创建武者失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn update_warrior(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(warrior_id): Path<Uuid>,
    Json(req): Json<UpdateWarriorRequest>,
) -> Response {
    match warriors(&state).update(&warrior_id, req).await {
        Ok(warrior) => {
            tracing::info!("Admin {} updated warrior {}", admin.username, warrior_id);
            (StatusCode::OK, success_to_api_response(warrior)).into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "武者不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update warrior {}: {}", warrior_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "更新武者失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn delete_warrior(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(warrior_id): Path<Uuid>,
) -> Response {
    match warriors(&state).delete(&warrior_id).await {
        Ok(()) => {
            tracing::info!("Admin {} deleted warrior {}", admin.username, warrior_id);
            (
                StatusCode::OK,
                success_to_api_response(serde_json::json!({ "warrior_id": warrior_id })),
            )
                .into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "武者不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete warrior {}: {}", warrior_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "删除武者失败".to_string()),
            )
                .into_response()
        }
    }
}
