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

use super::model::{CreateDojoRequest, Dojo, UpdateDojoRequest};

fn dojos(state: &AppState) -> CachedRepository<Dojo> {
    CachedRepository::new(state.pool.clone(), state.cache.clone())
}

#[axum::debug_handler]
pub async fn list_dojos(State(state): State<AppState>) -> Response {
    match dojos(&state).get_all().await {
        Ok(list) => (StatusCode::OK, success_to_api_response(list)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list dojos: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "获取道场列表失败".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn get_dojo(State(state): State<AppState>, Path(dojo_id): Path<Uuid>) -> Response {
    match dojos(&state).get_by_id(&dojo_id).await {
        Ok(dojo) => (StatusCode::OK, success_to_api_response(dojo)).into_response(),
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "道场不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get dojo {}: {}", dojo_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "获取道场信息失败".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn create_dojo(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Json(req): Json<CreateDojoRequest>,
) -> Response {
    if req.name.len() < 2 || req.name.len() > 64 {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response::<()>(
                error_codes::VALIDATION_ERROR,
                "道场名称长度必须在2到64个字符之间".to_string(),
            ),
        )
            .into_response();
    }

    match dojos(&state).create(req).await {
        Ok(dojo) => {
            tracing::info!("Admin {} created dojo {}", admin.username, dojo.dojo_id);
            (StatusCode::CREATED, success_to_api_response(dojo)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create dojo: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "创建道场失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn update_dojo(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(dojo_id): Path<Uuid>,
    Json(req): Json<UpdateDojoRequest>,
) -> Response {
    match dojos(&state).update(&dojo_id, req).await {
        Ok(dojo) => {
            tracing::info!("Admin {} updated dojo {}", admin.username, dojo_id);
            (StatusCode::OK, success_to_api_response(dojo)).into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "道场不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update dojo {}: {}", dojo_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "更新道场失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn delete_dojo(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(dojo_id): Path<Uuid>,
) -> Response {
    match dojos(&state).delete(&dojo_id).await {
        Ok(()) => {
            tracing::info!("Admin {} deleted dojo {}", admin.username, dojo_id);
            (
                StatusCode::OK,
                success_to_api_response(serde_json::json!({ "dojo_id": dojo_id })),
            )
                .into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "道场不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete dojo {}: {}", dojo_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "删除道场失败".to_string()),
            )
                .into_response()
        }
    }
}
