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

use super::model::{Battle, CreateBattleRequest, UpdateBattleRequest};

fn battles(state: &AppState) -> CachedRepository<Battle> {
    CachedRepository::new(state.pool.clone(), state.cache.clone())
}

#[axum::debug_handler]
pub async fn list_battles(State(state): State<AppState>) -> Response {
    match battles(&state).get_all().await {
        Ok(list) => (StatusCode::OK, success_to_api_response(list)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list battles: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "获取对战列表失败".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn get_battle(State(state): State<AppState>, Path(battle_id): Path<Uuid>) -> Response {
    match battles(&state).get_by_id(&battle_id).await {
        Ok(battle) => (StatusCode::OK, success_to_api_response(battle)).into_response(),
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "对战不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get battle {}: {}", battle_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "获取对战信息失败".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn create_battle(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Json(req): Json<CreateBattleRequest>,
) -> Response {
    // 双方不能是同一名武者
    if req.challenger_id == req.defender_id {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response::<()>(
                error_codes::VALIDATION_ERROR,
                "挑战者与应战者不能相同".to_string(),
            ),
        )
            .into_response();
    }

    match battles(&state).create(req).await {
        Ok(battle) => {
            tracing::info!("Admin {} created battle {}", admin.username, battle.battle_id);
            (StatusCode::CREATED, success_to_api_response(battle)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create battle: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "创建对战失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn update_battle(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(battle_id): Path<Uuid>,
    Json(req): Json<UpdateBattleRequest>,
) -> Response {
    match battles(&state).update(&battle_id, req).await {
        Ok(battle) => {
            tracing::info!("Admin {} updated battle {}", admin.username, battle_id);
            (StatusCode::OK, success_to_api_response(battle)).into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "对战不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update battle {}: {}", battle_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "更新对战失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn delete_battle(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(battle_id): Path<Uuid>,
) -> Response {
    match battles(&state).delete(&battle_id).await {
        Ok(()) => {
            tracing::info!("Admin {} deleted battle {}", admin.username, battle_id);
            (
                StatusCode::OK,
                success_to_api_response(serde_json::json!({ "battle_id": battle_id })),
            )
                .into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "对战不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete battle {}: {}", battle_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "删除对战失败".to_string()),
            )
                .into_response()
        }
    }
}
