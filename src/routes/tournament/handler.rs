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

use super::model::{CreateTournamentRequest, Tournament, UpdateTournamentRequest};

fn tournaments(state: &AppState) -> CachedRepository<Tournament> {
    CachedRepository::new(state.pool.clone(), state.cache.clone())
}

#[axum::debug_handler]
pub async fn list_tournaments(State(state): State<AppState>) -> Response {
    match tournaments(&state).get_all().await {
        Ok(list) => (StatusCode::OK, success_to_api_response(list)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list tournaments: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "获取大赛列表失败".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(tournament_id): Path<Uuid>,
) -> Response {
    match tournaments(&state).get_by_id(&tournament_id).await {
        Ok(tournament) => (StatusCode::OK, success_to_api_response(tournament)).into_response(),
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "大赛不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get tournament {}: {}", tournament_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "获取大赛信息失败".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn create_tournament(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Json(req): Json<CreateTournamentRequest>,
) -> Response {
    if req.name.len() < 2 || req.name.len() > 128 {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response::<()>(
                error_codes::VALIDATION_ERROR,
                "大赛名称长度必须在2到128个字符之间".to_string(),
            ),
        )
            .into_response();
    }
    if let Some(max) = req.max_participants {
        if max < 2 {
            return (
                StatusCode::BAD_REQUEST,
                error_to_api_response::<()>(
                    error_codes::VALIDATION_ERROR,
                    "参赛人数上限不能少于2".to_string(),
                ),
            )
                .into_response();
        }
    }

    match tournaments(&state).create(req).await {
        Ok(tournament) => {
            tracing::info!(
                "Admin {} created tournament {}",
                admin.username,
                tournament.tournament_id
            );
            (StatusCode::CREATED, success_to_api_response(tournament)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create tournament: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "创建大赛失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn update_tournament(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(tournament_id): Path<Uuid>,
    Json(req): Json<UpdateTournamentRequest>,
) -> Response {
    match tournaments(&state).update(&tournament_id, req).await {
        Ok(tournament) => {
            tracing::info!("Admin {} updated tournament {}", admin.username, tournament_id);
            (StatusCode::OK, success_to_api_response(tournament)).into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "大赛不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update tournament {}: {}", tournament_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "更新大赛失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn delete_tournament(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(tournament_id): Path<Uuid>,
) -> Response {
    match tournaments(&state).delete(&tournament_id).await {
        Ok(()) => {
            tracing::info!("Admin {} deleted tournament {}", admin.username, tournament_id);
            (
                StatusCode::OK,
                success_to_api_response(serde_json::json!({ "tournament_id": tournament_id })),
            )
                .into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "大赛不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete tournament {}: {}", tournament_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "删除大赛失败".to_string()),
            )
                .into_response()
        }
    }
}
