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

use super::model::{Article, CreateArticleRequest, NewArticle, UpdateArticleRequest};

fn articles(state: &AppState) -> CachedRepository<Article> {
    CachedRepository::new(state.pool.clone(), state.cache.clone())
}

#[axum::debug_handler]
pub async fn list_articles(State(state): State<AppState>) -> Response {
    match articles(&state).get_all().await {
        Ok(list) => (StatusCode::OK, success_to_api_response(list)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list articles: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(
                    error_codes::INTERNAL_ERROR,
                    "获取文章列表失败".to_string(),
                ),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn get_article(State(state): State<AppState>, Path(article_id): Path<Uuid>) -> Response {
    match articles(&state).get_by_id(&article_id).await {
        Ok(article) => (StatusCode::OK, success_to_api_response(article)).into_response(),
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "文章不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get article {}: {}", article_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "获取文章失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn create_article(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Json(req): Json<CreateArticleRequest>,
) -> Response {
    if req.title.len() < 2 || req.title.len() > 200 {
        return (
            StatusCode::BAD_REQUEST,
            error_to_api_response::<()>(
                error_codes::VALIDATION_ERROR,
                "文章标题长度必须在2到200个字符之间".to_string(),
            ),
        )
            .into_response();
    }

    let new = NewArticle {
        title: req.title,
        content: req.content,
        author: admin.username.clone(),
        published: req.published.unwrap_or(false),
    };
    match articles(&state).create(new).await {
        Ok(article) => {
            tracing::info!(
                "Admin {} created article {}",
                admin.username,
                article.article_id
            );
            (StatusCode::CREATED, success_to_api_response(article)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create article: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "创建文章失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn update_article(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(article_id): Path<Uuid>,
    Json(req): Json<UpdateArticleRequest>,
) -> Response {
    match articles(&state).update(&article_id, req).await {
        Ok(article) => {
            tracing::info!("Admin {} updated article {}", admin.username, article_id);
            (StatusCode::OK, success_to_api_response(article)).into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "文章不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update article {}: {}", article_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "更新文章失败".to_string()),
            )
                .into_response()
        }
    }
}

#[axum::debug_handler]
pub async fn delete_article(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminContext>,
    Path(article_id): Path<Uuid>,
) -> Response {
    match articles(&state).delete(&article_id).await {
        Ok(()) => {
            tracing::info!("Admin {} deleted article {}", admin.username, article_id);
            (
                StatusCode::OK,
                success_to_api_response(serde_json::json!({ "article_id": article_id })),
            )
                .into_response()
        }
        Err(RepoError::NotFound) => (
            StatusCode::NOT_FOUND,
            error_to_api_response::<()>(error_codes::NOT_FOUND, "文章不存在".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete article {}: {}", article_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_to_api_response::<()>(error_codes::INTERNAL_ERROR, "删除文章失败".to_string()),
            )
                .into_response()
        }
    }
}
