use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    middleware::{RateLimiter, admin_auth, log_errors, rate_limit},
    routes,
};

/// 组装全部路由：公开读取、带限流的登录入口、会话守卫后的管理操作。
pub fn build_router(state: AppState, rate_limiter: Arc<RateLimiter>) -> Router {
    // 公开读取路由
    let public_routes = Router::new()
        .route("/warriors", get(routes::warrior::list_warriors))
        .route("/warriors/{id}", get(routes::warrior::get_warrior))
        .route("/dojos", get(routes::dojo::list_dojos))
        .route("/dojos/{id}", get(routes::dojo::get_dojo))
        .route("/tournaments", get(routes::tournament::list_tournaments))
        .route("/tournaments/{id}", get(routes::tournament::get_tournament))
        .route("/battles", get(routes::battle::list_battles))
        .route("/battles/{id}", get(routes::battle::get_battle))
        .route("/articles", get(routes::article::list_articles))
        .route("/articles/{id}", get(routes::article::get_article));

    // 登录入口单独挂限流，会话查询与注销不设门槛
    let session_routes = Router::new()
        .route("/login", post(routes::admin::login))
        .route_layer(from_fn_with_state(rate_limiter, rate_limit))
        .route("/session", get(routes::admin::check_session))
        .route("/logout", delete(routes::admin::logout));

    // 管理操作全部经过会话守卫
    let admin_panel = Router::new()
        .route("/warriors", post(routes::warrior::create_warrior))
        .route(
            "/warriors/{id}",
            put(routes::warrior::update_warrior).delete(routes::warrior::delete_warrior),
        )
        .route("/dojos", post(routes::dojo::create_dojo))
        .route(
            "/dojos/{id}",
            put(routes::dojo::update_dojo).delete(routes::dojo::delete_dojo),
        )
        .route("/tournaments", post(routes::tournament::create_tournament))
        .route(
            "/tournaments/{id}",
            put(routes::tournament::update_tournament)
                .delete(routes::tournament::delete_tournament),
        )
        .route("/battles", post(routes::battle::create_battle))
        .route(
            "/battles/{id}",
            put(routes::battle::update_battle).delete(routes::battle::delete_battle),
        )
        .route("/articles", post(routes::article::create_article))
        .route(
            "/articles/{id}",
            put(routes::article::update_article).delete(routes::article::delete_article),
        )
        .layer(from_fn_with_state(state.clone(), admin_auth));

    let api_base_uri = state.config.api_base_uri.clone();
    let router = Router::new().nest(
        &api_base_uri,
        Router::new()
            .merge(public_routes)
            .nest("/admin", session_routes.merge(admin_panel)),
    );

    router
        .layer(from_fn(log_errors))
        .with_state(state)
}
