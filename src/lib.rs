use std::sync::Arc;

use config::Config;
use sqlx::PgPool;

use auth::SessionStore;
use cache::TtlCache;

pub mod auth;
pub mod cache;
pub mod config;
pub mod middleware;
pub mod repository;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub cache: Arc<TtlCache>,
    pub sessions: Arc<SessionStore>,
}
