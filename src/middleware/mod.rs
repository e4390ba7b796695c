mod auth;
mod error_handler;
mod rate_limit;

pub use auth::{
    ADMIN_TOKEN_COOKIE, ADMIN_USERNAME_COOKIE, AdminContext, admin_auth, clear_session_cookies,
    resolve_admin, session_cookie,
};
pub use error_handler::log_errors;
pub use rate_limit::{RateLimiter, client_ip, rate_limit};
