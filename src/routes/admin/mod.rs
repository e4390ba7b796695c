mod handler;
mod model;

pub use handler::{check_session, login, logout};
pub use model::{
    Admin, AdminInfo, LoginRequest, LoginResponse, LogoutResponse, SessionCheckResponse,
};
