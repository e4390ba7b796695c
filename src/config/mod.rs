use std::env;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    pub admin_session_expiration_secs: u64,
    pub login_rate_limit_window_secs: u64,
    pub login_rate_limit_attempts: u32,
    pub cache_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        // 管理员会话有效期以小时配置
        let session_expiration = env::var("ADMIN_SESSION_EXPIRATION")?
            .trim_end_matches('h')
            .parse::<u64>()
            .unwrap_or(4);
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            server_host: env::var("SERVER_HOST")?,
            server_port: env::var("SERVER_PORT")?.parse().unwrap_or(3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api".to_string()),
            admin_session_expiration_secs: session_expiration * 3600,
            login_rate_limit_window_secs: env::var("LOGIN_RATE_LIMIT_WINDOW")?
                .parse()
                .unwrap_or(60),
            login_rate_limit_attempts: env::var("LOGIN_RATE_LIMIT_ATTEMPTS")?.parse().unwrap_or(5),
            cache_ttl_secs: env::var("CACHE_TTL")?.parse().unwrap_or(60),
        })
    }

    pub fn admin_session_expiration(&self) -> Duration {
        Duration::from_secs(self.admin_session_expiration_secs)
    }

    pub fn login_rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.login_rate_limit_window_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
