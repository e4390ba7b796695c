use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::utils::{error_codes, error_to_api_response};

struct RateLimitEntry {
    count: u32,
    reset_at: Instant,
}

/// 登录尝试限流器：按调用方标识计数，窗口过后重新开始。
/// 计数保存在进程内，重启即清零。
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// 记录一次尝试并判定是否放行。无论放行与否，本次尝试都计入窗口。
    pub fn check_and_record(&self, identifier: &str) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        // 检查前先清理所有已过窗口的条目
        entries.retain(|_, entry| entry.reset_at > now);

        let entry = entries
            .entry(identifier.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                reset_at: now + self.window,
            });
        entry.count += 1;
        entry.count <= self.max_attempts
    }
}

/// 从请求头中获取调用方IP，其次使用连接信息，最后退化为 "unknown"。
pub fn client_ip(req: &Request<Body>) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());
    req.headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or_else(|| remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(&req);
    if !limiter.check_and_record(&ip) {
        tracing::warn!("Login attempts throttled for {}", ip);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            error_to_api_response::<()>(
                error_codes::RATE_LIMIT,
                "请求过于频繁，请稍后再试".to_string(),
            ),
        )
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixth_attempt_in_window_is_blocked() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        for attempt in 1..=5 {
            assert!(
                limiter.check_and_record("203.0.113.7"),
                "attempt {} should pass",
                attempt
            );
        }
        assert!(!limiter.check_and_record("203.0.113.7"));
        // 被拒绝的尝试同样计数，继续尝试仍被拒
        assert!(!limiter.check_and_record("203.0.113.7"));
    }

    #[test]
    fn identifiers_are_counted_separately() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        for _ in 0..5 {
            assert!(limiter.check_and_record("203.0.113.7"));
        }
        assert!(!limiter.check_and_record("203.0.113.7"));
        assert!(limiter.check_and_record("198.51.100.2"));
    }

    #[test]
    fn window_elapse_resets_the_counter() {
        let limiter = RateLimiter::new(5, Duration::from_millis(20));
        for _ in 0..5 {
            assert!(limiter.check_and_record("203.0.113.7"));
        }
        assert!(!limiter.check_and_record("203.0.113.7"));

        std::thread::sleep(Duration::from_millis(40));

        // 窗口过后如同首次尝试，重新有完整的尝试预算
        for attempt in 1..=5 {
            assert!(
                limiter.check_and_record("203.0.113.7"),
                "attempt {} after reset should pass",
                attempt
            );
        }
        assert!(!limiter.check_and_record("203.0.113.7"));
    }

    #[test]
    fn client_ip_prefers_headers_then_falls_back() {
        let req = Request::builder()
            .header("x-real-ip", "203.0.113.7")
            .header("x-forwarded-for", "198.51.100.2, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "203.0.113.7");

        let req = Request::builder()
            .header("x-forwarded-for", "198.51.100.2, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "198.51.100.2");

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&req), "unknown");
    }
}
