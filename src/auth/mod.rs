use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

/// 服务端持有的管理员会话记录。
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
    pub expires_at: Instant,
}

/// 管理员会话存储：签发的令牌在服务端登记，过期或注销后立即失效。
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, AdminSession>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// 签发新令牌并登记会话，顺带清理已过期的会话。
    pub fn issue(&self, username: &str) -> String {
        let token = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        let now = Instant::now();
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(
            token.clone(),
            AdminSession {
                username: username.to_string(),
                expires_at: now + self.ttl,
            },
        );
        tracing::debug!("Issued admin session for {}", username);
        token
    }

    /// 令牌存在且未过期时返回会话；过期会话当场移除。
    pub fn validate(&self, token: &str) -> Option<AdminSession> {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        match sessions.get(token) {
            Some(session) if session.expires_at > Instant::now() => Some(session.clone()),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }

    /// 注销令牌，令牌不存在时也视为成功。
    pub fn revoke(&self, token: &str) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_validate_binds_username_and_expiry() {
        let store = SessionStore::new(Duration::from_secs(4 * 3600));
        let before = Instant::now();
        let token = store.issue("shogun");

        let session = store.validate(&token).expect("session should be live");
        assert_eq!(session.username, "shogun");
        // 过期时间应落在签发时刻起约 4 小时处
        let ttl = session.expires_at - before;
        assert!(ttl > Duration::from_secs(4 * 3600 - 5));
        assert!(ttl <= Duration::from_secs(4 * 3600 + 5));
    }

    #[test]
    fn tokens_are_unguessable_and_distinct() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.issue("shogun");
        let b = store.issue("shogun");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(store.validate("not-a-token").is_none());
    }

    #[test]
    fn expired_session_is_rejected_and_removed() {
        let store = SessionStore::new(Duration::from_millis(10));
        let token = store.issue("shogun");
        std::thread::sleep(Duration::from_millis(30));

        assert!(store.validate(&token).is_none());
        // 再次校验仍然失败，说明记录已被移除而非复活
        assert!(store.validate(&token).is_none());
    }

    #[test]
    fn revoke_is_idempotent() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.issue("shogun");

        assert!(store.revoke(&token));
        assert!(store.validate(&token).is_none());
        assert!(!store.revoke(&token));
    }

    #[test]
    fn issue_sweeps_expired_sessions() {
        let store = SessionStore::new(Duration::from_millis(10));
        let stale = store.issue("shogun");
        std::thread::sleep(Duration::from_millis(30));

        let fresh = store.issue("shogun");
        let sessions = store.sessions.lock().unwrap();
        assert!(!sessions.contains_key(&stale));
        assert!(sessions.contains_key(&fresh));
    }
}
