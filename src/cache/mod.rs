use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

struct CacheEntry {
    collection: String,
    value: Value,
    expires_at: Instant,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    // 集合名 -> 该集合当前存活的缓存键
    by_collection: HashMap<String, HashSet<String>>,
}

/// 进程内的短时读缓存，键按集合名分组，写入任意集合时整组失效。
pub struct TtlCache {
    ttl: Duration,
    inner: Mutex<CacheInner>,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                by_collection: HashMap::new(),
            }),
        }
    }

    /// 命中且未过期时返回缓存值；过期条目按未命中处理并当场移除。
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let expired = match inner.entries.get(key) {
            Some(entry) if Instant::now() <= entry.expires_at => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            if let Some(entry) = inner.entries.remove(key) {
                if let Some(keys) = inner.by_collection.get_mut(&entry.collection) {
                    keys.remove(key);
                }
            }
        }
        None
    }

    /// 整条写入或替换，过期时间为固定 TTL。
    pub fn put(&self, collection: &str, key: String, value: Value) {
        let expires_at = Instant::now() + self.ttl;
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .by_collection
            .entry(collection.to_string())
            .or_default()
            .insert(key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                collection: collection.to_string(),
                value,
                expires_at,
            },
        );
    }

    /// 使指定集合的全部缓存条目失效。
    pub fn invalidate_collection(&self, collection: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(keys) = inner.by_collection.remove(collection) {
            for key in keys {
                inner.entries.remove(&key);
            }
        }
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 缓存键：集合名、查询范围（单条或全量）、投影列。
pub fn item_key(collection: &str, id: &str, fields: &str) -> String {
    format!("{}:id:{}:{}", collection, id, fields)
}

pub fn list_key(collection: &str, fields: &str) -> String {
    format!("{}:all:{}", collection, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_returns_value_before_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let key = item_key("warriors", "w1", "*");
        cache.put("warriors", key.clone(), json!({"name": "Raiden"}));

        assert_eq!(cache.get(&key), Some(json!({"name": "Raiden"})));
    }

    #[test]
    fn expired_entry_is_a_miss_and_removed() {
        let cache = TtlCache::new(Duration::from_millis(10));
        let key = item_key("warriors", "w1", "*");
        cache.put("warriors", key.clone(), json!(1));

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get(&key), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_collection_only_touches_that_collection() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let w_key = item_key("warriors", "w1", "*");
        let d_key = list_key("dojos", "*");
        cache.put("warriors", w_key.clone(), json!(1));
        cache.put("warriors", list_key("warriors", "*"), json!([1]));
        cache.put("dojos", d_key.clone(), json!([2]));

        cache.invalidate_collection("warriors");

        assert_eq!(cache.get(&w_key), None);
        assert_eq!(cache.get(&list_key("warriors", "*")), None);
        assert_eq!(cache.get(&d_key), Some(json!([2])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn put_replaces_whole_entry() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let key = item_key("articles", "a1", "*");
        cache.put("articles", key.clone(), json!({"title": "old"}));
        cache.put("articles", key.clone(), json!({"title": "new"}));

        assert_eq!(cache.get(&key), Some(json!({"title": "new"})));
        assert_eq!(cache.len(), 1);
    }
}
