//! 可替换的缓存抽象
//!
//! 只用于减少重复的网络请求，与会话状态机没有任何耦合

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// 以字符串为 key 的缓存
pub trait Cache<V: Clone>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;
    fn insert(&self, key: String, value: V);
    fn len(&self) -> usize;
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 内存缓存：不限容量，可选过期时间
pub struct MemoryCache<V> {
    entries: Mutex<HashMap<String, (Instant, V)>>,
    ttl: Option<Duration>,
}

impl<V> MemoryCache<V> {
    /// 永不过期
    pub fn new() -> Self {
        Self::with_ttl(None)
    }

    pub fn with_ttl(ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn is_fresh(&self, inserted_at: Instant) -> bool {
        self.ttl.map_or(true, |ttl| inserted_at.elapsed() < ttl)
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> Cache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let hit = entries
            .get(key)
            .map(|(inserted_at, value)| (self.is_fresh(*inserted_at), value.clone()));
        match hit {
            Some((true, value)) => Some(value),
            Some((false, _)) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn insert(&self, key: String, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, (Instant::now(), value));
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn clear(&self) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

/// 不缓存任何内容
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl<V: Clone> Cache<V> for NoCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn insert(&self, _key: String, _value: V) {}

    fn len(&self) -> usize {
        0
    }

    fn clear(&self) {}
}
