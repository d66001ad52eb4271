//! In-memory store client
//!
//! Primarily for development and testing: it implements the same six
//! primitives as the Redis clients over a process-local map.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::StoreClient;
use crate::error::SessionError;

struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

/// In-process [`StoreClient`] backed by a `HashMap`.
///
/// Warning: not suitable for production use because:
/// - Entries are lost on restart
/// - Entries are not shared across processes
/// - Memory usage grows with the number of entries
#[derive(Clone, Default)]
pub struct MemoryClient {
    entries: Arc<RwLock<HashMap<String, StoredValue>>>,
}

impl MemoryClient {
    /// Create an empty client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries whose expiry has passed.
    fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.write().retain(|_, stored| !stored.is_expired(now));
    }
}

#[async_trait]
impl StoreClient for MemoryClient {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let now = Instant::now();
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|stored| !stored.is_expired(now))
            .map(|stored| stored.value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl_secs: Option<i64>,
    ) -> Result<(), SessionError> {
        let expires_at = ttl_secs
            .filter(|ttl| *ttl > 0)
            .map(|ttl| Instant::now() + Duration::from_secs(ttl as u64));
        let stored = StoredValue {
            value: value.to_string(),
            expires_at,
        };
        self.entries.write().insert(key.to_string(), stored);
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<bool, SessionError> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let live = entries.get(key).is_some_and(|stored| !stored.is_expired(now));
        if !live {
            return Ok(false);
        }
        if ttl_secs > 0 {
            if let Some(stored) = entries.get_mut(key) {
                stored.expires_at = Some(now + Duration::from_secs(ttl_secs as u64));
            }
        } else {
            // Redis removes the key outright on a non-positive expiry.
            entries.remove(key);
        }
        Ok(true)
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>, SessionError> {
        let now = Instant::now();
        let entries = self.entries.read();
        Ok(keys
            .iter()
            .map(|key| {
                entries
                    .get(key)
                    .filter(|stored| !stored.is_expired(now))
                    .map(|stored| stored.value.clone())
            })
            .collect())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize, SessionError> {
        self.purge_expired();
        let mut entries = self.entries.write();
        let mut removed = 0;
        for key in keys {
            if entries.remove(key).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn scan(&self, pattern: &str, _batch_size: usize) -> Result<Vec<String>, SessionError> {
        self.purge_expired();
        let entries = self.entries.read();
        Ok(entries
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect())
    }
}

/// Glob matcher covering the pattern subset the store emits: literal
/// characters, `?`, and `*`.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.as_bytes();
    let text = text.as_bytes();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == b'?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            // Let the last `*` swallow one more character and retry.
            backtrack = Some((star, matched + 1));
            p = star + 1;
            t = matched + 1;
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }
    p == pattern.len()
}
