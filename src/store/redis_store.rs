//! Redis session store compatible with connect-redis
//!
//! Storage layout, shared with the Node.js middleware:
//! - Primary key: `prefix + session_id` (default prefix: "sess:"), holding
//!   the JSON serialized record
//! - Index key: `root + sep + user_id + sep + session_id`, holding the
//!   primary key string, so one prefix scan finds all of a user's sessions
//! - TTL: derived from the session cookie expiration

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::SessionStore;
use crate::client::StoreClient;
use crate::error::SessionError;
use crate::keys::KeyScheme;
use crate::serializer::{JsonSerializer, Serializer};
use crate::session::{SessionData, SessionEntry};
use crate::ttl::SessionTtl;

const DEFAULT_PREFIX: &str = "sess:";
const DEFAULT_SCAN_BATCH_SIZE: usize = 100;

/// Redis-backed session store with a per-user secondary index.
///
/// Every write maintains two keys: the primary record key and an index key
/// whose value is the primary key string. The two writes are independent
/// commands, not a transaction; when the second one fails the first stays
/// written, the error is returned, and the divergence is logged.
///
/// Session ids must not contain the separator character of the configured
/// prefix.
///
/// # Example
///
/// ```rust,ignore
/// use redis_session_store::{CommandClient, RedisStore};
///
/// let client = CommandClient::from_url("redis://127.0.0.1/").await?;
/// let store = RedisStore::new(client)
///     .with_prefix("myapp:")
///     .with_ttl(3600);
/// ```
#[derive(Clone)]
pub struct RedisStore {
    client: Arc<dyn StoreClient>,
    keys: KeyScheme,
    ttl: SessionTtl,
    serializer: Arc<dyn Serializer>,
    scan_batch_size: usize,
    disable_ttl: bool,
    disable_touch: bool,
}

impl RedisStore {
    /// Create a store over any [`StoreClient`] with the default settings:
    /// prefix `"sess:"`, TTL 86400 seconds, JSON payloads, scan batches of
    /// 100 keys.
    pub fn new(client: impl StoreClient + 'static) -> Self {
        Self {
            client: Arc::new(client),
            keys: KeyScheme::new(DEFAULT_PREFIX),
            ttl: SessionTtl::default(),
            serializer: Arc::new(JsonSerializer),
            scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
            disable_ttl: false,
            disable_touch: false,
        }
    }

    /// Set the key prefix (default `"sess:"`). A `:` separator is appended
    /// when the prefix does not already end in a non-word character.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.keys = KeyScheme::new(prefix);
        self
    }

    /// Use a fixed fallback TTL in seconds for records whose cookie carries
    /// no expiry (default 86400).
    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl = SessionTtl::Seconds(ttl_secs);
        self
    }

    /// Derive the TTL from each record with the given function. A
    /// non-positive result makes `save` destroy the session instead of
    /// writing it.
    pub fn with_ttl_resolver(
        mut self,
        resolver: impl Fn(&SessionData) -> i64 + Send + Sync + 'static,
    ) -> Self {
        self.ttl = SessionTtl::Resolver(Arc::new(resolver));
        self
    }

    /// Replace the payload codec (default JSON).
    pub fn with_serializer(mut self, serializer: impl Serializer + 'static) -> Self {
        self.serializer = Arc::new(serializer);
        self
    }

    /// Set how many keys each scan cursor round trip asks for (default 100).
    pub fn with_scan_batch_size(mut self, batch_size: usize) -> Self {
        self.scan_batch_size = batch_size;
        self
    }

    /// Write keys without expiry and turn `touch` into a no-op.
    pub fn disable_ttl(mut self) -> Self {
        self.disable_ttl = true;
        self
    }

    /// Turn `touch` into a no-op while `save` keeps setting TTLs.
    pub fn disable_touch(mut self) -> Self {
        self.disable_touch = true;
        self
    }

    /// Enumerate primary keys, dropping the index keys that share the
    /// namespace root.
    async fn primary_keys(&self) -> Result<Vec<String>, SessionError> {
        let keys = self
            .client
            .scan(&self.keys.all_pattern(), self.scan_batch_size)
            .await?;
        Ok(keys
            .into_iter()
            .filter(|key| self.keys.session_id(key).is_some())
            .collect())
    }
}

#[async_trait]
impl SessionStore for RedisStore {
    async fn load(&self, sid: &str) -> Result<Option<SessionData>, SessionError> {
        let key = self.keys.primary(sid);
        match self.client.get(&key).await? {
            Some(payload) => Ok(Some(self.serializer.parse(&payload)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, sid: &str, record: &SessionData) -> Result<(), SessionError> {
        let ttl = self.ttl.resolve(record);
        if ttl <= 0 {
            // Already expired; remove whatever may still be stored.
            return self.destroy(sid).await;
        }

        let primary_key = self.keys.primary(sid);
        let index_key = self.keys.index(&record.user_id, sid);
        let payload = self.serializer.stringify(record)?;
        let expiry = if self.disable_ttl { None } else { Some(ttl) };

        self.client.set(&primary_key, &payload, expiry).await?;
        if let Err(err) = self.client.set(&index_key, &primary_key, expiry).await {
            // Not rolled back: the record is live but invisible to
            // clear_for_user until the next save or the TTL removes it.
            warn!("session {} saved but user index write failed: {}", sid, err);
            return Err(err);
        }
        Ok(())
    }

    async fn touch(&self, sid: &str, record: &SessionData) -> Result<(), SessionError> {
        if self.disable_touch || self.disable_ttl {
            return Ok(());
        }

        let ttl = self.ttl.resolve(record);
        let primary_key = self.keys.primary(sid);
        let index_key = self.keys.index(&record.user_id, sid);

        // A false reply means the key is gone, which is not a failure.
        self.client.expire(&primary_key, ttl).await?;
        if let Err(err) = self.client.expire(&index_key, ttl).await {
            warn!("session {} touched but user index expiry failed: {}", sid, err);
            return Err(err);
        }
        Ok(())
    }

    async fn destroy(&self, sid: &str) -> Result<(), SessionError> {
        let primary_key = self.keys.primary(sid);
        // The stored record carries the user id the index key is derived
        // from, so the payload has to be read before deleting.
        let payload = match self.client.get(&primary_key).await? {
            Some(payload) => payload,
            None => return Ok(()),
        };
        let record = self.serializer.parse(&payload)?;
        let index_key = self.keys.index(&record.user_id, sid);
        self.client.delete_many(&[primary_key, index_key]).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        let keys = self
            .client
            .scan(&self.keys.all_pattern(), self.scan_batch_size)
            .await?;
        if keys.is_empty() {
            return Ok(());
        }
        let removed = self.client.delete_many(&keys).await?;
        debug!("cleared {} keys under {}", removed, self.keys.prefix());
        Ok(())
    }

    async fn clear_for_user(&self, user_id: &str) -> Result<(), SessionError> {
        let index_keys = self
            .client
            .scan(&self.keys.user_pattern(user_id), self.scan_batch_size)
            .await?;
        if index_keys.is_empty() {
            return Ok(());
        }

        // The index key's suffix is the session id itself; the primary key
        // derives from it without reading the index value.
        let mut doomed = Vec::with_capacity(index_keys.len() * 2);
        for index_key in index_keys {
            if let Some(sid) = self.keys.index_session_id(&index_key, user_id) {
                doomed.push(self.keys.primary(sid));
            }
            doomed.push(index_key);
        }
        let removed = self.client.delete_many(&doomed).await?;
        debug!("cleared {} keys for user {}", removed, user_id);
        Ok(())
    }

    async fn length(&self) -> Result<usize, SessionError> {
        Ok(self.primary_keys().await?.len())
    }

    async fn ids(&self) -> Result<Vec<String>, SessionError> {
        let keys = self.primary_keys().await?;
        Ok(keys
            .iter()
            .filter_map(|key| self.keys.session_id(key))
            .map(str::to_owned)
            .collect())
    }

    async fn all(&self) -> Result<Vec<SessionEntry>, SessionError> {
        let keys = self.primary_keys().await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values = self.client.multi_get(&keys).await?;
        let mut entries = Vec::with_capacity(keys.len());
        for (key, value) in keys.iter().zip(values) {
            // A key can expire between the scan and the fetch; skip it.
            let payload = match value {
                Some(payload) => payload,
                None => continue,
            };
            let record = self.serializer.parse(&payload)?;
            if let Some(sid) = self.keys.session_id(key) {
                entries.push(SessionEntry {
                    id: sid.to_owned(),
                    record,
                });
            }
        }
        Ok(entries)
    }
}
