//! Typed-command client dialect

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ScanOptions};
use std::sync::Arc;

use super::StoreClient;
use crate::error::SessionError;

/// Adapter for the high-level typed-command dialect of the `redis` crate.
///
/// Single-key operations go through [`AsyncCommands`], and `scan` drains the
/// crate's cursor-object iterator batch by batch.
///
/// # Example
///
/// ```rust,ignore
/// use redis_session_store::CommandClient;
///
/// let client = redis::Client::open("redis://127.0.0.1/")?;
/// let client = CommandClient::new(client).await?;
/// ```
#[derive(Clone)]
pub struct CommandClient {
    conn: Arc<ConnectionManager>,
}

impl CommandClient {
    /// Connect through a managed connection.
    pub async fn new(client: redis::Client) -> Result<Self, SessionError> {
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::from_connection_manager(conn))
    }

    /// Connect from a URL such as `redis://127.0.0.1/`.
    pub async fn from_url(url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(url)?;
        Self::new(client).await
    }

    /// Wrap an existing connection manager.
    pub fn from_connection_manager(conn: ConnectionManager) -> Self {
        Self {
            conn: Arc::new(conn),
        }
    }
}

#[async_trait]
impl StoreClient for CommandClient {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let mut conn = (*self.conn).clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl_secs: Option<i64>,
    ) -> Result<(), SessionError> {
        let mut conn = (*self.conn).clone();
        match ttl_secs {
            Some(ttl) if ttl > 0 => conn.set_ex::<_, _, ()>(key, value, ttl as u64).await?,
            _ => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<bool, SessionError> {
        let mut conn = (*self.conn).clone();
        let refreshed: bool = conn.expire(key, ttl_secs).await?;
        Ok(refreshed)
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>, SessionError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = (*self.conn).clone();
        let values: Vec<Option<String>> = conn.mget(keys).await?;
        Ok(values)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize, SessionError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = (*self.conn).clone();
        let removed: usize = conn.del(keys).await?;
        Ok(removed)
    }

    async fn scan(&self, pattern: &str, batch_size: usize) -> Result<Vec<String>, SessionError> {
        let mut conn = (*self.conn).clone();
        let opts = ScanOptions::default()
            .with_pattern(pattern)
            .with_count(batch_size);
        let mut iter = conn.scan_options::<String>(opts).await?;

        let mut keys = Vec::new();
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }
}
