//! Positional-command client dialect

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::Arc;

use super::StoreClient;
use crate::error::SessionError;

/// Adapter for clients driven through raw positional commands.
///
/// Every operation is spelled out as a `redis::cmd` invocation with
/// positional arguments. Multi-key reads go through a pipeline and come back
/// as one array reply, and `scan` walks the plain string cursor of
/// `SCAN <cursor> MATCH <pattern> COUNT <n>` until the store hands back
/// `"0"`.
#[derive(Clone)]
pub struct PipelineClient {
    conn: Arc<ConnectionManager>,
}

impl PipelineClient {
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
impl StoreClient for PipelineClient {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let mut conn = (*self.conn).clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
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
            Some(ttl) if ttl > 0 => {
                let _: () = redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("EX")
                    .arg(ttl)
                    .query_async(&mut conn)
                    .await?;
            }
            _ => {
                let _: () = redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .query_async(&mut conn)
                    .await?;
            }
        }
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<bool, SessionError> {
        let mut conn = (*self.conn).clone();
        let refreshed: i64 = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await?;
        Ok(refreshed == 1)
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>, SessionError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = (*self.conn).clone();
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.cmd("GET").arg(key);
        }
        let values: Vec<Option<String>> = pipe.query_async(&mut conn).await?;
        Ok(values)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<usize, SessionError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = (*self.conn).clone();
        let removed: usize = redis::cmd("DEL").arg(keys).query_async(&mut conn).await?;
        Ok(removed)
    }

    async fn scan(&self, pattern: &str, batch_size: usize) -> Result<Vec<String>, SessionError> {
        let mut conn = (*self.conn).clone();
        let mut keys = Vec::new();
        let mut cursor = String::from("0");
        loop {
            let (next, batch): (String, Vec<String>) = redis::cmd("SCAN")
                .arg(&cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(batch_size)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == "0" {
                break;
            }
            cursor = next;
        }
        Ok(keys)
    }
}
