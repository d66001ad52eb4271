//! Store client adapters
//!
//! Redis clients speak one of two dialects: high-level typed commands with a
//! cursor-object scan ([`CommandClient`]) or raw positional commands with a
//! plain string cursor ([`PipelineClient`]). Both are normalized behind the
//! [`StoreClient`] capability interface here; the store never sees which one
//! it is talking to.

mod command;
mod memory;
mod pipeline;

pub use command::CommandClient;
pub use memory::MemoryClient;
pub use pipeline::PipelineClient;

use async_trait::async_trait;

use crate::error::SessionError;

/// Uniform capability interface over the underlying key-value store.
///
/// The dialect is fixed once, when the concrete client is constructed;
/// nothing above this trait branches on it afterwards.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Fetch a single value.
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    /// Write a value. A positive `ttl_secs` sets the expiry atomically with
    /// the write in one call; otherwise the key is written without expiry.
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl_secs: Option<i64>,
    ) -> Result<(), SessionError>;

    /// Reset a key's expiry. Returns `false` when the key does not exist.
    async fn expire(&self, key: &str, ttl_secs: i64) -> Result<bool, SessionError>;

    /// Fetch several values, index-aligned with `keys`; absent keys yield
    /// `None`.
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>, SessionError>;

    /// Delete the given keys, returning how many existed.
    async fn delete_many(&self, keys: &[String]) -> Result<usize, SessionError>;

    /// Enumerate keys matching a glob pattern with a cursor-based scan,
    /// issuing bounded requests of roughly `batch_size` keys each until the
    /// store reports cursor exhaustion. Every call starts a fresh cursor;
    /// the namespace is never listed in one blocking request.
    async fn scan(&self, pattern: &str, batch_size: usize) -> Result<Vec<String>, SessionError>;
}
