//! # redis-session-store
//!
//! Connect-redis compatible session persistence for Redis, with a secondary
//! per-user index so all of a user's sessions can be invalidated together.
//!
//! Records are stored in the same format as the Node.js connect-redis
//! package (JSON payload under `prefix + session_id`), so pre-existing data
//! in the same namespace keeps working.
//!
//! ## Features
//!
//! - **Connect-redis compatible storage**: same key layout and JSON payload
//!   as the Node.js package
//! - **Per-user session index**: `clear_for_user` finds and removes every
//!   session of one user with a single prefix scan
//! - **Two client dialects**: high-level typed commands or raw positional
//!   commands, normalized behind one capability interface
//! - **Cursor-based enumeration**: bulk operations scan the namespace in
//!   bounded batches instead of blocking the store
//! - **Pluggable codec and TTL policy**: swap the payload serializer or
//!   derive TTLs from the record itself
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use redis_session_store::{CommandClient, RedisStore, SessionData, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CommandClient::from_url("redis://127.0.0.1/").await?;
//!     let store = RedisStore::new(client);
//!
//!     let mut record = SessionData::new("alice").with_max_age(3600);
//!     record.set("views", 1);
//!     store.save("sid-1", &record).await?;
//!
//!     let loaded = store.load("sid-1").await?;
//!     assert!(loaded.is_some());
//!
//!     // Invalidate everything alice has open.
//!     store.clear_for_user("alice").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod keys;
pub mod serializer;
pub mod session;
pub mod store;
pub mod ttl;

pub use client::{CommandClient, MemoryClient, PipelineClient, StoreClient};
pub use error::SessionError;
pub use keys::KeyScheme;
pub use serializer::{JsonSerializer, Serializer};
pub use session::{SessionCookie, SessionData, SessionEntry};
pub use store::{RedisStore, SessionStore};
pub use ttl::{SessionTtl, ONE_DAY};
