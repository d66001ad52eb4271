//! Session store trait

use async_trait::async_trait;

use crate::error::SessionError;
use crate::session::{SessionData, SessionEntry};

/// Contract a session middleware drives a pluggable backend through.
///
/// `load`/`save`/`touch`/`destroy` carry the per-request lifecycle; the
/// remaining operations are maintenance surface a backend may opt into.
/// A missing session is never an error: `load` yields `Ok(None)` and
/// `destroy` of an absent session succeeds as a no-op.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Fetch a session by id.
    async fn load(&self, sid: &str) -> Result<Option<SessionData>, SessionError>;

    /// Create or overwrite a session. The record's effective TTL decides
    /// whether it is persisted at all: a non-positive TTL destroys the
    /// session instead of writing it.
    async fn save(&self, sid: &str, record: &SessionData) -> Result<(), SessionError>;

    /// Refresh a session's expiry without rewriting its payload.
    async fn touch(&self, sid: &str, record: &SessionData) -> Result<(), SessionError>;

    /// Remove a session.
    async fn destroy(&self, sid: &str) -> Result<(), SessionError>;

    /// Remove every session in the store's namespace (optional).
    async fn clear(&self) -> Result<(), SessionError> {
        Err(SessionError::Store("clear not implemented".to_string()))
    }

    /// Remove every session belonging to one user (optional).
    async fn clear_for_user(&self, user_id: &str) -> Result<(), SessionError> {
        let _ = user_id;
        Err(SessionError::Store("clear_for_user not implemented".to_string()))
    }

    /// Count live sessions (optional).
    async fn length(&self) -> Result<usize, SessionError> {
        Err(SessionError::Store("length not implemented".to_string()))
    }

    /// List live session ids (optional).
    async fn ids(&self) -> Result<Vec<String>, SessionError> {
        Err(SessionError::Store("ids not implemented".to_string()))
    }

    /// Fetch every live session together with its id (optional).
    async fn all(&self) -> Result<Vec<SessionEntry>, SessionError> {
        Err(SessionError::Store("all not implemented".to_string()))
    }
}
