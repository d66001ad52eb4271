//! Session store error types

use std::fmt;

/// Errors that can occur during session store operations.
///
/// A missing session is not an error and never surfaces here; reads report
/// it as `Ok(None)` and deletes of absent sessions succeed as no-ops.
#[derive(Debug)]
pub enum SessionError {
    /// Error from the underlying Redis client
    Redis(redis::RedisError),
    /// Error while encoding or decoding a session record
    Serialization(String),
    /// Error from a custom client or serializer
    Store(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Redis(e) => write!(f, "Redis error: {}", e),
            SessionError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            SessionError::Store(msg) => write!(f, "Session store error: {}", msg),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<redis::RedisError> for SessionError {
    fn from(err: redis::RedisError) -> Self {
        SessionError::Redis(err)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}
