//! Session record structures compatible with express-session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Cookie metadata sub-field of a session record, in the express-session
/// wire layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    /// Original max age in milliseconds, as set when the cookie was issued
    pub original_max_age: Option<i64>,

    /// Expiration time; `None` means a browser-session cookie
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,

    /// Secure flag
    #[serde(default)]
    pub secure: bool,

    /// HttpOnly flag
    #[serde(default = "default_http_only")]
    pub http_only: bool,

    /// Cookie path
    #[serde(default = "default_path")]
    pub path: String,

    /// Cookie domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// SameSite attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

fn default_http_only() -> bool {
    true
}

fn default_path() -> String {
    "/".to_string()
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            original_max_age: None,
            expires: None,
            secure: false,
            http_only: true,
            path: "/".to_string(),
            domain: None,
            same_site: None,
        }
    }
}

impl SessionCookie {
    /// Create a cookie expiring `max_age_secs` from now.
    pub fn new(max_age_secs: u64) -> Self {
        let max_age_ms = (max_age_secs * 1000) as i64;
        let expires = Utc::now() + chrono::Duration::seconds(max_age_secs as i64);

        Self {
            original_max_age: Some(max_age_ms),
            expires: Some(expires),
            ..Default::default()
        }
    }

    /// Remaining lifetime in milliseconds, negative once past expiry.
    pub fn max_age(&self) -> Option<i64> {
        self.expires.map(|exp| (exp - Utc::now()).num_milliseconds())
    }

    /// Whether the expiry timestamp has passed.
    pub fn is_expired(&self) -> bool {
        match self.expires {
            Some(exp) => exp < Utc::now(),
            None => false, // No expiry = browser session
        }
    }
}

/// A session record as persisted by the store.
///
/// The store only interprets two fields: `user_id` (to maintain the per-user
/// index) and `cookie.expires` (to derive the TTL). Everything else is an
/// opaque, serde-flattened document carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    /// Cookie metadata
    pub cookie: SessionCookie,

    /// Owner of this session; key of the per-user index
    #[serde(default)]
    pub user_id: String,

    /// Additional session data, flattened at the same level as `cookie`
    #[serde(flatten)]
    pub data: HashMap<String, Value>,
}

impl SessionData {
    /// Create a record for the given user with a browser-session cookie.
    pub fn new<S: Into<String>>(user_id: S) -> Self {
        Self {
            cookie: SessionCookie::default(),
            user_id: user_id.into(),
            data: HashMap::new(),
        }
    }

    /// Give the record's cookie an expiry `max_age_secs` from now.
    pub fn with_max_age(mut self, max_age_secs: u64) -> Self {
        self.cookie = SessionCookie::new(max_age_secs);
        self
    }

    /// Get a value from the session data.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in the session data.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.data.insert(key.to_string(), v);
        }
    }

    /// Remove a value from the session data.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Check if a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

/// A session record paired with the id it is stored under, as returned by
/// enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    /// Bare session id, with the key prefix already stripped
    pub id: String,
    /// The decoded record
    pub record: SessionData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_expiry() {
        let cookie = SessionCookie::new(3600);
        assert!(!cookie.is_expired());
        assert!(cookie.max_age().is_some_and(|ms| ms > 3_500_000));

        let past = SessionCookie {
            expires: Some(Utc::now() - chrono::Duration::seconds(5)),
            ..Default::default()
        };
        assert!(past.is_expired());
    }

    #[test]
    fn typed_data_access() {
        let mut record = SessionData::new("alice");
        record.set("views", 3);
        record.set("theme", "dark");

        assert_eq!(record.get::<i32>("views"), Some(3));
        assert_eq!(record.get::<String>("theme"), Some("dark".to_string()));
        assert!(record.contains("views"));

        record.remove("views");
        assert!(!record.contains("views"));
    }

    #[test]
    fn user_id_defaults_to_empty_on_legacy_records() {
        // Records written before the index existed carry no userId field.
        let record: SessionData = serde_json::from_str(r#"{"cookie":{"originalMaxAge":null}}"#)
            .expect("legacy record should decode");
        assert_eq!(record.user_id, "");
    }
}
