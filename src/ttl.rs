//! TTL derivation for session records

use std::fmt;
use std::sync::Arc;

use chrono::Utc;

use crate::session::SessionData;

/// Default session lifetime in seconds (one day).
pub const ONE_DAY: i64 = 86_400;

/// How the store derives a record's time-to-live.
///
/// A resolved TTL of zero or less means "do not persist": `save` destroys
/// the session instead of writing it.
#[derive(Clone)]
pub enum SessionTtl {
    /// Derive the TTL from the record's cookie expiry, falling back to this
    /// many seconds when the cookie has none.
    Seconds(i64),
    /// Compute the TTL from the record itself. The result may be any
    /// integer, including zero or negative.
    Resolver(Arc<dyn Fn(&SessionData) -> i64 + Send + Sync>),
}

impl SessionTtl {
    /// Effective TTL in seconds for `record`.
    ///
    /// Cookie-derived values are `ceil((expires - now) / 1s)`, so a record a
    /// few hundred milliseconds from expiry still counts one second, and an
    /// already-expired record goes non-positive.
    pub fn resolve(&self, record: &SessionData) -> i64 {
        match self {
            SessionTtl::Resolver(resolver) => resolver(record),
            SessionTtl::Seconds(fallback) => match record.cookie.expires {
                Some(expires) => {
                    let remaining_ms = (expires - Utc::now()).num_milliseconds();
                    (remaining_ms + 999).div_euclid(1000)
                }
                None => *fallback,
            },
        }
    }
}

impl Default for SessionTtl {
    fn default() -> Self {
        SessionTtl::Seconds(ONE_DAY)
    }
}

impl fmt::Debug for SessionTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionTtl::Seconds(secs) => f.debug_tuple("Seconds").field(secs).finish(),
            SessionTtl::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionCookie;

    fn record_expiring_in_ms(ms: i64) -> SessionData {
        let mut record = SessionData::new("u1");
        record.cookie = SessionCookie {
            expires: Some(Utc::now() + chrono::Duration::milliseconds(ms)),
            ..Default::default()
        };
        record
    }

    #[test]
    fn static_fallback_without_cookie_expiry() {
        let record = SessionData::new("u1");
        assert_eq!(SessionTtl::default().resolve(&record), ONE_DAY);
        assert_eq!(SessionTtl::Seconds(300).resolve(&record), 300);
    }

    #[test]
    fn cookie_expiry_rounds_up() {
        // 4.5s remaining still counts as 5 whole seconds.
        let record = record_expiring_in_ms(4500);
        assert_eq!(SessionTtl::default().resolve(&record), 5);
    }

    #[test]
    fn expired_cookie_goes_non_positive() {
        let record = record_expiring_in_ms(-5000);
        assert!(SessionTtl::default().resolve(&record) <= 0);
    }

    #[test]
    fn resolver_wins_over_cookie_expiry() {
        let record = record_expiring_in_ms(-5000);
        let ttl = SessionTtl::Resolver(Arc::new(|_| 42));
        assert_eq!(ttl.resolve(&record), 42);
    }

    #[test]
    fn resolver_receives_the_record() {
        let mut record = SessionData::new("u1");
        record.set("tier", "premium");
        let ttl = SessionTtl::Resolver(Arc::new(|r: &SessionData| {
            if r.get::<String>("tier").as_deref() == Some("premium") {
                7200
            } else {
                600
            }
        }));
        assert_eq!(ttl.resolve(&record), 7200);
    }
}
