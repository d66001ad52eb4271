//! Record serialization

use crate::error::SessionError;
use crate::session::SessionData;

/// Converts session records to and from their stored string form.
///
/// The default [`JsonSerializer`] writes the connect-redis JSON layout. A
/// custom implementation can be plugged in at store construction, e.g. to
/// add compression, without touching any other component.
pub trait Serializer: Send + Sync {
    /// Encode a record for storage.
    fn stringify(&self, record: &SessionData) -> Result<String, SessionError>;

    /// Decode a stored payload.
    fn parse(&self, text: &str) -> Result<SessionData, SessionError>;
}

/// JSON codec matching the connect-redis storage format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn stringify(&self, record: &SessionData) -> Result<String, SessionError> {
        Ok(serde_json::to_string(record)?)
    }

    fn parse(&self, text: &str) -> Result<SessionData, SessionError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_the_fields_the_store_reads() {
        let mut record = SessionData::new("u1").with_max_age(3600);
        record.set("views", 7);

        let codec = JsonSerializer;
        let text = codec.stringify(&record).unwrap();
        let parsed = codec.parse(&text).unwrap();

        assert_eq!(parsed.user_id, record.user_id);
        assert_eq!(parsed.cookie.expires, record.cookie.expires);
        assert_eq!(parsed.get::<i32>("views"), Some(7));
        assert_eq!(parsed, record);
    }

    #[test]
    fn parses_connect_redis_payloads() {
        // Literal payload as the Node.js middleware writes it.
        let text = r#"{"cookie":{"originalMaxAge":60000,"expires":"2026-01-01T00:00:00.000Z","secure":false,"httpOnly":true,"path":"/"},"userId":"u1","views":3}"#;
        let record = JsonSerializer.parse(text).unwrap();

        assert_eq!(record.user_id, "u1");
        assert_eq!(record.cookie.original_max_age, Some(60000));
        assert!(record.cookie.http_only);
        assert_eq!(record.get::<i32>("views"), Some(3));
    }

    #[test]
    fn wire_field_names_are_camel_case() {
        let record = SessionData::new("u1");
        let text = JsonSerializer.stringify(&record).unwrap();
        assert!(text.contains(r#""userId":"u1""#));
        assert!(text.contains(r#""originalMaxAge":null"#));
        assert!(text.contains(r#""httpOnly":true"#));
    }

    #[test]
    fn malformed_payload_is_a_serialization_error() {
        let err = JsonSerializer.parse("not json").unwrap_err();
        assert!(matches!(err, SessionError::Serialization(_)));
    }
}
