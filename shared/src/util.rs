/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a new record key (32 lowercase hex chars, UUID v4).
pub fn new_record_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Normalize a caller-supplied record key.
///
/// Accepts both hyphenated and simple UUID forms and returns the simple
/// form used for storage, or `None` when the input is not a valid key.
pub fn parse_record_key(raw: &str) -> Option<String> {
    uuid::Uuid::try_parse(raw.trim())
        .ok()
        .map(|id| id.simple().to_string())
}

/// Render a millisecond timestamp as RFC 3339 (UTC).
pub fn millis_to_rfc3339(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_key_is_parseable() {
        let key = new_record_key();
        assert_eq!(key.len(), 32);
        assert_eq!(parse_record_key(&key).as_deref(), Some(key.as_str()));
    }

    #[test]
    fn test_parse_record_key_normalizes_hyphenated() {
        let key = parse_record_key("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(key, "67e5504410b1426f9247bb680e5fe0c8");
    }

    #[test]
    fn test_parse_record_key_rejects_garbage() {
        assert!(parse_record_key("not-an-id").is_none());
        assert!(parse_record_key("").is_none());
        assert!(parse_record_key("12345").is_none());
    }

    #[test]
    fn test_millis_to_rfc3339() {
        assert_eq!(millis_to_rfc3339(0), "1970-01-01T00:00:00+00:00");
    }
}
