//! Time utilities.
//!
//! Wraps `chrono` so record timestamps are produced in one place.

/// Returns the current time as an RFC 3339 string.
///
/// This is the format stored in every record's `created_at` field.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_rfc3339_parses_back() {
        let s = now_rfc3339();
        assert!(chrono::DateTime::parse_from_rfc3339(&s).is_ok());
    }
}
