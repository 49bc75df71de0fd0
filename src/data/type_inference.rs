//! Scalar type inference shared by the record adapter and the CLI
//!
//! Payloads from the dashboard API carry dates as plain strings, and CLI
//! filter values arrive as text. Both go through the same detection here so
//! that a value typed on the command line compares equal to the value that
//! was loaded from JSON.

use crate::data::record::FieldValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Static compiled regex patterns for date detection
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // YYYY-MM-DD (year must be 19xx or 20xx, month 01-12, day 01-31)
        Regex::new(r"^(19|20)\d{2}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap(),
        // MM/DD/YYYY
        Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12]\d|3[01])/(19|20)\d{2}$").unwrap(),
        // DD/MM/YYYY
        Regex::new(r"^(0[1-9]|[12]\d|3[01])/(0[1-9]|1[0-2])/(19|20)\d{2}$").unwrap(),
        // DD-MM-YYYY
        Regex::new(r"^(0[1-9]|[12]\d|3[01])-(0[1-9]|1[0-2])-(19|20)\d{2}$").unwrap(),
        // YYYY/MM/DD
        Regex::new(r"^(19|20)\d{2}/(0[1-9]|1[0-2])/(0[1-9]|[12]\d|3[01])$").unwrap(),
        // YYYY-MM-DDTHH:MM[:SS] or with a space separator, optional fraction and zone
        Regex::new(
            r"^(19|20)\d{2}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$",
        )
        .unwrap(),
    ]
});

// `%#z` takes `Z`, `+02:00` and `+0200`
const ZONED_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// Month-first wins for slashed dates; a value that is only valid day-first
// (13/01/2024) still parses through the second format.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Type inference utilities
pub struct TypeInference;

impl TypeInference {
    /// Infer a typed value from raw text.
    ///
    /// Order of checks matters: booleans and numbers are cheap, the date
    /// regexes run last.
    pub fn infer_from_string(value: &str) -> FieldValue {
        if value.is_empty() {
            return FieldValue::Null;
        }

        if value.eq_ignore_ascii_case("true") {
            return FieldValue::Boolean(true);
        }
        if value.eq_ignore_ascii_case("false") {
            return FieldValue::Boolean(false);
        }

        if let Ok(i) = value.parse::<i64>() {
            return FieldValue::Integer(i);
        }

        if let Ok(f) = value.parse::<f64>() {
            if f.is_finite() {
                return FieldValue::Float(f);
            }
        }

        if Self::looks_like_datetime(value) {
            return FieldValue::DateTime(value.to_string());
        }

        FieldValue::String(value.to_string())
    }

    /// Check if a string looks like a datetime value
    ///
    /// Uses strict patterns so that identifiers like "MBR-2024-001" stay strings.
    pub fn looks_like_datetime(value: &str) -> bool {
        if value.len() < 8 || value.len() > 35 {
            return false;
        }

        DATE_PATTERNS.iter().any(|pattern| pattern.is_match(value))
    }

    /// Parse a timestamp string into a naive UTC instant
    pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_utc());
        }

        for format in ZONED_DATE_TIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(value, format) {
                return Some(dt.naive_utc());
            }
        }

        for format in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Some(dt);
            }
        }

        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    /// Whether a field name reads like a timestamp column
    /// (`joinDate`, `payment_date`, `createdAt`, `checkInTime`, `timestamp`)
    pub fn is_timestamp_field_name(name: &str) -> bool {
        // Only the last path segment of flattened names counts
        let leaf = name.rsplit('.').next().unwrap_or(name);
        let lower = leaf.to_ascii_lowercase();

        lower == "date"
            || lower.ends_with("date")
            || lower.ends_with("time")
            || lower.ends_with("timestamp")
            || lower.ends_with("_at")
            || (leaf.ends_with("At") && leaf.len() > 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_basic_type_inference() {
        assert_eq!(
            TypeInference::infer_from_string("123"),
            FieldValue::Integer(123)
        );
        assert_eq!(
            TypeInference::infer_from_string("45.5"),
            FieldValue::Float(45.5)
        );
        assert_eq!(
            TypeInference::infer_from_string("TRUE"),
            FieldValue::Boolean(true)
        );
        assert_eq!(
            TypeInference::infer_from_string("active"),
            FieldValue::String("active".to_string())
        );
        assert_eq!(TypeInference::infer_from_string(""), FieldValue::Null);
        assert_eq!(
            TypeInference::infer_from_string("NaN"),
            FieldValue::String("NaN".to_string())
        );
    }

    #[test]
    fn test_datetime_detection() {
        assert!(TypeInference::looks_like_datetime("2024-01-15"));
        assert!(TypeInference::looks_like_datetime("01/15/2024"));
        assert!(TypeInference::looks_like_datetime("2024-01-15T10:30:00"));
        assert!(TypeInference::looks_like_datetime("2024-01-15T10:30:00.123Z"));
        assert!(TypeInference::looks_like_datetime("2024-01-15 10:30"));
        assert!(TypeInference::looks_like_datetime("2024-01-15T10:30:00+02:00"));
    }

    #[test]
    fn test_every_detected_datetime_parses() {
        let detected = [
            "2024-01-15",
            "01/15/2024",
            "15/01/2024",
            "15-01-2024",
            "2024/01/15",
            "2024-01-15T10:30",
            "2024-01-15 10:30",
            "2024-01-15T10:30Z",
            "2024-01-15T10:30+02:00",
            "2024-01-15T10:30-0500",
            "2024-01-15T10:30:00",
            "2024-01-15 10:30:00.250",
            "2024-01-15T10:30:00Z",
            "2024-01-15T10:30:00.123Z",
            "2024-01-15T10:30:00+02:00",
            "2024-01-15T10:30:00+0200",
            "2024-01-15 10:30:00-05:00",
        ];

        for value in detected {
            assert!(TypeInference::looks_like_datetime(value), "{} not detected", value);
            assert!(
                TypeInference::parse_instant(value).is_some(),
                "{} detected but not parsed",
                value
            );
        }
    }

    #[test]
    fn test_id_strings_not_detected_as_datetime() {
        assert!(!TypeInference::looks_like_datetime("MBR-2024-001"));
        assert!(!TypeInference::looks_like_datetime("2024-ABC-123"));
        assert!(!TypeInference::looks_like_datetime("2024-13-01"));
        assert!(!TypeInference::looks_like_datetime("2024-01-32"));
    }

    #[test]
    fn test_parse_instant_formats() {
        let plain = TypeInference::parse_instant("2024-03-05").unwrap();
        assert_eq!(plain.to_string(), "2024-03-05 00:00:00");

        let zoned = TypeInference::parse_instant("2024-03-05T10:00:00+02:00").unwrap();
        assert_eq!(zoned.hour(), 8);

        let us = TypeInference::parse_instant("03/05/2024").unwrap();
        assert_eq!(us.to_string(), "2024-03-05 00:00:00");

        let day_first = TypeInference::parse_instant("13/05/2024").unwrap();
        assert_eq!(day_first.to_string(), "2024-05-13 00:00:00");

        let compact_offset = TypeInference::parse_instant("2024-03-05T10:00:00+0200").unwrap();
        assert_eq!(compact_offset, zoned);

        let minutes_utc = TypeInference::parse_instant("2024-03-05T10:30Z").unwrap();
        assert_eq!(minutes_utc.to_string(), "2024-03-05 10:30:00");

        let minutes_zoned = TypeInference::parse_instant("2024-03-05 10:30+02:00").unwrap();
        assert_eq!(minutes_zoned.to_string(), "2024-03-05 08:30:00");

        assert!(TypeInference::parse_instant("not a date").is_none());
        assert!(TypeInference::parse_instant("").is_none());
    }

    #[test]
    fn test_timestamp_field_names() {
        assert!(TypeInference::is_timestamp_field_name("joinDate"));
        assert!(TypeInference::is_timestamp_field_name("payment_date"));
        assert!(TypeInference::is_timestamp_field_name("createdAt"));
        assert!(TypeInference::is_timestamp_field_name("created_at"));
        assert!(TypeInference::is_timestamp_field_name("checkInTime"));
        assert!(TypeInference::is_timestamp_field_name("member.joinDate"));
        assert!(!TypeInference::is_timestamp_field_name("name"));
        assert!(!TypeInference::is_timestamp_field_name("format"));
        assert!(!TypeInference::is_timestamp_field_name("status"));
    }
}
