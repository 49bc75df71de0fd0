use crate::data::query::{MissingValuePolicy, SortDirection};
use crate::data::record::FieldValue;
use crate::data::type_inference::TypeInference;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

/// How a sort column is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// Lower-cased lexicographic comparison
    Text,
    /// Instants; missing or unparseable values are the earliest instant
    Date,
    /// Numeric comparison with the missing-value policy applied
    Numeric,
}

impl SortKind {
    /// Classify a column from its name and the values the candidate rows hold.
    ///
    /// Any `DateTime` value makes it a date column. A timestamp-looking name
    /// does too, unless the column only ever holds numbers.
    pub fn classify<'a, I>(field: &str, values: I) -> SortKind
    where
        I: IntoIterator<Item = &'a FieldValue>,
    {
        let mut has_datetime = false;
        let mut has_numeric = false;
        let mut has_text = false;

        for value in values {
            match value {
                FieldValue::DateTime(_) => has_datetime = true,
                FieldValue::Integer(_) | FieldValue::Float(_) => has_numeric = true,
                FieldValue::String(_) => has_text = true,
                FieldValue::Boolean(_) | FieldValue::Null => {}
            }
        }

        let date_name = TypeInference::is_timestamp_field_name(field);
        if has_datetime || (date_name && (has_text || !has_numeric)) {
            SortKind::Date
        } else if has_numeric {
            SortKind::Numeric
        } else {
            SortKind::Text
        }
    }
}

/// Precomputed sort key for one row
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(String),
    Date(Option<NaiveDateTime>),
    Number(Option<f64>),
}

impl SortKey {
    /// Build the key for a value under a column's sort kind
    pub fn extract(
        value: Option<&FieldValue>,
        kind: SortKind,
        policy: MissingValuePolicy,
    ) -> SortKey {
        let value = value.filter(|v| !v.is_null());
        match kind {
            SortKind::Text => SortKey::Text(
                value
                    .map(|v| v.to_string().to_lowercase())
                    .unwrap_or_default(),
            ),
            SortKind::Date => SortKey::Date(
                value
                    .and_then(FieldValue::as_str)
                    .and_then(TypeInference::parse_instant),
            ),
            SortKind::Numeric => {
                let number = value.and_then(FieldValue::as_f64);
                match (number, policy) {
                    (None, MissingValuePolicy::TreatAsZero) => SortKey::Number(Some(0.0)),
                    (number, _) => SortKey::Number(number),
                }
            }
        }
    }
}

/// Compare two sort keys for the requested direction.
///
/// Descending reverses the comparator result, never the list, so equal keys
/// keep their input order. Missing numbers (only present under
/// `MissingValuePolicy::SortLast`) stay last in both directions.
pub fn compare_sort_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    let directed = |ordering: Ordering| match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    };

    match (a, b) {
        (SortKey::Text(a), SortKey::Text(b)) => directed(a.cmp(b)),
        // None < Some: missing dates are the earliest instant
        (SortKey::Date(a), SortKey::Date(b)) => directed(a.cmp(b)),
        (SortKey::Number(a), SortKey::Number(b)) => match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => directed(a.total_cmp(b)),
        },
        // Keys of one column always share a kind
        _ => Ordering::Equal,
    }
}

/// General ordering over field values, used to present distinct values.
///
/// Order across types: Null < Boolean < numbers < String < DateTime.
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    fn rank(value: &FieldValue) -> u8 {
        match value {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Float(_) => 2,
            FieldValue::String(_) => 3,
            FieldValue::DateTime(_) => 4,
        }
    }

    match (a, b) {
        (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
        (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
        (FieldValue::String(a), FieldValue::String(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        (FieldValue::DateTime(a), FieldValue::DateTime(b)) => TypeInference::parse_instant(a)
            .cmp(&TypeInference::parse_instant(b))
            .then_with(|| a.cmp(b)),
        (a, b) if a.is_numeric() && b.is_numeric() => {
            let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            x.total_cmp(&y)
        }
        (a, b) => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::String(s.to_string())
    }

    #[test]
    fn test_classify_columns() {
        let dates = [FieldValue::DateTime("2024-01-01".into()), FieldValue::Null];
        assert_eq!(SortKind::classify("joined", dates.iter()), SortKind::Date);

        let numbers = [FieldValue::Integer(3), FieldValue::Float(1.5)];
        assert_eq!(SortKind::classify("amount", numbers.iter()), SortKind::Numeric);

        let names = [text("Yoga"), text("Spin")];
        assert_eq!(SortKind::classify("name", names.iter()), SortKind::Text);

        // Name alone is enough when the values are unparseable strings or null
        let broken = [text("soon"), FieldValue::Null];
        assert_eq!(SortKind::classify("startDate", broken.iter()), SortKind::Date);

        // A timestamp-looking name holding only numbers stays numeric
        let epochs = [FieldValue::Integer(1_700_000_000)];
        assert_eq!(SortKind::classify("updatedAt", epochs.iter()), SortKind::Numeric);
    }

    #[test]
    fn test_text_keys_ignore_case() {
        let a = SortKey::extract(Some(&text("apple")), SortKind::Text, Default::default());
        let b = SortKey::extract(Some(&text("Banana")), SortKind::Text, Default::default());
        assert_eq!(
            compare_sort_keys(&a, &b, SortDirection::Ascending),
            Ordering::Less
        );
        assert_eq!(
            compare_sort_keys(&a, &b, SortDirection::Descending),
            Ordering::Greater
        );
    }

    #[test]
    fn test_missing_date_is_earliest() {
        let missing = SortKey::extract(None, SortKind::Date, Default::default());
        let invalid = SortKey::extract(Some(&text("n/a")), SortKind::Date, Default::default());
        let real = SortKey::extract(
            Some(&FieldValue::DateTime("1999-12-31".into())),
            SortKind::Date,
            Default::default(),
        );

        assert_eq!(missing, SortKey::Date(None));
        assert_eq!(invalid, SortKey::Date(None));
        assert_eq!(
            compare_sort_keys(&missing, &real, SortDirection::Ascending),
            Ordering::Less
        );
    }

    #[test]
    fn test_missing_number_policies() {
        let zero = SortKey::extract(None, SortKind::Numeric, MissingValuePolicy::TreatAsZero);
        assert_eq!(zero, SortKey::Number(Some(0.0)));

        let last = SortKey::extract(None, SortKind::Numeric, MissingValuePolicy::SortLast);
        let five = SortKey::Number(Some(5.0));
        assert_eq!(
            compare_sort_keys(&last, &five, SortDirection::Ascending),
            Ordering::Greater
        );
        assert_eq!(
            compare_sort_keys(&last, &five, SortDirection::Descending),
            Ordering::Greater
        );
    }

    #[test]
    fn test_nan_keys_keep_a_total_order() {
        let mut keys: Vec<SortKey> = [3.0, f64::NAN, 1.0, 2.0]
            .into_iter()
            .map(|n| SortKey::Number(Some(n)))
            .collect();
        keys.sort_by(|a, b| compare_sort_keys(a, b, SortDirection::Ascending));

        let numbers: Vec<f64> = keys
            .iter()
            .filter_map(|key| match key {
                SortKey::Number(n) => *n,
                _ => None,
            })
            .collect();
        assert_eq!(&numbers[..3], &[1.0, 2.0, 3.0]);
        assert!(numbers[3].is_nan());

        assert_eq!(
            compare_values(&FieldValue::Float(f64::NAN), &FieldValue::Integer(1)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_values_across_types() {
        assert_eq!(
            compare_values(&FieldValue::Null, &FieldValue::Boolean(false)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&FieldValue::Integer(2), &FieldValue::Float(1.5)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&FieldValue::Float(9.0), &text("a")),
            Ordering::Less
        );
        assert_eq!(compare_values(&text("active"), &text("Inactive")), Ordering::Less);
    }
}
