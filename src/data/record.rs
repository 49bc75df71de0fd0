use serde::{Deserialize, Serialize};
use std::fmt;

/// A single scalar value held by a record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(String), // Original text, parsed to an instant when compared
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Integer(_) | FieldValue::Float(_))
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text view of string-like values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) | FieldValue::DateTime(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the variant, used in log output and table headers
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::Null => "null",
        }
    }

    /// Type-aware equality used by field filters.
    ///
    /// Integers and floats compare numerically, everything else only matches
    /// a value of the same variant. Strings are compared case-sensitively.
    pub fn matches_exactly(&self, expected: &FieldValue) -> bool {
        match (self, expected) {
            (FieldValue::Integer(a), FieldValue::Float(b))
            | (FieldValue::Float(b), FieldValue::Integer(a)) => (*a as f64) == *b,
            (FieldValue::Null, _) | (_, FieldValue::Null) => false,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::DateTime(dt) => write!(f, "{}", dt),
            FieldValue::Null => write!(f, ""),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

/// One row of dashboard data (a class, a member, a payment, ...)
///
/// Fields keep their insertion order so that tables render columns the way
/// the payload listed them. Lookups are linear, which is fine for the handful
/// of fields a dashboard row carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field, returning the previous value
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Value of a field that is present and not null
    pub fn get_present(&self, name: &str) -> Option<&FieldValue> {
        self.get(name).filter(|value| !value.is_null())
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display text for a field, empty when absent or null
    pub fn display_value(&self, name: &str) -> String {
        self.get(name).map(|v| v.to_string()).unwrap_or_default()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Union of field names across records, in first-seen order
pub fn collect_field_names(records: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for name in record.field_names() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_existing_field() {
        let mut record = Record::new().with("name", "Yoga");
        let previous = record.insert("name", "Pilates");

        assert_eq!(previous, Some(FieldValue::String("Yoga".to_string())));
        assert_eq!(record.len(), 1);
        assert_eq!(record.display_value("name"), "Pilates");
    }

    #[test]
    fn test_field_order_is_preserved() {
        let record = Record::new()
            .with("status", "active")
            .with("name", "Spin")
            .with("capacity", 20i64);

        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["status", "name", "capacity"]);
    }

    #[test]
    fn test_null_is_not_present() {
        let record = Record::new().with("date", FieldValue::Null);
        assert!(record.contains_field("date"));
        assert!(record.get_present("date").is_none());
    }

    #[test]
    fn test_numeric_exact_match_across_variants() {
        assert!(FieldValue::Integer(3).matches_exactly(&FieldValue::Float(3.0)));
        assert!(!FieldValue::String("3".into()).matches_exactly(&FieldValue::Integer(3)));
        assert!(!FieldValue::Null.matches_exactly(&FieldValue::Null));
        assert!(!FieldValue::String("Active".into())
            .matches_exactly(&FieldValue::String("active".into())));
    }

    #[test]
    fn test_collect_field_names_unions_in_order() {
        let records = vec![
            Record::new().with("a", 1i64).with("b", 2i64),
            Record::new().with("c", 3i64).with("a", 4i64),
        ];
        assert_eq!(collect_field_names(&records), vec!["a", "b", "c"]);
    }
}
