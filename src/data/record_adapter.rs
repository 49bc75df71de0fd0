//! Normalization of API payloads into canonical records
//!
//! The dashboard API is not consistent about field spelling: the same
//! member may come back as `firstName` from one endpoint and `first_name`
//! from another, and related entities arrive as nested objects. Everything
//! is folded into one canonical shape here, once, so the view model and the
//! renderers never have to guess.

use crate::data::record::{FieldValue, Record};
use crate::data::screens::{CollectionKind, ScreenPreset};
use crate::data::type_inference::TypeInference;
use anyhow::{bail, Context, Result};
use serde_json::{Map, Value as JsonValue};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// Keys under which REST envelopes commonly wrap the record array
const ENVELOPE_KEYS: &[&str] = &["data", "items", "results", "records"];

/// Convert a `snake_case` or `kebab-case` key to `camelCase`.
///
/// Keys without separators are returned as is, apart from leading
/// underscores (`_id` becomes `id`).
pub fn canonical_field_name(name: &str) -> String {
    let trimmed = name.trim_start_matches('_');
    if trimmed.is_empty() {
        return name.to_string();
    }

    if !trimmed.contains(['_', '-']) {
        return trimmed.to_string();
    }

    let mut canonical = String::with_capacity(trimmed.len());
    for (idx, segment) in trimmed
        .split(['_', '-'])
        .filter(|segment| !segment.is_empty())
        .enumerate()
    {
        let lower = segment.to_lowercase();
        if idx == 0 {
            canonical.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                canonical.extend(first.to_uppercase());
                canonical.push_str(chars.as_str());
            }
        }
    }
    canonical
}

/// Turns JSON payloads into `Record`s, optionally with a screen's aliases
#[derive(Debug, Clone, Default)]
pub struct RecordAdapter {
    preset: Option<&'static ScreenPreset>,
}

impl RecordAdapter {
    /// Adapter that only canonicalizes key spelling and flattens nesting
    pub fn new() -> Self {
        Self { preset: None }
    }

    /// Adapter that also applies a screen's aliases and derived fields
    pub fn for_kind(kind: CollectionKind) -> Self {
        Self {
            preset: Some(kind.preset()),
        }
    }

    /// Load a JSON file holding an array of objects (or an envelope around one)
    pub fn load_json_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Record>> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
        let reader = BufReader::new(file);

        let payload: JsonValue = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse JSON file: {:?}", path.as_ref()))?;

        self.normalize_payload(payload)
    }

    /// Parse and normalize a JSON document
    pub fn from_json_str(&self, json: &str) -> Result<Vec<Record>> {
        let payload: JsonValue = serde_json::from_str(json).context("Failed to parse JSON")?;
        self.normalize_payload(payload)
    }

    /// Normalize a whole response body
    pub fn normalize_payload(&self, payload: JsonValue) -> Result<Vec<Record>> {
        let items = match payload {
            JsonValue::Array(items) => items,
            JsonValue::Object(mut envelope) => self.unwrap_envelope(&mut envelope)?,
            other => bail!(
                "Expected a JSON array of records, got {}",
                json_type_name(&other)
            ),
        };

        let records = items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                self.normalize_item(item)
                    .with_context(|| format!("Invalid record at index {}", idx))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            target: "record_adapter",
            "normalized {} records{}",
            records.len(),
            self.preset
                .map(|p| format!(" for {}", p.title))
                .unwrap_or_default()
        );

        Ok(records)
    }

    /// Normalize one JSON object into a record
    pub fn normalize_item(&self, item: &JsonValue) -> Result<Record> {
        let Some(object) = item.as_object() else {
            bail!("Expected a JSON object, got {}", json_type_name(item));
        };

        let mut record = Record::new();
        self.flatten_into(&mut record, "", object);

        if let Some(preset) = self.preset {
            apply_aliases(&mut record, preset);
            apply_derived_names(&mut record, preset);
            coerce_numeric_fields(&mut record, preset);
        }

        Ok(record)
    }

    fn unwrap_envelope(&self, envelope: &mut Map<String, JsonValue>) -> Result<Vec<JsonValue>> {
        let kind_key = self.preset.map(|p| p.kind.key());
        let candidates = kind_key.into_iter().chain(ENVELOPE_KEYS.iter().copied());

        for key in candidates {
            if let Some(JsonValue::Array(items)) = envelope.remove(key) {
                debug!(target: "record_adapter", "unwrapped response envelope '{}'", key);
                return Ok(items);
            }
        }

        bail!(
            "Expected a JSON array or an object wrapping one under {:?}",
            ENVELOPE_KEYS
        )
    }

    // Keys already in canonical form go first so that `firstName` beats
    // `first_name` when both are present and non-null.
    fn flatten_into(&self, record: &mut Record, prefix: &str, object: &Map<String, JsonValue>) {
        let (canonical, other): (Vec<_>, Vec<_>) = object
            .iter()
            .partition(|(key, _)| canonical_field_name(key) == key.as_str());

        for (key, value) in canonical.into_iter().chain(other) {
            let name = format!("{}{}", prefix, canonical_field_name(key));
            match value {
                JsonValue::Object(nested) => {
                    self.flatten_into(record, &format!("{}.", name), nested);
                }
                scalar => insert_if_missing(record, name, scalar_value(scalar)),
            }
        }
    }
}

/// Fill a field unless it already holds a non-null value
fn insert_if_missing(record: &mut Record, name: String, value: FieldValue) {
    if record.get_present(&name).is_none() {
        record.insert(name, value);
    }
}

fn scalar_value(value: &JsonValue) -> FieldValue {
    match value {
        JsonValue::Null => FieldValue::Null,
        JsonValue::Bool(b) => FieldValue::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => n
                .as_f64()
                .map(FieldValue::Float)
                .unwrap_or_else(|| FieldValue::String(n.to_string())),
        },
        JsonValue::String(s) if TypeInference::looks_like_datetime(s) => {
            FieldValue::DateTime(s.clone())
        }
        JsonValue::String(s) => FieldValue::String(s.clone()),
        // Arrays are not scalars; keep their text so they stay searchable
        other => FieldValue::String(other.to_string()),
    }
}

fn apply_aliases(record: &mut Record, preset: &ScreenPreset) {
    for (alias, canonical) in preset.aliases {
        if let Some(value) = record.remove(alias) {
            insert_if_missing(record, canonical.to_string(), value);
        }
    }
}

fn apply_derived_names(record: &mut Record, preset: &ScreenPreset) {
    for (target, first, last) in preset.derived_names {
        if record.get_present(target).is_some() {
            continue;
        }

        let parts: Vec<String> = [first, last]
            .iter()
            .filter_map(|field| record.get_present(field))
            .map(|value| value.to_string().trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();

        if !parts.is_empty() {
            record.insert(*target, parts.join(" "));
        }
    }
}

fn coerce_numeric_fields(record: &mut Record, preset: &ScreenPreset) {
    for field in preset.numeric_fields {
        let Some(FieldValue::String(text)) = record.get(field) else {
            continue;
        };

        let trimmed = text.trim();
        let coerced = if let Ok(i) = trimmed.parse::<i64>() {
            FieldValue::Integer(i)
        } else if let Some(f) = trimmed.parse::<f64>().ok().filter(|f| f.is_finite()) {
            FieldValue::Float(f)
        } else {
            warn!(
                target: "record_adapter",
                "field '{}' should be numeric but holds '{}'", field, text
            );
            continue;
        };

        record.insert(*field, coerced);
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
