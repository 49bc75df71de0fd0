use crate::data::collection_view::CollectionView;
use crate::data::record::{FieldValue, Record};
use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Which rows of a view an export covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// Only the rows on the current page
    CurrentPage,
    /// Every row passing the filters, in sort order
    #[default]
    AllFiltered,
}

/// Handles exporting a collection view to various formats
pub struct DataExporter;

impl DataExporter {
    fn rows<'a>(view: &CollectionView<'a>, scope: ExportScope) -> Vec<&'a Record> {
        match scope {
            ExportScope::CurrentPage => view.page_slice(),
            ExportScope::AllFiltered => view.filtered_sorted(),
        }
    }

    /// Write rows as CSV with the given columns, returning the row count
    pub fn write_csv<W: Write>(rows: &[&Record], columns: &[String], writer: W) -> Result<usize> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(columns)?;

        for record in rows {
            wtr.write_record(columns.iter().map(|column| record.display_value(column)))?;
        }

        wtr.flush()?;
        Ok(rows.len())
    }

    /// Export a view to a CSV file
    pub fn export_view_to_csv(
        view: &CollectionView<'_>,
        columns: &[String],
        scope: ExportScope,
        path: &Path,
    ) -> Result<String> {
        let rows = Self::rows(view, scope);
        if rows.is_empty() {
            return Err(anyhow!("No data to export"));
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {:?}", path))?;
        let count = Self::write_csv(&rows, columns, file)?;

        info!(target: "export", "exported {} rows to {:?}", count, path);
        Ok(format!(
            "✓ Exported {} rows to CSV file: {}",
            count,
            path.display()
        ))
    }

    /// Export a view to a JSON file holding an array of objects
    pub fn export_view_to_json(
        view: &CollectionView<'_>,
        scope: ExportScope,
        path: &Path,
    ) -> Result<String> {
        let rows = Self::rows(view, scope);
        if rows.is_empty() {
            return Err(anyhow!("No data to export"));
        }

        let json_array = Self::to_json_values(&rows);
        let file = File::create(path)
            .with_context(|| format!("Failed to create JSON file: {:?}", path))?;
        serde_json::to_writer_pretty(file, &json_array)?;

        info!(target: "export", "exported {} rows to {:?}", rows.len(), path);
        Ok(format!(
            "✓ Exported {} rows to JSON file: {}",
            rows.len(),
            path.display()
        ))
    }

    /// Convert records back to JSON objects, keeping value types
    pub fn to_json_values(rows: &[&Record]) -> Vec<Value> {
        rows.iter()
            .map(|record| {
                let mut obj = Map::new();
                for (name, value) in record.iter() {
                    obj.insert(name.to_string(), Self::field_to_json(value));
                }
                Value::Object(obj)
            })
            .collect()
    }

    fn field_to_json(value: &FieldValue) -> Value {
        match value {
            FieldValue::String(s) | FieldValue::DateTime(s) => Value::String(s.clone()),
            FieldValue::Integer(i) => Value::Number((*i).into()),
            FieldValue::Float(f) => Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Null => Value::Null,
        }
    }
}
