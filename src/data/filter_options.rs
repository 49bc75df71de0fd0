use crate::data::query::ALL_SENTINEL;
use crate::data::record::{FieldValue, Record};
use crate::data::screens::ScreenPreset;
use crate::data::value_compare::compare_values;
use std::collections::HashMap;

/// One entry of a filter select
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    /// Value sent back as the filter; `None` for the "all" entry
    pub value: Option<FieldValue>,
    pub label: String,
    /// Number of records carrying this value
    pub count: usize,
}

impl FilterOption {
    /// Text a select would submit for this option
    pub fn select_value(&self) -> String {
        match &self.value {
            Some(value) => value.to_string(),
            None => ALL_SENTINEL.to_string(),
        }
    }
}

/// Options for a filter select over `field`, led by an "All" entry.
///
/// With `case_insensitive` set, spellings differing only in case share one
/// option labelled with the first spelling seen.
pub fn filter_options(
    records: &[Record],
    field: &str,
    case_insensitive: bool,
) -> Vec<FilterOption> {
    let mut options: Vec<FilterOption> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for value in records.iter().filter_map(|r| r.get_present(field)) {
        let key = if case_insensitive {
            value.to_string().to_lowercase()
        } else {
            format!("{}:{}", value.type_name(), value)
        };

        match positions.get(&key) {
            Some(&idx) => options[idx].count += 1,
            None => {
                positions.insert(key, options.len());
                options.push(FilterOption {
                    label: value.to_string(),
                    value: Some(value.clone()),
                    count: 1,
                });
            }
        }
    }

    options.sort_by(|a, b| match (&a.value, &b.value) {
        (Some(a), Some(b)) => compare_values(a, b),
        _ => std::cmp::Ordering::Equal,
    });

    let mut all = vec![FilterOption {
        value: None,
        label: "All".to_string(),
        count: options.iter().map(|o| o.count).sum(),
    }];
    all.extend(options);
    all
}

/// Filter options for every category select a screen offers
pub fn screen_filter_options(
    records: &[Record],
    preset: &ScreenPreset,
) -> Vec<(&'static str, Vec<FilterOption>)> {
    preset
        .category_fields
        .iter()
        .map(|field| (*field, filter_options(records, field, true)))
        .collect()
}
