//! Query parameters driving a collection view
//!
//! A `QueryParams` value is rebuilt by the host on every interaction
//! (keystroke in the search box, filter choice, column header click, page
//! change) and handed to `compute_view` together with the records.

use crate::data::record::FieldValue;
use crate::data::type_inference::TypeInference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value of a filter select meaning "no constraint"
pub const ALL_SENTINEL: &str = "all";

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction for the sort column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(anyhow::anyhow!("Unknown sort direction '{}'", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// How missing numeric values take part in a sort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Missing numbers sort as if they were 0
    #[default]
    TreatAsZero,
    /// Missing numbers go after every present value, whatever the direction
    SortLast,
}

impl FromStr for MissingValuePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" | "treat_as_zero" => Ok(MissingValuePolicy::TreatAsZero),
            "last" | "sort_last" => Ok(MissingValuePolicy::SortLast),
            other => Err(anyhow::anyhow!("Unknown missing-value policy '{}'", other)),
        }
    }
}

/// How the search term is matched against search fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring match
    #[default]
    Substring,
    /// Skim-style fuzzy match
    Fuzzy,
}

/// Constraint on a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldFilter {
    /// The "all" choice of a filter select
    All,
    /// Type-aware exact match, case-sensitive for strings
    Equals(FieldValue),
    /// Case-insensitive match for category fields such as status
    Category(String),
}

impl FieldFilter {
    /// Build an exact filter from select text, mapping "all" to the sentinel
    pub fn from_select(value: &str) -> Self {
        if value.eq_ignore_ascii_case(ALL_SENTINEL) {
            FieldFilter::All
        } else {
            FieldFilter::Equals(TypeInference::infer_from_string(value))
        }
    }

    /// Build a category filter from select text, mapping "all" to the sentinel
    pub fn category(value: &str) -> Self {
        if value.eq_ignore_ascii_case(ALL_SENTINEL) {
            FieldFilter::All
        } else {
            FieldFilter::Category(value.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FieldFilter::All)
    }

    /// Whether a field value (None when absent) satisfies this filter
    pub fn accepts(&self, value: Option<&FieldValue>) -> bool {
        match self {
            FieldFilter::All => true,
            FieldFilter::Equals(expected) => {
                value.is_some_and(|actual| actual.matches_exactly(expected))
            }
            FieldFilter::Category(expected) => match value {
                Some(FieldValue::Null) | None => false,
                Some(actual) => actual.to_string().to_lowercase() == expected.to_lowercase(),
            },
        }
    }
}

/// The user-controlled search, filter, sort and page state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub search_term: String,
    pub search_fields: Vec<String>,
    pub field_filters: BTreeMap<String, FieldFilter>,
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
    /// 1-based page index
    pub page: usize,
    pub page_size: usize,
    pub missing_values: MissingValuePolicy,
    pub search_mode: SearchMode,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            search_fields: Vec::new(),
            field_filters: BTreeMap::new(),
            sort_field: None,
            sort_direction: SortDirection::Ascending,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            missing_values: MissingValuePolicy::TreatAsZero,
            search_mode: SearchMode::Substring,
        }
    }
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search<I, S>(mut self, term: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_term = term.into();
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, filter: FieldFilter) -> Self {
        self.field_filters.insert(field.into(), filter);
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = Some(field.into());
        self.sort_direction = direction;
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    pub fn with_search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Column header click: same column flips direction, a new column starts ascending
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_field.as_deref() == Some(field) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = Some(field.to_string());
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Whether any search or non-"all" filter is active
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.is_empty() || self.field_filters.values().any(|f| !f.is_all())
    }
}
