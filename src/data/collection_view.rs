use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt;
use std::ops::Range;
use tracing::debug;

use crate::data::query::{MissingValuePolicy, QueryParams, SearchMode, SortDirection};
use crate::data::record::Record;
use crate::data::value_compare::{compare_sort_keys, SortKey, SortKind};

/// The derived, render-ready projection of a record set.
///
/// Holds row indices into the borrowed records rather than copies, the same
/// way a table view keeps `visible_rows` over its source. Nothing is cached
/// between calls: every `compute_view` builds a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionView<'a> {
    /// The records exactly as the data-fetch layer delivered them
    source: &'a [Record],

    /// Indices of rows passing the filters, in sort order
    visible_rows: Vec<usize>,

    /// Requested 1-based page and the page size actually used
    page: usize,
    page_size: usize,

    /// Range of `visible_rows` shown on the requested page
    page_range: Range<usize>,
}

pub type ViewResult<'a> = CollectionView<'a>;

/// Derive the rows to render from fetched records and the current query.
///
/// Filter, then stable sort, then slice the requested page. Pure and total:
/// out-of-range pages give an empty slice, a zero page size is treated as 1
/// and a sort field no row carries leaves the order untouched.
pub fn compute_view<'a>(records: &'a [Record], params: &QueryParams) -> CollectionView<'a> {
    let filter = RecordFilter::new(params);
    let mut view = CollectionView::new(records).filter(|record| filter.matches(record));

    if let Some(field) = params.sort_field.as_deref() {
        view = view.sort_by(field, params.sort_direction, params.missing_values);
    }

    let view = view.paginate(params.page, params.page_size);

    debug!(
        target: "collection_view",
        "view computed: {} of {} rows match, page {}/{} shows {}",
        view.total_filtered(),
        records.len(),
        view.page(),
        view.total_pages(),
        view.page_range.len()
    );

    view
}

/// Whether a single record passes the field filters and the search predicate
pub fn matches_filters(record: &Record, params: &QueryParams) -> bool {
    RecordFilter::new(params).matches(record)
}

/// Clamp a requested page into `[1, total_pages]` (1 when there are no pages)
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Filter predicate compiled once per query
pub struct RecordFilter<'p> {
    params: &'p QueryParams,
    term: String,
    fuzzy: Option<SkimMatcherV2>,
}

impl<'p> RecordFilter<'p> {
    pub fn new(params: &'p QueryParams) -> Self {
        let fuzzy = match params.search_mode {
            SearchMode::Fuzzy => Some(SkimMatcherV2::default().ignore_case()),
            SearchMode::Substring => None,
        };

        Self {
            params,
            term: params.search_term.to_lowercase(),
            fuzzy,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.passes_field_filters(record) && self.passes_search(record)
    }

    fn passes_field_filters(&self, record: &Record) -> bool {
        self.params
            .field_filters
            .iter()
            .all(|(field, filter)| filter.accepts(record.get(field)))
    }

    fn passes_search(&self, record: &Record) -> bool {
        if self.params.search_term.is_empty() {
            return true;
        }

        self.params.search_fields.iter().any(|field| {
            let Some(value) = record.get_present(field) else {
                return false;
            };
            let text = value.to_string();
            match &self.fuzzy {
                Some(matcher) => matcher
                    .fuzzy_match(&text, &self.params.search_term)
                    .is_some(),
                None => text.to_lowercase().contains(&self.term),
            }
        })
    }
}

impl<'a> CollectionView<'a> {
    /// A view showing every record in input order on a single page
    pub fn new(source: &'a [Record]) -> Self {
        let row_count = source.len();
        Self {
            source,
            visible_rows: (0..row_count).collect(),
            page: 1,
            page_size: row_count.max(1),
            page_range: 0..row_count,
        }
    }

    /// Keep only rows matching the predicate
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool,
    {
        let source = self.source;
        self.visible_rows.retain(|&row_idx| predicate(&source[row_idx]));
        self.page_range = 0..self.visible_rows.len();
        self
    }

    /// Stable sort of the visible rows by one field
    pub fn sort_by(
        mut self,
        field: &str,
        direction: SortDirection,
        missing_values: MissingValuePolicy,
    ) -> Self {
        let source = self.source;

        if !self
            .visible_rows
            .iter()
            .any(|&row_idx| source[row_idx].contains_field(field))
        {
            debug!(target: "collection_view", "sort field '{}' not present, keeping order", field);
            return self;
        }

        let kind = SortKind::classify(
            field,
            self.visible_rows
                .iter()
                .filter_map(|&row_idx| source[row_idx].get(field)),
        );

        let mut keyed: Vec<(SortKey, usize)> = self
            .visible_rows
            .iter()
            .map(|&row_idx| {
                (
                    SortKey::extract(source[row_idx].get(field), kind, missing_values),
                    row_idx,
                )
            })
            .collect();

        // Vec::sort_by is stable, so ties keep input order in both directions
        keyed.sort_by(|(a, _), (b, _)| compare_sort_keys(a, b, direction));

        self.visible_rows = keyed.into_iter().map(|(_, row_idx)| row_idx).collect();
        self
    }

    /// Select the 1-based page to show
    pub fn paginate(mut self, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total = self.visible_rows.len();

        let start = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(page_size))
            .filter(|&start| start < total);

        self.page = page;
        self.page_size = page_size;
        self.page_range = match start {
            Some(start) => start..start.saturating_add(page_size).min(total),
            None => total..total,
        };
        self
    }

    /// All records passing the filters, in sort order
    pub fn filtered_sorted(&self) -> Vec<&'a Record> {
        let source = self.source;
        self.visible_rows
            .iter()
            .map(|&row_idx| &source[row_idx])
            .collect()
    }

    /// The records on the requested page
    pub fn page_slice(&self) -> Vec<&'a Record> {
        let source = self.source;
        self.page_row_indices()
            .iter()
            .map(|&row_idx| &source[row_idx])
            .collect()
    }

    pub fn total_filtered(&self) -> usize {
        self.visible_rows.len()
    }

    /// `ceil(total_filtered / page_size)`, 0 when nothing matched
    pub fn total_pages(&self) -> usize {
        self.visible_rows.len().div_ceil(self.page_size)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_empty(&self) -> bool {
        self.visible_rows.is_empty()
    }

    /// Source indices of the filtered rows, in sort order
    pub fn visible_row_indices(&self) -> &[usize] {
        &self.visible_rows
    }

    /// Source indices of the rows on the requested page
    pub fn page_row_indices(&self) -> &[usize] {
        &self.visible_rows[self.page_range.clone()]
    }

    /// Every page in order, for exports and checks that walk the whole result
    pub fn pages(&self) -> impl Iterator<Item = Vec<&'a Record>> + '_ {
        let source = self.source;
        self.visible_rows
            .chunks(self.page_size)
            .map(move |chunk| chunk.iter().map(|&row_idx| &source[row_idx]).collect())
    }

    /// Row numbers for a "Showing X-Y of Z" footer
    pub fn page_info(&self) -> PageInfo {
        let (first_row, last_row) = if self.page_range.is_empty() {
            (0, 0)
        } else {
            (self.page_range.start + 1, self.page_range.end)
        };

        PageInfo {
            first_row,
            last_row,
            total: self.visible_rows.len(),
            page: self.page,
            total_pages: self.total_pages(),
        }
    }
}

/// Pagination bookkeeping for footers and pager controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based number of the first row on the page, 0 when the page is empty
    pub first_row: usize,
    pub last_row: usize,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            write!(f, "No matching records")
        } else if self.first_row == 0 {
            write!(f, "Showing 0 of {}", self.total)
        } else {
            write!(
                f,
                "Showing {}-{} of {} (page {}/{})",
                self.first_row, self.last_row, self.total, self.page, self.total_pages
            )
        }
    }
}
