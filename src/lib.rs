pub mod config;
pub mod data;
pub mod table_display;
pub mod utils;

pub use data::collection_view::{compute_view, CollectionView, PageInfo, ViewResult};
pub use data::query::{FieldFilter, MissingValuePolicy, QueryParams, SearchMode, SortDirection};
pub use data::record::{FieldValue, Record};
