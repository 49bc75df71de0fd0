//! Data layer for the list screens
//!
//! Records are loaded once by the adapter and never mutated; every
//! search, filter, sort or page change derives a fresh `CollectionView`
//! over them.

// Core view model
pub mod collection_view;
pub mod query;
pub mod record;
pub mod value_compare;

// Loading and typing
pub mod record_adapter;
pub mod screens;
pub mod type_inference;

// Consumers of a view
pub mod data_exporter;
pub mod filter_options;
