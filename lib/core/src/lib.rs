//! # prodex Core
//!
//! Core library for the prodex product catalog explorer.
//!
//! This crate provides the in-memory data structures and query algorithms:
//!
//! - [`Record`] / [`RecordStore`] - Schema-less records in load order
//! - [`InvertedIndex`] - Token to record-position index
//! - [`Catalog`] - Frozen store + index, the query entrypoint
//! - [`AttributeFilter`] - Exact, substring and numeric range predicates
//! - [`extract_numeric`] - Leading number extraction from free text
//!
//! ## Example
//!
//! ```rust
//! use prodex_core::{AttributeFilter, Catalog, CatalogConfig, Predicate};
//! use serde_json::json;
//!
//! let catalog = Catalog::from_json(
//!     json!([
//!         {"id": "1", "Type": "Car Vacuum Cleaner", "Brand": "X"},
//!         {"id": "2", "Type": "Speaker", "Brand": "X"}
//!     ]),
//!     &CatalogConfig::default(),
//! )
//! .unwrap();
//!
//! let hits = catalog.search("vacuum", 10);
//! assert_eq!(hits.len(), 1);
//!
//! let filter = AttributeFilter::new().with("Brand", Predicate::substring("x"));
//! assert_eq!(catalog.filter(&filter).len(), 2);
//! ```

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod index;
pub mod numeric;
pub mod record;
pub mod search;

pub use analysis::AnalysisConfig;
pub use catalog::{Catalog, CatalogConfig, SearchHit};
pub use error::{Error, Result};
pub use filter::{AttributeFilter, Filter, Predicate};
pub use index::{tokenize, InvertedIndex};
pub use numeric::extract_numeric;
pub use record::{Record, RecordStore, ID_ATTRIBUTE};
