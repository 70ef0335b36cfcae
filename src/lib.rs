//! # prodex
//!
//! An in-memory explorer for semi-structured product catalogs.
//!
//! prodex loads a JSON list of schema-less product records, builds an
//! inverted index over their text, and answers three kinds of queries
//! against that frozen state:
//!
//! - **Search**: token-shortlisted, occurrence-scored full-text search
//! - **Filter**: exact, substring and numeric-range attribute predicates
//! - **Recommend**: records ranked by attribute overlap with a reference
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! prodex --data ./data-set.json serve --port 5000
//! curl 'http://localhost:5000/api/search?q=vacuum&limit=5'
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use prodex::prelude::*;
//! use serde_json::json;
//!
//! let catalog = Catalog::from_json(
//!     json!([
//!         {"id": "1", "Type": "Car Vacuum Cleaner", "Brand": "X"},
//!         {"id": "2", "Type": "Car Vacuum Cleaner", "Brand": "Y"},
//!         {"id": "3", "Type": "Speaker", "Brand": "X"}
//!     ]),
//!     &CatalogConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(catalog.search("vacuum", 10).len(), 2);
//!
//! let filter = AttributeFilter::new().with("Brand", Predicate::exact("X"));
//! assert_eq!(catalog.filter(&filter).len(), 2);
//!
//! let similar = Recommender::new(catalog.store()).recommend("1", 5).unwrap();
//! assert_eq!(similar.len(), 2);
//! ```
//!
//! ## Crate Structure
//!
//! - [`prodex-core`](https://docs.rs/prodex-core) - Records, inverted index, search, filters, analysis
//! - [`prodex-similarity`](https://docs.rs/prodex-similarity) - Attribute-overlap recommendations
//! - [`prodex-storage`](https://docs.rs/prodex-storage) - JSON loading and report export
//! - [`prodex-api`](https://docs.rs/prodex-api) - REST API

pub mod shell;

// Re-export core types
pub use prodex_core::{
    AnalysisConfig, AttributeFilter, Catalog, CatalogConfig, Error, Filter, InvertedIndex,
    Predicate, Record, RecordStore, Result, SearchHit, extract_numeric, tokenize,
};

// Re-export similarity
pub use prodex_similarity::{RankedRecord, Recommender};

// Re-export storage
pub use prodex_storage::{export_analysis, load_catalog, AnalysisReport};

// Re-export API
pub use prodex_api::{ApiConfig, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnalysisConfig, AttributeFilter, Catalog, CatalogConfig, Error, Filter, Predicate,
        RankedRecord, Record, RecordStore, Recommender, Result, load_catalog,
    };
}
