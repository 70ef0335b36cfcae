//! # prodex Similarity
//!
//! An attribute-overlap similarity engine for schema-less product records.
//!
//! Given a reference record, every other record is scored over the
//! attributes both carry (`id` aside):
//!
//! - **+2** when the two values are equal, ignoring case
//! - **+1** otherwise, when a word of the reference value longer than two
//!   characters appears inside the candidate value
//!
//! Records sharing no attribute or scoring 0 are dropped. Results come back
//! best first, equal scores in store order, each with a per-attribute
//! breakdown.
//!
//! ## Example
//!
//! ```rust
//! use prodex_core::RecordStore;
//! use prodex_similarity::Recommender;
//! use serde_json::json;
//!
//! let store = RecordStore::from_json(json!([
//!     {"id": "1", "Type": "Car Vacuum Cleaner", "Brand": "X"},
//!     {"id": "2", "Type": "Car Vacuum Cleaner", "Brand": "Y"},
//!     {"id": "3", "Type": "Speaker", "Brand": "X"}
//! ]))
//! .unwrap();
//!
//! let ranked = Recommender::new(&store).recommend("1", 5).unwrap();
//! assert_eq!(ranked.len(), 2);
//! assert_eq!(ranked[0].id(), Some("2"));
//! ```

pub mod recommend;
pub mod score;

pub use recommend::{recommend, RankedRecord, Recommender};
pub use score::{attribute_similarity, record_similarity, ScoreBreakdown};
