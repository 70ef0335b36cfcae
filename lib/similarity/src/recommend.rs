//! Recommendations by attribute overlap
//!
//! Every record in the store is scored against a reference record and the
//! best-scoring ones are returned with per-attribute explanations.

use crate::score::record_similarity;
use ahash::AHashMap;
use prodex_core::{Record, RecordStore};

/// A recommended record with its score breakdown
#[derive(Debug, Clone)]
pub struct RankedRecord<'a> {
    /// Position of the record in the store
    pub position: usize,
    pub record: &'a Record,
    /// Sum of the per-attribute scores
    pub score: u32,
    /// Contribution of each attribute shared with the reference
    pub attribute_scores: AHashMap<String, u32>,
}

impl RankedRecord<'_> {
    pub fn id(&self) -> Option<&str> {
        self.record.id()
    }
}

/// Recommender over a frozen record store
#[derive(Debug, Clone, Copy)]
pub struct Recommender<'a> {
    store: &'a RecordStore,
}

impl<'a> Recommender<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Records most similar to the first record whose `id` is `reference_id`
    ///
    /// Returns `None` when no record carries that id, so callers can tell a
    /// missing reference apart from a reference without similar records.
    /// Records sharing the reference id are never recommended.
    pub fn recommend(&self, reference_id: &str, limit: usize) -> Option<Vec<RankedRecord<'a>>> {
        let reference = self.store.find_by_id(reference_id)?;
        Some(self.rank(reference, reference_id, limit))
    }

    fn rank(&self, reference: &Record, reference_id: &str, limit: usize) -> Vec<RankedRecord<'a>> {
        if limit == 0 {
            return Vec::new();
        }

        let mut results: Vec<RankedRecord<'a>> = self
            .store
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.id() != Some(reference_id))
            .filter_map(|(position, candidate)| {
                let breakdown = record_similarity(reference, candidate)?;
                (breakdown.total > 0).then(|| RankedRecord {
                    position,
                    record: candidate,
                    score: breakdown.total,
                    attribute_scores: breakdown.attribute_scores,
                })
            })
            .collect();

        // Stable sort: equal scores stay in store order
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(limit);
        results
    }
}

/// Shorthand for [`Recommender::recommend`] returning bare records
pub fn recommend<'a>(store: &'a RecordStore, reference_id: &str, limit: usize) -> Option<Vec<&'a Record>> {
    Recommender::new(store)
        .recommend(reference_id, limit)
        .map(|ranked| ranked.into_iter().map(|r| r.record).collect())
}
