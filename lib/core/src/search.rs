//! Token-scored full-text search
//!
//! Candidates come from the inverted index: a record is considered only if
//! at least one query token is one of its words. Candidates are then scored
//! by raw substring occurrences, so `"car"` also scores inside `"carpet"`
//! once the record is shortlisted.

use serde::Serialize;
use std::collections::BTreeSet;
use crate::index::{tokenize, InvertedIndex};
use crate::RecordStore;

/// A search hit: record position and its occurrence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredPosition {
    pub position: usize,
    pub score: usize,
}

/// Rank records for `query`
///
/// Results are ordered by descending score, ties by ascending position, and
/// truncated to `limit`.
pub fn search(
    store: &RecordStore,
    index: &InvertedIndex,
    query: &str,
    limit: usize,
) -> Vec<ScoredPosition> {
    if limit == 0 || index.is_empty() {
        return Vec::new();
    }

    let query_tokens = tokenize(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }

    let candidates: BTreeSet<usize> = query_tokens
        .iter()
        .flat_map(|token| index.lookup(token).iter().copied())
        .collect();

    let mut results: Vec<ScoredPosition> = candidates
        .into_iter()
        .filter_map(|position| {
            store.get(position).ok().map(|record| ScoredPosition {
                position,
                score: occurrence_score(record.string_values(), &query_tokens),
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.cmp(&a.score).then(a.position.cmp(&b.position)));
    results.truncate(limit);
    results
}

/// Sum over values and tokens of non-overlapping substring occurrences
pub fn occurrence_score<'a>(values: impl Iterator<Item = &'a str>, tokens: &[String]) -> usize {
    values
        .map(|value| {
            let lowered = value.to_lowercase();
            tokens
                .iter()
                .map(|token| lowered.matches(token.as_str()).count())
                .sum::<usize>()
        })
        .sum()
}
