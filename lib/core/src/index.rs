// Inverted index over the string attributes of a record store
use ahash::AHashMap;
use rayon::prelude::*;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use crate::{Record, RecordStore};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("static word pattern"));

static NO_POSITIONS: BTreeSet<usize> = BTreeSet::new();

/// Lowercase `text` and split it into word tokens
///
/// Words are maximal runs of Unicode word characters, so punctuation and
/// whitespace both separate tokens. Tokens are not stemmed or deduplicated.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Token -> positions of the records containing it
///
/// Built once from a [`RecordStore`] and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    postings: AHashMap<String, BTreeSet<usize>>,
}

impl InvertedIndex {
    /// Index every string attribute of every record
    pub fn build(store: &RecordStore) -> Self {
        Self {
            postings: index_partition(0, store.records()),
        }
    }

    /// Same result as [`InvertedIndex::build`], indexing `partition_size`
    /// records per rayon task and merging the partial postings by set union
    pub fn build_parallel(store: &RecordStore, partition_size: usize) -> Self {
        let partition_size = partition_size.max(1);
        let postings = store
            .records()
            .par_chunks(partition_size)
            .enumerate()
            .map(|(i, chunk)| index_partition(i * partition_size, chunk))
            .reduce(AHashMap::new, merge_postings);
        Self { postings }
    }

    /// Positions of records containing `token`; empty if the token is unseen
    #[inline]
    pub fn lookup(&self, token: &str) -> &BTreeSet<usize> {
        self.postings.get(token).unwrap_or(&NO_POSITIONS)
    }

    /// Number of distinct tokens
    #[inline]
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }
}

fn index_partition(offset: usize, records: &[Record]) -> AHashMap<String, BTreeSet<usize>> {
    let mut postings: AHashMap<String, BTreeSet<usize>> = AHashMap::new();
    for (i, record) in records.iter().enumerate() {
        let position = offset + i;
        for value in record.string_values() {
            for token in tokenize(value) {
                postings.entry(token).or_default().insert(position);
            }
        }
    }
    postings
}

fn merge_postings(
    mut left: AHashMap<String, BTreeSet<usize>>,
    right: AHashMap<String, BTreeSet<usize>>,
) -> AHashMap<String, BTreeSet<usize>> {
    for (token, mut positions) in right {
        left.entry(token).or_default().append(&mut positions);
    }
    left
}
