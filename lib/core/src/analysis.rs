//! Aggregate analyzers over a record store
//!
//! Dataset structure, category breakdowns, feature keyword coverage, weight
//! statistics and warranty counts. Everything here is a pure computation;
//! rendering is left to callers.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use crate::numeric::extract_numeric;
use crate::record::value_text;
use crate::RecordStore;

/// Attribute names and sizes used by the analyzers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    pub category_attributes: Vec<String>,
    /// Tried in order; the first one carrying a non-zero number wins
    pub weight_attributes: Vec<String>,
    /// Tried in order; the first one present wins
    pub warranty_attributes: Vec<String>,
    pub feature_keywords: Vec<String>,
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            category_attributes: strings(&["Type", "Brand"]),
            weight_attributes: strings(&["Weight", "Net Weight"]),
            warranty_attributes: strings(&["Domestic Warranty", "Warranty"]),
            feature_keywords: strings(&["bluetooth", "wireless", "portable", "waterproof", "led"]),
            top_n: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Occurrence counter that remembers first-seen order for ties
#[derive(Debug, Clone, Default)]
pub struct CountTable {
    slots: AHashMap<String, usize>,
    counts: Vec<ValueCount>,
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &str) {
        match self.slots.get(value) {
            Some(&slot) => self.counts[slot].count += 1,
            None => {
                self.slots.insert(value.to_string(), self.counts.len());
                self.counts.push(ValueCount { value: value.to_string(), count: 1 });
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// All entries by descending count, ties in first-seen order
    pub fn ranked(&self) -> Vec<ValueCount> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    pub fn most_common(&self, n: usize) -> Vec<ValueCount> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total_records: usize,
    pub unique_attributes: usize,
    pub attribute_frequency: Vec<ValueCount>,
    pub max_attributes: usize,
    pub min_attributes: usize,
}

impl DatasetStats {
    pub fn top_attributes(&self, n: usize) -> &[ValueCount] {
        &self.attribute_frequency[..n.min(self.attribute_frequency.len())]
    }
}

pub fn dataset_stats(store: &RecordStore) -> DatasetStats {
    let mut attributes = CountTable::new();
    for record in store {
        for name in record.attribute_names() {
            attributes.add(name);
        }
    }

    DatasetStats {
        total_records: store.len(),
        unique_attributes: attributes.len(),
        attribute_frequency: attributes.ranked(),
        max_attributes: store.iter().map(|r| r.len()).max().unwrap_or(0),
        min_attributes: store.iter().map(|r| r.len()).min().unwrap_or(0),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub attribute: String,
    pub top_values: Vec<ValueCount>,
}

/// Most common string values of `attribute`
pub fn value_counts(store: &RecordStore, attribute: &str, top_n: usize) -> Vec<ValueCount> {
    let mut table = CountTable::new();
    for value in store.iter().filter_map(|r| r.get(attribute)?.as_str()) {
        table.add(value);
    }
    table.most_common(top_n)
}

pub fn category_breakdown(store: &RecordStore, config: &AnalysisConfig) -> Vec<CategoryBreakdown> {
    config
        .category_attributes
        .iter()
        .map(|attribute| CategoryBreakdown {
            attribute: attribute.clone(),
            top_values: value_counts(store, attribute, config.top_n),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureCount {
    pub keyword: String,
    pub count: usize,
}

/// Per keyword, the number of records with a string attribute containing it
pub fn feature_counts(store: &RecordStore, keywords: &[String]) -> Vec<FeatureCount> {
    keywords
        .iter()
        .map(|keyword| {
            let needle = keyword.to_lowercase();
            let count = store
                .iter()
                .filter(|r| r.string_values().any(|v| v.to_lowercase().contains(&needle)))
                .count();
            FeatureCount { keyword: keyword.clone(), count }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl NumericSummary {
    /// `None` for an empty sample
    pub fn from_values(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let count = values.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };

        Some(Self {
            count,
            mean: values.iter().sum::<f64>() / count as f64,
            median,
            min: values[0],
            max: values[count - 1],
        })
    }
}

/// Statistics over each record's first non-zero weight attribute
pub fn weight_summary(store: &RecordStore, config: &AnalysisConfig) -> Option<NumericSummary> {
    let weights = store
        .iter()
        .filter_map(|record| {
            config
                .weight_attributes
                .iter()
                .filter_map(|attribute| record.get(attribute).and_then(extract_numeric))
                .find(|w| *w != 0.0)
        })
        .collect();
    NumericSummary::from_values(weights)
}

/// Most common warranty texts, reading each record's first present warranty attribute
pub fn warranty_counts(store: &RecordStore, config: &AnalysisConfig) -> Vec<ValueCount> {
    let mut table = CountTable::new();
    for record in store {
        if let Some(value) = config.warranty_attributes.iter().find_map(|a| record.get(a)) {
            table.add(&value_text(value));
        }
    }
    table.most_common(config.top_n)
}
