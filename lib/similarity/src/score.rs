//! Attribute-overlap scoring between two records
//!
//! Scores are computed from the reference record's point of view: words of
//! the reference value are looked up inside the candidate value, never the
//! other way around. `score(a, b)` and `score(b, a)` can therefore differ.

use ahash::AHashMap;
use prodex_core::record::value_text;
use prodex_core::{Record, ID_ATTRIBUTE};
use serde_json::Value;

/// Contribution of an attribute whose values match case-insensitively
pub const EXACT_MATCH_SCORE: u32 = 2;

/// Contribution of an attribute where a reference word occurs in the candidate value
pub const WORD_OVERLAP_SCORE: u32 = 1;

/// Reference words must be longer than this (in characters) to count
pub const MIN_WORD_CHARS: usize = 2;

/// Similarity of one attribute's values
pub fn attribute_similarity(reference: &Value, candidate: &Value) -> u32 {
    let reference = value_text(reference).to_lowercase();
    let candidate = value_text(candidate).to_lowercase();

    if reference == candidate {
        EXACT_MATCH_SCORE
    } else if reference
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_WORD_CHARS)
        .any(|word| candidate.contains(word))
    {
        WORD_OVERLAP_SCORE
    } else {
        0
    }
}

/// Total score with per-attribute contributions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub total: u32,
    pub attribute_scores: AHashMap<String, u32>,
}

/// Score `candidate` against `reference` over their shared attributes
///
/// Returns `None` when the records share no attribute other than `id`.
pub fn record_similarity(reference: &Record, candidate: &Record) -> Option<ScoreBreakdown> {
    let mut breakdown = ScoreBreakdown::default();
    let mut shared = 0usize;

    for (attribute, reference_value) in reference.iter() {
        if attribute == ID_ATTRIBUTE {
            continue;
        }
        let Some(candidate_value) = candidate.get(attribute) else {
            continue;
        };
        shared += 1;

        let score = attribute_similarity(reference_value, candidate_value);
        breakdown.total += score;
        breakdown.attribute_scores.insert(attribute.clone(), score);
    }

    (shared > 0).then_some(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::try_from(value).unwrap()
    }

    #[test]
    fn test_exact_match_ignores_case() {
        assert_eq!(attribute_similarity(&json!("Car Vacuum"), &json!("car vacuum")), 2);
        assert_eq!(attribute_similarity(&json!(1.5), &json!(1.5)), 2);
    }

    #[test]
    fn test_word_overlap() {
        assert_eq!(attribute_similarity(&json!("Car Vacuum Cleaner"), &json!("Handheld Vacuum")), 1);
        // substring of the candidate value, not a whole word
        assert_eq!(attribute_similarity(&json!("Vacuum"), &json!("vacuums and mops")), 1);
    }

    #[test]
    fn test_null_reads_as_none() {
        assert_eq!(attribute_similarity(&Value::Null, &json!("None")), 2);
        assert_eq!(attribute_similarity(&Value::Null, &Value::Null), 2);
        assert_eq!(attribute_similarity(&Value::Null, &json!("")), 0);
        assert_eq!(attribute_similarity(&json!(""), &Value::Null), 0);
        // "none" is a word of the reference, found inside the candidate
        assert_eq!(attribute_similarity(&Value::Null, &json!("None included")), 1);
    }

    #[test]
    fn test_short_words_do_not_count() {
        assert_eq!(attribute_similarity(&json!("2 in 1 set"), &json!("in 2")), 0);
        assert_eq!(attribute_similarity(&json!("Speaker"), &json!("Cable")), 0);
    }

    #[test]
    fn test_record_similarity() {
        let reference = record(json!({"id": "1", "Type": "Car Vacuum Cleaner", "Brand": "X"}));
        let candidate = record(json!({"id": "2", "Type": "Car Vacuum Cleaner", "Brand": "Y"}));

        let breakdown = record_similarity(&reference, &candidate).unwrap();
        assert_eq!(breakdown.total, 2);
        assert_eq!(breakdown.attribute_scores.get("Type"), Some(&2));
        assert_eq!(breakdown.attribute_scores.get("Brand"), Some(&0));
        assert!(!breakdown.attribute_scores.contains_key("id"));
    }

    #[test]
    fn test_no_shared_attributes() {
        let reference = record(json!({"id": "1", "Type": "Speaker"}));
        let candidate = record(json!({"id": "2", "Color": "Black"}));
        assert!(record_similarity(&reference, &candidate).is_none());
    }

    #[test]
    fn test_score_is_asymmetric() {
        let a = record(json!({"Type": "Speaker"}));
        let b = record(json!({"Type": "Speakers Set"}));

        let a_to_b = record_similarity(&a, &b).unwrap().total;
        let b_to_a = record_similarity(&b, &a).unwrap().total;
        assert_eq!(a_to_b, 1);
        assert_eq!(b_to_a, 0);
        assert_ne!(a_to_b, b_to_a);
    }
}
