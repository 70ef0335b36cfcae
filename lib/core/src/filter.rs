// Schema-less attribute filtering
use serde_json::{Map, Value};
use crate::numeric::extract_numeric;
use crate::record::json_type_name;
use crate::{Error, Record, RecordStore, Result};

pub trait Filter {
    fn matches(&self, record: &Record) -> bool;
}

/// A condition on a single attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Type-sensitive equality with a non-string scalar
    Exact(Value),
    /// Case-insensitive containment; holds the lowercased needle
    Substring(String),
    /// Inclusive bounds on the attribute's extracted numeric value
    Range { min: Option<f64>, max: Option<f64> },
    /// A malformed predicate; never matches
    Invalid(String),
}

impl Predicate {
    pub fn exact(value: impl Into<Value>) -> Self {
        Predicate::Exact(value.into())
    }

    pub fn substring(needle: &str) -> Self {
        Predicate::Substring(needle.to_lowercase())
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Predicate::Range { min, max }
    }

    /// Interpret a JSON predicate value
    ///
    /// Strings become substring predicates, objects become range predicates
    /// (`{"min": .., "max": ..}`, both optional), anything else is an exact
    /// match. A range bound that is not a number yields [`Predicate::Invalid`].
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::substring(s),
            Value::Object(bounds) => {
                match (range_bound(bounds, "min"), range_bound(bounds, "max")) {
                    (Ok(min), Ok(max)) => Predicate::Range { min, max },
                    (Err(reason), _) | (_, Err(reason)) => Predicate::Invalid(reason),
                }
            }
            other => Predicate::Exact(other.clone()),
        }
    }

    /// Whether an attribute value satisfies this predicate
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Predicate::Exact(expected) => values_equal(value, expected),
            Predicate::Substring(needle) => value
                .as_str()
                .map(|s| s.to_lowercase().contains(needle.as_str()))
                .unwrap_or(false),
            Predicate::Range { min, max } => match extract_numeric(value) {
                Some(n) => min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi),
                None => false,
            },
            Predicate::Invalid(_) => false,
        }
    }
}

fn range_bound(bounds: &Map<String, Value>, key: &str) -> std::result::Result<Option<f64>, String> {
    match bounds.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("range bound '{}' must be a number, found {}", key, json_type_name(v))),
    }
}

// Integers compare exactly, mixed integer/float by value so that 7 and 7.0
// agree; a number never equals a string.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (integer(x), integer(y)) {
            (Some(x), Some(y)) => x == y,
            _ => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => x == y,
            },
        },
        _ => a == b,
    }
}

fn integer(n: &serde_json::Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// A conjunction of per-attribute predicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeFilter {
    conditions: Vec<(String, Predicate)>,
}

impl AttributeFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate; a repeated attribute replaces the earlier one
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, predicate: Predicate) -> Self {
        let attribute = attribute.into();
        match self.conditions.iter_mut().find(|(name, _)| *name == attribute) {
            Some(slot) => slot.1 = predicate,
            None => self.conditions.push((attribute, predicate)),
        }
        self
    }

    /// Parse a JSON object mapping attribute names to predicate values
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            Error::InvalidFilter(format!(
                "expected an object of attribute predicates, found {}",
                json_type_name(value)
            ))
        })?;

        Ok(map
            .iter()
            .fold(Self::new(), |filter, (attribute, predicate)| {
                filter.with(attribute.as_str(), Predicate::from_json(predicate))
            }))
    }

    pub fn conditions(&self) -> &[(String, Predicate)] {
        &self.conditions
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Records satisfying every predicate, in store order
    pub fn apply<'a>(&self, store: &'a RecordStore) -> Vec<&'a Record> {
        store.iter().filter(|record| self.matches(record)).collect()
    }
}

impl Filter for AttributeFilter {
    fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|(attribute, predicate)| {
            record
                .get(attribute)
                .map(|value| predicate.accepts(value))
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> RecordStore {
        RecordStore::from_json(json!([
            {"id": "1", "Type": "Car Vacuum Cleaner", "Brand": "X", "Weight": "1.2 kg", "Stock": 7},
            {"id": "2", "Type": "Car Vacuum Cleaner", "Brand": "Y", "Weight": "2.5 kg", "Stock": "7"},
            {"id": "3", "Type": "Speaker", "Brand": "X", "Weight": 0.8},
            {"id": "4", "Type": "Speaker", "Brand": "Z", "Weight": "unknown"}
        ]))
        .unwrap()
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.id().unwrap_or_default().to_string()).collect()
    }

    #[test]
    fn test_substring_predicate() {
        let filter = AttributeFilter::from_json(&json!({"Type": "Vacuum"})).unwrap();
        assert_eq!(ids(&filter.apply(&store())), ["1", "2"]);
    }

    #[test]
    fn test_substring_matches_brand_value() {
        let filter = AttributeFilter::from_json(&json!({"Brand": "X"})).unwrap();
        assert_eq!(ids(&filter.apply(&store())), ["1", "3"]);
    }

    #[test]
    fn test_substring_requires_string_value() {
        let filter = AttributeFilter::new().with("Weight", Predicate::substring("0.8"));
        assert!(filter.apply(&store()).is_empty());
    }

    #[test]
    fn test_exact_predicate_is_type_sensitive() {
        let filter = AttributeFilter::from_json(&json!({"Stock": 7})).unwrap();
        assert_eq!(ids(&filter.apply(&store())), ["1"]);

        let float = AttributeFilter::new().with("Stock", Predicate::exact(7.0));
        assert_eq!(ids(&float.apply(&store())), ["1"]);
    }

    #[test]
    fn test_exact_large_integers_compare_exactly() {
        let store = RecordStore::from_json(json!([
            {"id": "1", "Stock": 9007199254740992u64},
            {"id": "2", "Stock": 18446744073709551615u64}
        ]))
        .unwrap();

        let neighbour = AttributeFilter::from_json(&json!({"Stock": 9007199254740993u64})).unwrap();
        assert!(neighbour.apply(&store).is_empty());

        let same = AttributeFilter::from_json(&json!({"Stock": 9007199254740992u64})).unwrap();
        assert_eq!(ids(&same.apply(&store)), ["1"]);

        let max = AttributeFilter::new().with("Stock", Predicate::exact(u64::MAX));
        assert_eq!(ids(&max.apply(&store)), ["2"]);
    }

    #[test]
    fn test_range_predicate() {
        let filter = AttributeFilter::from_json(&json!({"Weight": {"min": 1.0, "max": 2.5}})).unwrap();
        assert_eq!(ids(&filter.apply(&store())), ["1", "2"]);

        let open = AttributeFilter::new().with("Weight", Predicate::range(None, Some(1.2)));
        assert_eq!(ids(&open.apply(&store())), ["1", "3"]);
    }

    #[test]
    fn test_range_without_numeric_value_fails() {
        let filter = AttributeFilter::new().with("Weight", Predicate::range(Some(0.0), None));
        assert!(!ids(&filter.apply(&store())).contains(&"4".to_string()));
    }

    #[test]
    fn test_invalid_range_bound_fails_locally() {
        let predicate = Predicate::from_json(&json!({"min": "ten"}));
        assert!(matches!(predicate, Predicate::Invalid(_)));

        let filter = AttributeFilter::from_json(&json!({"Weight": {"min": "ten"}})).unwrap();
        assert!(filter.apply(&store()).is_empty());
    }

    #[test]
    fn test_missing_attribute_fails_record() {
        let filter = AttributeFilter::from_json(&json!({"Stock": {"min": 0}})).unwrap();
        assert_eq!(ids(&filter.apply(&store())), ["1", "2"]);
    }

    #[test]
    fn test_conjunction() {
        let store = store();
        let a = AttributeFilter::new().with("Brand", Predicate::substring("x"));
        let b = AttributeFilter::new().with("Type", Predicate::substring("speaker"));
        let both = a.clone().with("Type", Predicate::substring("speaker"));

        let result = ids(&both.apply(&store));
        assert_eq!(result, ["3"]);
        let left = ids(&a.apply(&store));
        let right = ids(&b.apply(&store));
        assert!(result.iter().all(|id| left.contains(id) && right.contains(id)));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert_eq!(AttributeFilter::new().apply(&store()).len(), 4);
    }

    #[test]
    fn test_non_object_filter_rejected() {
        assert!(matches!(
            AttributeFilter::from_json(&json!(["Type"])),
            Err(Error::InvalidFilter(_))
        ));
    }
}
