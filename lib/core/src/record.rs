use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use crate::{Error, Result};

/// Attribute holding the application-level identifier used by by-id lookups
pub const ID_ATTRIBUTE: &str = "id";

/// A schema-less product record
///
/// Attributes keep their load order. Nothing is guaranteed to be present,
/// so every accessor returns an `Option`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    attributes: Map<String, Value>,
}

impl Record {
    #[inline]
    #[must_use]
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Value of an attribute, `None` when the record does not carry it
    #[inline]
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    /// The `id` attribute, only when it is a string
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.get(ID_ATTRIBUTE).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.attributes.iter()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &String> + '_ {
        self.attributes.keys()
    }

    /// String-valued attributes only; these are the ones that get indexed
    pub fn string_values(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes.values().filter_map(Value::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(attributes: Map<String, Value>) -> Self {
        Self::new(attributes)
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    fn try_from(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            other => Err(other),
        }
    }
}

/// Text form of an attribute value
///
/// Strings are returned as-is and null as `None`; anything else in its JSON
/// rendering.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed("None"),
        other => Cow::Owned(other.to_string()),
    }
}

/// Name of a JSON value's type, for error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The loaded product collection, in load order
///
/// Positions are 0-based and stable for the lifetime of the store.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    #[inline]
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Build a store from decoded JSON
    ///
    /// The top level must be an array and every element an object. Either
    /// the whole collection loads or nothing does.
    pub fn from_json(value: Value) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(Error::Load(format!(
                    "expected a list of records, found {}",
                    json_type_name(&other)
                )));
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(position, item)| {
                Record::try_from(item).map_err(|bad| {
                    Error::Load(format!(
                        "record {} is not a key/value mapping (found {})",
                        position,
                        json_type_name(&bad)
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(records))
    }

    pub fn get(&self, position: usize) -> Result<&Record> {
        self.records.get(position).ok_or(Error::PositionOutOfBounds {
            position,
            len: self.records.len(),
        })
    }

    /// First record whose string `id` equals `id`
    pub fn find_by_id(&self, id: &str) -> Option<&Record> {
        self.position_of_id(id).map(|position| &self.records[position])
    }

    /// Position of the first record whose string `id` equals `id`
    pub fn position_of_id(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id() == Some(id))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> RecordStore {
        RecordStore::from_json(json!([
            {"id": "1", "Type": "Car Vacuum Cleaner"},
            {"id": 2, "Type": "Speaker"},
            {"Type": "Cable"},
            {"id": "1", "Type": "Duplicate"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_load_preserves_order() {
        let store = store();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(2).unwrap().get("Type"), Some(&json!("Cable")));
    }

    #[test]
    fn test_load_rejects_non_list() {
        let err = RecordStore::from_json(json!({"id": "1"})).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }

    #[test]
    fn test_load_rejects_non_mapping_element() {
        let err = RecordStore::from_json(json!([{"id": "1"}, "oops"])).unwrap_err();
        match err {
            Error::Load(message) => {
                assert!(message.contains("record 1"), "{message}");
                assert!(message.contains("string"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = RecordStore::from_json(json!([{"id": "1"}, 42])).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }

    #[test]
    fn test_empty_list_loads() {
        let store = RecordStore::from_json(json!([])).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_out_of_bounds() {
        let err = store().get(10).unwrap_err();
        assert!(matches!(err, Error::PositionOutOfBounds { position: 10, len: 4 }));
    }

    #[test]
    fn test_find_by_id_first_match() {
        let store = store();
        let found = store.find_by_id("1").unwrap();
        assert_eq!(found.get("Type"), Some(&json!("Car Vacuum Cleaner")));
        assert_eq!(store.position_of_id("1"), Some(0));
    }

    #[test]
    fn test_find_by_id_ignores_numeric_ids() {
        assert!(store().find_by_id("2").is_none());
        assert!(store().find_by_id("missing").is_none());
    }

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!("Car")), "Car");
        assert_eq!(value_text(&json!(1.5)), "1.5");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&Value::Null), "None");
    }

    #[test]
    fn test_attribute_order_is_kept() {
        let record = Record::try_from(json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let names: Vec<&String> = record.attribute_names().collect();
        assert_eq!(names, ["z", "a", "m"]);
    }
}
