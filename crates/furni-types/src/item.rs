use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

use crate::error::TypeError;

/// A partial or complete set of item fields, in insertion order.
pub type Fields = Map<String, Value>;

/// Every field of the item schema, in canonical order.
pub const ITEM_FIELDS: [&str; 25] = [
    "adurl",
    "bc",
    "buyout",
    "canlayon",
    "cansiton",
    "canstandon",
    "category",
    "classname",
    "customparams",
    "defaultdir",
    "description",
    "environment",
    "excludeddynamic",
    "furniline",
    "id",
    "name",
    "offerid",
    "partcolors",
    "rare",
    "rentbuyout",
    "rentofferid",
    "revision",
    "specialtype",
    "xdim",
    "ydim",
];

/// One catalog entry.
///
/// An `Item` is a field map rather than a closed struct: stored items may
/// carry keys outside [`ITEM_FIELDS`], and those keys survive a
/// read-modify-write cycle untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Item(Fields);

impl Item {
    /// The default value of every schema field.
    pub fn defaults() -> Self {
        let value = json!({
            "adurl": "",
            "bc": false,
            "buyout": false,
            "canlayon": false,
            "cansiton": false,
            "canstandon": false,
            "category": "credit",
            "classname": "",
            "customparams": "",
            "defaultdir": 0,
            "description": "",
            "environment": "",
            "excludeddynamic": false,
            "furniline": "",
            "id": 0,
            "name": "",
            "offerid": 0,
            "partcolors": { "color": [] },
            "rare": false,
            "rentbuyout": false,
            "rentofferid": -1,
            "revision": 0,
            "specialtype": 0,
            "xdim": 1,
            "ydim": 1
        });
        match value {
            Value::Object(fields) => Self(fields),
            _ => unreachable!("json! object literal"),
        }
    }

    /// Wrap an existing field map.
    pub fn from_fields(fields: Fields) -> Self {
        Self(fields)
    }

    /// Build an item from an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(TypeError::NotAnObject("item")),
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    pub fn into_fields(self) -> Fields {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, returning the previous value if there was one.
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// The item's identifier, if present and a number or string.
    pub fn id(&self) -> Option<ItemId> {
        self.0.get("id").and_then(ItemId::from_value)
    }

    /// Schema fields absent from this item.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        ITEM_FIELDS
            .iter()
            .copied()
            .filter(|f| !self.0.contains_key(*f))
            .collect()
    }

    /// Returns `true` if every schema field is present.
    pub fn is_complete(&self) -> bool {
        ITEM_FIELDS.iter().all(|f| self.0.contains_key(*f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Fields> for Item {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

/// Item identifier as it travels in payloads: a JSON number or a string.
///
/// Equality against stored values is loose. A numeric id matches a string
/// holding the same number (`7` matches `"7"` and `" 7 "`), and `7` matches
/// `7.0`. Two strings must be identical.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(Number),
    Text(String),
}

impl ItemId {
    /// Extract an identifier from a JSON value. Only numbers and strings qualify.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::Number(n.clone())),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// Loose comparison against a stored `id` value.
    pub fn matches(&self, stored: &Value) -> bool {
        match (self, stored) {
            (Self::Text(a), Value::String(b)) => a == b,
            (Self::Number(a), Value::Number(b)) => numbers_equal(a, b),
            (Self::Number(n), Value::String(s)) | (Self::Text(s), Value::Number(n)) => {
                match (n.as_f64(), parse_numeric(s)) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self::Number(Number::from(id))
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self::Number(Number::from(id))
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_cover_every_schema_field() {
        let defaults = Item::defaults();
        assert!(defaults.is_complete());
        assert_eq!(defaults.len(), ITEM_FIELDS.len());
        assert_eq!(defaults.get("category"), Some(&json!("credit")));
        assert_eq!(defaults.get("rentofferid"), Some(&json!(-1)));
        assert_eq!(defaults.get("partcolors"), Some(&json!({ "color": [] })));
    }

    #[test]
    fn defaults_follow_canonical_field_order() {
        let defaults = Item::defaults();
        let keys: Vec<&str> = defaults.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, ITEM_FIELDS.to_vec());
    }

    #[test]
    fn missing_fields_lists_gaps() {
        let item = Item::from_value(json!({ "id": 1, "name": "chair" })).unwrap();
        let missing = item.missing_fields();
        assert_eq!(missing.len(), ITEM_FIELDS.len() - 2);
        assert!(!missing.contains(&"id"));
        assert!(missing.contains(&"classname"));
        assert!(!item.is_complete());
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert_eq!(
            Item::from_value(json!([1, 2])),
            Err(TypeError::NotAnObject("item"))
        );
    }

    #[test]
    fn extra_fields_are_kept() {
        let item = Item::from_value(json!({ "id": 3, "custom": "x" })).unwrap();
        assert_eq!(item.get("custom"), Some(&json!("x")));
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back, json!({ "id": 3, "custom": "x" }));
    }

    #[test]
    fn item_id_reads_numbers_and_strings() {
        let item = Item::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(item.id(), Some(ItemId::from(42i64)));
        let item = Item::from_value(json!({ "id": "abc" })).unwrap();
        assert_eq!(item.id(), Some(ItemId::from("abc")));
        let item = Item::from_value(json!({ "id": null })).unwrap();
        assert_eq!(item.id(), None);
    }

    #[test]
    fn numeric_id_matches_numeric_string() {
        let id = ItemId::from(7i64);
        assert!(id.matches(&json!(7)));
        assert!(id.matches(&json!("7")));
        assert!(id.matches(&json!(" 7 ")));
        assert!(id.matches(&json!(7.0)));
        assert!(!id.matches(&json!(8)));
        assert!(!id.matches(&json!("")));
        assert!(!id.matches(&json!(null)));
    }

    #[test]
    fn string_id_matches_number() {
        let id = ItemId::from("1700000000000");
        assert!(id.matches(&json!(1_700_000_000_000u64)));
        assert!(id.matches(&json!("1700000000000")));
        assert!(!id.matches(&json!("01700000000000")));
    }

    #[test]
    fn non_numeric_strings_compare_exactly() {
        let id = ItemId::from("chair_basic");
        assert!(id.matches(&json!("chair_basic")));
        assert!(!id.matches(&json!("Chair_basic")));
        assert!(!id.matches(&json!(0)));
    }

    #[test]
    fn item_id_deserializes_untagged() {
        let n: ItemId = serde_json::from_str("12").unwrap();
        assert_eq!(n, ItemId::from(12i64));
        let s: ItemId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(s, ItemId::from("12"));
        assert_eq!(format!("{n}"), "12");
        assert_eq!(format!("{s}"), "12");
    }

    proptest! {
        #[test]
        fn integer_ids_match_their_decimal_text(n in -(1i64 << 53)..(1i64 << 53)) {
            prop_assert!(ItemId::from(n).matches(&json!(n.to_string())));
            prop_assert!(ItemId::from(n.to_string()).matches(&json!(n)));
        }
    }
}
