//! Value tree for parsed tachograph records.
//!
//! The parser hands over plain JSON-like data, except that some nested
//! structures are map-like: ordered key/value pairs whose keys are not
//! necessarily strings (card file ids, for instance). `DataNode::Map` keeps
//! those intact until export, where they are rewritten into ordinary objects.

use serde_json::{Map, Number, Value};

/// One node of a parsed record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataNode {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<DataNode>),
    /// String-keyed mapping in insertion order.
    Object(Vec<(String, DataNode)>),
    /// Map-like structure with arbitrary key nodes, in insertion order.
    Map(Vec<(DataNode, DataNode)>),
}

impl DataNode {
    /// Build an object node from `(key, value)` pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, DataNode)>,
    {
        DataNode::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataNode::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataNode::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DataNode]> {
        match self {
            DataNode::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this node is a mapping (object or map-like).
    pub fn is_mapping(&self) -> bool {
        matches!(self, DataNode::Object(_) | DataNode::Map(_))
    }

    /// Look up a member by key.
    ///
    /// Objects match on the key directly; map-like nodes match on the
    /// string form of their key nodes. A `null` member counts as absent.
    pub fn get(&self, key: &str) -> Option<&DataNode> {
        let found = match self {
            DataNode::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            DataNode::Map(entries) => entries
                .iter()
                .find(|(k, _)| coerce_key(k) == key)
                .map(|(_, v)| v),
            _ => None,
        };
        found.filter(|v| !v.is_null())
    }

    /// Members of a mapping with string keys.
    ///
    /// Map-like keys are coerced the same way export coerces them. Non-mapping
    /// nodes have no entries.
    pub fn entries(&self) -> Vec<(String, &DataNode)> {
        match self {
            DataNode::Object(entries) => entries.iter().map(|(k, v)| (k.clone(), v)).collect(),
            DataNode::Map(entries) => entries.iter().map(|(k, v)| (coerce_key(k), v)).collect(),
            _ => Vec::new(),
        }
    }

    /// Interpret an array of small integers as raw bytes.
    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        self.as_array()?
            .iter()
            .map(|item| match item {
                DataNode::Number(n) => n.as_u64().and_then(|b| u8::try_from(b).ok()),
                _ => None,
            })
            .collect()
    }

    /// Rewrite every map-like structure into a string-keyed object.
    ///
    /// Entries keep their insertion order. When two keys coerce to the same
    /// string, the entry stays at the first position and takes the last value.
    pub fn normalized(&self) -> DataNode {
        match self {
            DataNode::Array(items) => DataNode::Array(items.iter().map(DataNode::normalized).collect()),
            DataNode::Object(entries) => {
                merge_entries(entries.iter().map(|(k, v)| (k.clone(), v.normalized())))
            }
            DataNode::Map(entries) => {
                merge_entries(entries.iter().map(|(k, v)| (coerce_key(k), v.normalized())))
            }
            scalar => scalar.clone(),
        }
    }

    /// Convert to a `serde_json::Value`, normalizing map-like structures.
    pub fn to_json(&self) -> Value {
        match self {
            DataNode::Null => Value::Null,
            DataNode::Bool(b) => Value::Bool(*b),
            DataNode::Number(n) => Value::Number(n.clone()),
            DataNode::String(s) => Value::String(s.clone()),
            DataNode::Array(items) => Value::Array(items.iter().map(DataNode::to_json).collect()),
            DataNode::Object(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_json());
                }
                Value::Object(map)
            }
            DataNode::Map(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (k, v) in entries {
                    map.insert(coerce_key(k), v.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

/// String form of a map key.
///
/// Strings are used verbatim, scalars by their JSON text and composite keys
/// by their compact JSON encoding.
pub fn coerce_key(key: &DataNode) -> String {
    match key {
        DataNode::String(s) => s.clone(),
        DataNode::Number(n) => n.to_string(),
        DataNode::Bool(b) => b.to_string(),
        DataNode::Null => "null".to_string(),
        composite => composite.to_json().to_string(),
    }
}

fn merge_entries(entries: impl Iterator<Item = (String, DataNode)>) -> DataNode {
    let mut merged: Vec<(String, DataNode)> = Vec::new();
    for (key, value) in entries {
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => merged.push((key, value)),
        }
    }
    DataNode::Object(merged)
}

impl From<Value> for DataNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => DataNode::Null,
            Value::Bool(b) => DataNode::Bool(b),
            Value::Number(n) => DataNode::Number(n),
            Value::String(s) => DataNode::String(s),
            Value::Array(items) => DataNode::Array(items.into_iter().map(DataNode::from).collect()),
            Value::Object(map) => {
                DataNode::Object(map.into_iter().map(|(k, v)| (k, DataNode::from(v))).collect())
            }
        }
    }
}

impl From<&str> for DataNode {
    fn from(value: &str) -> Self {
        DataNode::String(value.to_string())
    }
}

impl From<String> for DataNode {
    fn from(value: String) -> Self {
        DataNode::String(value)
    }
}

impl From<bool> for DataNode {
    fn from(value: bool) -> Self {
        DataNode::Bool(value)
    }
}

impl From<u64> for DataNode {
    fn from(value: u64) -> Self {
        DataNode::Number(Number::from(value))
    }
}

impl From<i64> for DataNode {
    fn from(value: i64) -> Self {
        DataNode::Number(Number::from(value))
    }
}

impl From<Vec<DataNode>> for DataNode {
    fn from(items: Vec<DataNode>) -> Self {
        DataNode::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_value_keeps_member_order() {
        let node = DataNode::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<String> = node.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_get_treats_null_as_absent() {
        let node = DataNode::from(json!({"present": 1, "missing": null}));
        assert!(node.get("present").is_some());
        assert!(node.get("missing").is_none());
        assert!(node.get("unknown").is_none());
    }

    #[test]
    fn test_get_on_map_matches_coerced_key() {
        let node = DataNode::Map(vec![
            (DataNode::from(1281u64), DataNode::from("events")),
            (DataNode::from("ICC"), DataNode::from("icc")),
        ]);
        assert_eq!(node.get("1281"), Some(&DataNode::from("events")));
        assert_eq!(node.get("ICC"), Some(&DataNode::from("icc")));
    }

    #[test]
    fn test_coerce_key_forms() {
        assert_eq!(coerce_key(&DataNode::from("EF_ICC")), "EF_ICC");
        assert_eq!(coerce_key(&DataNode::from(2u64)), "2");
        assert_eq!(coerce_key(&DataNode::from(true)), "true");
        assert_eq!(coerce_key(&DataNode::Null), "null");
        assert_eq!(
            coerce_key(&DataNode::Array(vec![DataNode::from(1u64), DataNode::from(2u64)])),
            "[1,2]"
        );
    }

    #[test]
    fn test_normalized_rewrites_nested_maps() {
        let node = DataNode::object([(
            "dataFiles",
            DataNode::Map(vec![
                (DataNode::from(2u64), DataNode::from("icc")),
                (
                    DataNode::from(5u64),
                    DataNode::Map(vec![(DataNode::from(false), DataNode::from("inner"))]),
                ),
            ]),
        )]);

        let expected = DataNode::object([(
            "dataFiles",
            DataNode::object([
                ("2", DataNode::from("icc")),
                ("5", DataNode::object([("false", DataNode::from("inner"))])),
            ]),
        )]);
        assert_eq!(node.normalized(), expected);
    }

    #[test]
    fn test_normalized_duplicate_keys_keep_first_position_last_value() {
        let node = DataNode::Map(vec![
            (DataNode::from(1u64), DataNode::from("a")),
            (DataNode::from("x"), DataNode::from("b")),
            (DataNode::from("1"), DataNode::from("c")),
        ]);
        let expected = DataNode::object([("1", DataNode::from("c")), ("x", DataNode::from("b"))]);
        assert_eq!(node.normalized(), expected);
        assert_eq!(node.normalized().to_json(), node.to_json());
    }

    #[test]
    fn test_as_bytes() {
        let node = DataNode::from(json!([0, 127, 255]));
        assert_eq!(node.as_bytes(), Some(vec![0, 127, 255]));
        assert_eq!(DataNode::from(json!([256])).as_bytes(), None);
        assert_eq!(DataNode::from(json!(["a"])).as_bytes(), None);
        assert_eq!(DataNode::from("raw").as_bytes(), None);
    }
}
