//! Serde helpers for JSON objects whose key order and duplicate keys matter.
//!
//! `HashMap`/`BTreeMap` silently collapse repeated keys and lose the order the
//! client wrote them in. Roster order drives every deterministic ordering in
//! the engine output, and a repeated name has to surface as a validation error,
//! so objects are read into `Vec<(String, V)>` instead.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Serialize entries as a JSON object, preserving their order
pub fn serialize<S, V>(entries: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Deserialize a JSON object into entries, keeping order and repeated keys
pub fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

struct EntriesVisitor<V>(PhantomData<V>);

impl<'de, V> Visitor<'de> for EntriesVisitor<V>
where
    V: Deserialize<'de>,
{
    type Value = Vec<(String, V)>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object keyed by person name")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            entries.push((key, value));
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        pairs: Vec<(String, String)>,
    }

    #[test]
    fn test_keeps_order_and_duplicates() {
        let json = r#"{"pairs": {"b": "1", "a": "2", "b": "3"}}"#;
        let wrapper: Wrapper = serde_json::from_str(json).unwrap();

        assert_eq!(
            wrapper.pairs,
            vec![
                ("b".to_string(), "1".to_string()),
                ("a".to_string(), "2".to_string()),
                ("b".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_serializes_as_object() {
        let wrapper = Wrapper {
            pairs: vec![("z".to_string(), "1".to_string()), ("a".to_string(), "2".to_string())],
        };

        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"pairs":{"z":"1","a":"2"}}"#);
    }

    #[test]
    fn test_rejects_non_object() {
        let json = r#"{"pairs": ["a", "b"]}"#;
        assert!(serde_json::from_str::<Wrapper>(json).is_err());
    }
}
