//! Deserialization helpers for quirks of the PHP backend.

use std::collections::HashMap;

use serde::de::{Error, IgnoredAny};
use serde::{Deserialize, Deserializer};

/// PHP's `json_encode` turns an empty associative array into `[]`, so every
/// map on the wire may arrive as an empty list instead of `{}`.
pub fn map_or_empty_list<'de, D, V>(deserializer: D) -> Result<HashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MapOrList<V> {
        Map(HashMap<String, V>),
        List(Vec<IgnoredAny>),
    }

    match MapOrList::<V>::deserialize(deserializer)? {
        MapOrList::Map(map) => Ok(map),
        MapOrList::List(list) if list.is_empty() => Ok(HashMap::new()),
        MapOrList::List(list) => Err(D::Error::custom(format!(
            "expected an object or an empty array, got an array of {} elements",
            list.len()
        ))),
    }
}
