//! Tweet ID discovery in loosely shaped JSON.
//!
//! Sitemap input is not always the canonical dataset: exports arrive as maps
//! keyed by id, wrapper objects holding a record list, or bare id lists. Each
//! recognised layout is a [`ShapeMatcher`]; [`extract_ids`] tries them in a
//! fixed order and the first that yields any ids wins.
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

/// Record keys that may carry the tweet id, in lookup order.
pub const ID_KEYS: [&str; 5] = ["id", "id_str", "tweet_id", "tweetId", "tweetID"];

/// Unique ids, iterated in lexicographic order.
pub type IdSet = BTreeSet<String>;

/// One recognised dataset layout.
pub trait ShapeMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Some` with a non-empty set when the layout matches, `None` otherwise.
    fn extract(&self, data: &Value) -> Option<IdSet>;
}

/// `{"123": {...}, "456": {...}}`: the keys are the ids.
pub struct DigitKeyedMap;

/// `{"tweets": [{"id": ...}, ...]}`: the first record list that yields ids.
pub struct WrappedRecordList;

/// `{"a": {"id": ...}, "b": {"id": ...}}`: one record per value.
pub struct NestedMaps;

/// `[{"id": ...}, "123", 456]`: records or bare ids.
pub struct FlatList;

pub static SHAPE_MATCHERS: &[&dyn ShapeMatcher] =
    &[&DigitKeyedMap, &WrappedRecordList, &NestedMaps, &FlatList];

/// Normalise one id value: integers in decimal, strings trimmed, everything else dropped.
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        _ => None,
    }
}

/// Id of a single record: the first [`ID_KEYS`] entry present decides.
pub fn record_id(record: &Map<String, Value>) -> Option<String> {
    ID_KEYS
        .iter()
        .find_map(|k| record.get(*k))
        .and_then(id_from_value)
}

fn non_empty(ids: IdSet) -> Option<IdSet> {
    (!ids.is_empty()).then_some(ids)
}

impl ShapeMatcher for DigitKeyedMap {
    fn name(&self) -> &'static str {
        "digit-keyed-map"
    }

    fn extract(&self, data: &Value) -> Option<IdSet> {
        let map = data.as_object()?;
        let all_digits = !map.is_empty()
            && map
                .keys()
                .all(|k| !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()));
        all_digits.then(|| map.keys().cloned().collect())
    }
}

impl ShapeMatcher for WrappedRecordList {
    fn name(&self) -> &'static str {
        "wrapped-record-list"
    }

    fn extract(&self, data: &Value) -> Option<IdSet> {
        data.as_object()?.values().find_map(|val| {
            let items = val.as_array()?;
            items.first()?.as_object()?;
            non_empty(
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .filter_map(record_id)
                    .collect(),
            )
        })
    }
}

impl ShapeMatcher for NestedMaps {
    fn name(&self) -> &'static str {
        "nested-maps"
    }

    fn extract(&self, data: &Value) -> Option<IdSet> {
        non_empty(
            data.as_object()?
                .values()
                .filter_map(Value::as_object)
                .filter_map(record_id)
                .collect(),
        )
    }
}

impl ShapeMatcher for FlatList {
    fn name(&self) -> &'static str {
        "flat-list"
    }

    fn extract(&self, data: &Value) -> Option<IdSet> {
        non_empty(
            data.as_array()?
                .iter()
                .filter_map(|item| match item {
                    Value::Object(record) => record_id(record),
                    Value::String(_) | Value::Number(_) => id_from_value(item),
                    _ => None,
                })
                .collect(),
        )
    }
}

/// Run `matchers` in order and return the first non-empty result.
pub fn extract_ids_with(data: &Value, matchers: &[&dyn ShapeMatcher]) -> IdSet {
    matchers
        .iter()
        .find_map(|m| {
            let ids = m.extract(data)?;
            debug!(shape = m.name(), count = ids.len(), "matched id layout");
            Some(ids)
        })
        .unwrap_or_default()
}

/// Collect tweet ids from `data` using the standard layouts.
///
/// ```
/// use roost_social::twitter::extract_ids;
/// use serde_json::json;
///
/// let ids = extract_ids(&json!([{"id": 7}, {"tweet_id": "8"}]));
/// assert_eq!(ids.into_iter().collect::<Vec<_>>(), ["7", "8"]);
/// ```
pub fn extract_ids(data: &Value) -> IdSet {
    extract_ids_with(data, SHAPE_MATCHERS)
}
