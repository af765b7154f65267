use roost_common::{Result, RoostError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Tweet identifier as it appears in the dataset: either a JSON string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

impl RecordId {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One archived tweet, as the renderers see it.
///
/// Only `id` matters for deciding whether a page exists. The display fields
/// fall back to the empty string when absent or not a string, and any other
/// keys (including `date`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, deserialize_with = "id_or_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub handle: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub alt: String,
}

fn lenient_string<'de, D>(de: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(de)? {
        Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

fn id_or_none<'de, D>(de: D) -> std::result::Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(RecordId::Text(s)),
        Value::Number(n) => Some(RecordId::Number(n)),
        _ => None,
    })
}

impl Record {
    /// Typed view of one raw dataset entry. Only JSON objects are records.
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(RoostError::Dataset(format!(
                "expected a record object, found {}",
                kind_name(value)
            )));
        }
        Ok(Self::deserialize(value)?)
    }

    /// The id as a string, `None` when absent or empty.
    pub fn id_string(&self) -> Option<String> {
        self.id
            .as_ref()
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
    }

    /// Like [`Record::id_string`] but a missing id is an error.
    pub fn require_id(&self) -> Result<String> {
        self.id_string().ok_or(RoostError::MissingId)
    }
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Best-effort id of a raw entry for log lines, even when typed conversion fails.
pub fn raw_id_label(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_string_ids_render_the_same_way() {
        let a = Record::from_value(&json!({"id": 1234567890123u64})).unwrap();
        let b = Record::from_value(&json!({"id": "1234567890123"})).unwrap();
        assert_eq!(a.id_string(), b.id_string());
        assert_eq!(a.id_string().as_deref(), Some("1234567890123"));
    }

    #[test]
    fn display_fields_default_to_empty() {
        let r = Record::from_value(&json!({"id": "1", "name": null})).unwrap();
        assert_eq!(r.name, "");
        assert_eq!(r.handle, "");
        assert_eq!(r.alt, "");
    }

    #[test]
    fn missing_or_empty_id_is_rejected() {
        let r = Record::from_value(&json!({"alt": "x"})).unwrap();
        assert!(matches!(r.require_id(), Err(RoostError::MissingId)));
        let r = Record::from_value(&json!({"id": ""})).unwrap();
        assert!(r.id_string().is_none());
    }

    #[test]
    fn non_string_display_fields_become_empty() {
        let r = Record::from_value(&json!({
            "id": "5", "name": 5, "handle": ["h"], "alt": {"x": 1}
        }))
        .unwrap();
        assert_eq!(r.id_string().as_deref(), Some("5"));
        assert_eq!((r.name.as_str(), r.handle.as_str(), r.alt.as_str()), ("", "", ""));
    }

    #[test]
    fn unrelated_fields_do_not_affect_conversion() {
        let r = Record::from_value(&json!({"id": "6", "alt": "world", "date": 20230304})).unwrap();
        assert_eq!(r.id_string().as_deref(), Some("6"));
        assert_eq!(r.alt, "world");
    }

    #[test]
    fn unusable_id_counts_as_missing() {
        let r = Record::from_value(&json!({"id": true, "alt": "x"})).unwrap();
        assert!(matches!(r.require_id(), Err(RoostError::MissingId)));
        let r = Record::from_value(&json!({"id": null})).unwrap();
        assert!(r.id.is_none());
    }

    #[test]
    fn only_objects_are_records() {
        for v in [json!(["x", "y", "z"]), json!("x"), json!(7), json!(null)] {
            assert!(
                matches!(Record::from_value(&v), Err(RoostError::Dataset(_))),
                "{v} converted"
            );
        }
    }

    #[test]
    fn raw_label_survives_bad_records() {
        assert_eq!(raw_id_label(&json!({"id": 9, "name": 5})).as_deref(), Some("9"));
        assert_eq!(raw_id_label(&json!({"name": "x"})), None);
        assert_eq!(raw_id_label(&json!("scalar")), None);
    }
}
