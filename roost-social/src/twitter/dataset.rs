//! Loading and saving the raw tweet dataset.
//!
//! The dataset is kept as `serde_json::Value` so that fields the tools do not
//! know about survive a clean/rewrite cycle in their original order.
use roost_common::{Result, RoostError};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| RoostError::read(path, e))
}

/// Load a dataset that must be a JSON array of records.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let text = read_text(path)?;
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(items) => {
            debug!(path = %path.display(), count = items.len(), "dataset loaded");
            Ok(items)
        }
        other => Err(RoostError::Dataset(format!(
            "{} must hold a JSON array, found {}",
            path.display(),
            kind_of(&other)
        ))),
    }
}

/// Load a whole-file JSON document, falling back to JSON-lines.
///
/// When the file is not a single JSON document, every non-blank line that
/// parses becomes one element of the returned array. If no line parses the
/// original error is returned.
pub fn load_json_candidates(path: &Path) -> Result<Value> {
    let text = read_text(path)?;
    parse_json_candidates(&text)
}

pub(crate) fn parse_json_candidates(text: &str) -> Result<Value> {
    let whole_err = match serde_json::from_str::<Value>(text) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };

    let mut objs = Vec::new();
    let mut skipped = 0usize;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match serde_json::from_str::<Value>(line) {
            Ok(v) => objs.push(v),
            Err(_) => skipped += 1,
        }
    }
    if objs.is_empty() {
        return Err(whole_err.into());
    }
    if skipped > 0 {
        warn!(skipped, parsed = objs.len(), "ignored unparsable JSON-lines entries");
    }
    Ok(Value::Array(objs))
}

/// Write the dataset pretty printed with two-space indentation.
pub fn write_records(path: &Path, records: &[Value]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RoostError::io(parent, e))?;
    }
    let body = serde_json::to_string_pretty(records)?;
    fs::write(path, body).map_err(|e| RoostError::io(path, e))
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn whole_document_wins_over_lines() {
        let v = parse_json_candidates("[{\"id\": 1}]").unwrap();
        assert_eq!(v, json!([{"id": 1}]));
    }

    #[test]
    fn falls_back_to_json_lines() {
        let text = "{\"id\": \"1\"}\n\n{\"id\": \"2\"}\nnot json\n";
        let v = parse_json_candidates(text).unwrap();
        assert_eq!(v, json!([{"id": "1"}, {"id": "2"}]));
    }

    #[test]
    fn garbage_reports_the_parse_error() {
        let err = parse_json_candidates("nope\nstill nope").unwrap_err();
        assert!(matches!(err, RoostError::Json(_)));
    }

    #[test]
    fn records_must_be_an_array() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("data.json");
        fs::write(&p, "{\"id\": 1}").unwrap();
        let err = load_records(&p).unwrap_err();
        assert!(matches!(err, RoostError::Dataset(_)), "{err}");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_records(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, RoostError::Read { .. }));
    }

    #[test]
    fn write_keeps_key_order_and_unicode() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("out").join("data.json");
        let recs = vec![json!({"id": "1", "alt": "caf\u{e9}", "extra": true})];
        write_records(&p, &recs).unwrap();
        let text = fs::read_to_string(&p).unwrap();
        assert!(text.contains("café"));
        let id_at = text.find("\"id\"").unwrap();
        let extra_at = text.find("\"extra\"").unwrap();
        assert!(id_at < extra_at);
        assert!(text.contains("\n  {\n    \"id\""));
    }
}
