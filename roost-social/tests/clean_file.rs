use roost_common::RoostError;
use roost_social::twitter::{CleanOptions, clean_file};
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

const ORIGINAL: &str = r#"[
  {"id": "1", "alt": "3/4/23\nhello", "keep": {"nested": true}},
  {"id": "2", "alt": "no date"},
  {"id": "3", "alt": null}
]"#;

#[test]
fn backs_up_then_rewrites_in_place() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data.json");
    fs::write(&input, ORIGINAL).unwrap();

    let report = clean_file(&CleanOptions::new(&input)).expect("clean runs");
    assert_eq!(report.processed, 3);
    assert_eq!(report.updated, 1);

    let backup = tmp.path().join("data.json.bak");
    assert_eq!(fs::read_to_string(&backup).unwrap(), ORIGINAL);

    let cleaned: Value = serde_json::from_str(&fs::read_to_string(&input).unwrap()).unwrap();
    assert_eq!(
        cleaned,
        json!([
            {"id": "1", "alt": "hello", "keep": {"nested": true}, "date": "2023-03-04"},
            {"id": "2", "alt": "no date"},
            {"id": "3", "alt": null}
        ])
    );
}

#[test]
fn separate_output_leaves_input_alone() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data.json");
    fs::write(&input, ORIGINAL).unwrap();

    let opts = CleanOptions {
        input: input.clone(),
        backup: Some(tmp.path().join("backups").join("orig.json")),
        output: Some(tmp.path().join("clean.json")),
    };
    clean_file(&opts).unwrap();

    assert_eq!(fs::read_to_string(&input).unwrap(), ORIGINAL);
    assert!(tmp.path().join("backups/orig.json").is_file());
    assert!(tmp.path().join("clean.json").is_file());
}

#[test]
fn second_run_updates_nothing() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data.json");
    fs::write(&input, ORIGINAL).unwrap();

    clean_file(&CleanOptions::new(&input)).unwrap();
    let after_first = fs::read_to_string(&input).unwrap();
    let report = clean_file(&CleanOptions::new(&input)).unwrap();

    assert_eq!(report.updated, 0);
    assert_eq!(fs::read_to_string(&input).unwrap(), after_first);
}

#[test]
fn unreadable_input_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("data.json");
    fs::write(&input, "{ not json").unwrap();

    let err = clean_file(&CleanOptions::new(&input)).unwrap_err();
    assert!(matches!(err, RoostError::Json(_)), "{err}");
    assert!(!tmp.path().join("data.json.bak").exists());
    assert_eq!(fs::read_to_string(&input).unwrap(), "{ not json");

    let missing = tmp.path().join("absent.json");
    assert!(clean_file(&CleanOptions::new(&missing)).is_err());
    assert!(!tmp.path().join("absent.json.bak").exists());
}
