use roost_site::{BakeOptions, BakeSummary, IdFilter, bake_pages};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn dataset() -> Vec<Value> {
    vec![
        json!({"id": "100", "name": "Ada", "handle": "ada", "alt": "A & B\n<script>"}),
        json!({"name": "nobody", "alt": "no id here"}),
        json!({"id": 200, "alt": "numeric id"}),
    ]
}

fn options(root: &Path) -> BakeOptions {
    BakeOptions {
        out_dir: root.join("tweet"),
        log_path: root.join("logs").join("bake.log"),
        ids: IdFilter::All,
        limit: None,
    }
}

#[test]
fn bakes_pages_and_logs_each_record() {
    let tmp = TempDir::new().unwrap();
    let opts = options(tmp.path());

    let summary = bake_pages(&dataset(), &opts).expect("bake runs");
    assert_eq!(
        summary,
        BakeSummary {
            considered: 3,
            created: 2,
            failed: 1
        }
    );

    let page = fs::read_to_string(opts.out_dir.join("100").join("index.html")).unwrap();
    assert!(page.contains("A &amp; B<br>&lt;script&gt;"));
    assert!(opts.out_dir.join("200").join("index.html").is_file());

    let log = fs::read_to_string(&opts.log_path).unwrap();
    assert_eq!(log, "100\tOK\nMISSING_ID\tFAIL\tmissing id\n200\tOK\n");
}

#[test]
fn rerun_appends_to_log_and_rewrites_identical_pages() {
    let tmp = TempDir::new().unwrap();
    let opts = options(tmp.path());

    bake_pages(&dataset(), &opts).unwrap();
    let first = fs::read(opts.out_dir.join("100/index.html")).unwrap();
    bake_pages(&dataset(), &opts).unwrap();
    let second = fs::read(opts.out_dir.join("100/index.html")).unwrap();

    assert_eq!(first, second);
    let log = fs::read_to_string(&opts.log_path).unwrap();
    assert_eq!(log.lines().count(), 6);
}

#[test]
fn id_filter_and_limit_restrict_output() {
    let tmp = TempDir::new().unwrap();
    let mut opts = options(tmp.path());
    opts.ids = "200,100".parse().unwrap();
    opts.limit = Some(1);

    let summary = bake_pages(&dataset(), &opts).unwrap();
    assert_eq!(summary.created, 1);
    assert!(opts.out_dir.join("100/index.html").is_file());
    assert!(!opts.out_dir.join("200").exists());
}
