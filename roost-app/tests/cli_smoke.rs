use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn bin_path() -> &'static str {
    env!("CARGO_BIN_EXE_roost")
}

/// Run `roost` inside `dir` with logs and user config kept in the tempdir.
fn roost(dir: &Path, args: &[&str]) -> Output {
    Command::new(bin_path())
        .current_dir(dir)
        .env("ROOST_LOG_DIR", dir.join("run-logs"))
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run roost")
}

fn write_dataset(dir: &Path) {
    let data = json!([
        {"id": "11", "name": "Ada", "handle": "ada", "alt": "1/2/2021\nfirst tweet"},
        {"id": "12", "name": "Ada", "handle": "ada", "alt": "second tweet"}
    ]);
    fs::write(dir.join("data.json"), data.to_string()).unwrap();
}

#[test]
fn help_runs() {
    let tmp = TempDir::new().expect("tempdir");
    let output = roost(tmp.path(), &["--help"]);

    assert!(output.status.success(), "help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["clean", "bake", "archive", "sitemap"] {
        assert!(stdout.contains(sub), "missing {sub} in help: {stdout}");
    }
}

#[test]
fn full_pipeline_with_defaults() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    write_dataset(dir);

    let out = roost(dir, &["clean"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.join("data.json.bak").is_file());
    let cleaned: Value = serde_json::from_str(&fs::read_to_string(dir.join("data.json")).unwrap()).unwrap();
    assert_eq!(cleaned[0]["date"], "2021-01-02");
    assert_eq!(cleaned[0]["alt"], "first tweet");

    let out = roost(dir, &["bake"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(dir.join("tweet/11/index.html").is_file());
    assert!(dir.join("tweet/12/index.html").is_file());
    assert_eq!(
        fs::read_to_string(dir.join("logs/bake.log")).unwrap(),
        "11\tOK\n12\tOK\n"
    );

    let out = roost(dir, &["archive"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let archive = fs::read_to_string(dir.join("archive/index.html")).unwrap();
    assert!(archive.contains("11: first tweet</a>"));

    let out = roost(dir, &["sitemap", "--base-url", "https://x.test/"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let sitemap = fs::read_to_string(dir.join("sitemap.xml")).unwrap();
    assert!(sitemap.contains("<loc>https://x.test/tweet/12</loc>"));
    assert!(String::from_utf8_lossy(&out.stdout).contains("3 urls"));
}

#[test]
fn config_file_supplies_paths_and_base_url() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    write_dataset(dir);
    fs::write(
        dir.join("site.yaml"),
        "site:\n  base_url: https://conf.test\n  sitemap: public/sitemap.xml\n",
    )
    .unwrap();

    let out = roost(dir, &["--config", "site.yaml", "sitemap"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let sitemap = fs::read_to_string(dir.join("public/sitemap.xml")).unwrap();
    assert!(sitemap.contains("<loc>https://conf.test/</loc>"));
}

#[test]
fn sitemap_without_base_url_fails() {
    let tmp = TempDir::new().expect("tempdir");
    write_dataset(tmp.path());

    let out = roost(tmp.path(), &["sitemap"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("base URL"));
    assert!(!tmp.path().join("sitemap.xml").exists());
}

#[test]
fn exit_codes_distinguish_missing_and_malformed_input() {
    let tmp = TempDir::new().expect("tempdir");

    let out = roost(tmp.path(), &["sitemap", "-b", "https://x.test", "-i", "absent.json"]);
    assert_eq!(out.status.code(), Some(2));

    fs::write(tmp.path().join("bad.json"), "{ nope").unwrap();
    let out = roost(tmp.path(), &["clean", "--input", "bad.json"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(!tmp.path().join("bad.json.bak").exists());
}

#[test]
fn write_failures_are_not_reported_as_missing_input() {
    let tmp = TempDir::new().expect("tempdir");
    write_dataset(tmp.path());
    // A regular file where the output directory should go.
    fs::write(tmp.path().join("blocked"), "").unwrap();

    let out = roost(tmp.path(), &["archive", "-o", "blocked/index.html"]);
    assert_eq!(out.status.code(), Some(1), "{}", String::from_utf8_lossy(&out.stderr));
}

#[test]
fn empty_id_list_and_zero_limit_bake_everything() {
    let tmp = TempDir::new().expect("tempdir");
    write_dataset(tmp.path());

    let out = roost(tmp.path(), &["bake", "--ids", "", "--limit", "0"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(tmp.path().join("tweet/11/index.html").is_file());
    assert!(tmp.path().join("tweet/12/index.html").is_file());
}

#[test]
fn archive_summary_counts_written_links() {
    let tmp = TempDir::new().expect("tempdir");
    let data = json!([
        {"id": "1", "alt": "kept"},
        {"alt": "no id"},
        {"id": "2", "alt": "also kept", "name": 5}
    ]);
    fs::write(tmp.path().join("data.json"), data.to_string()).unwrap();

    let out = roost(tmp.path(), &["archive"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("with 2 entries"));
}
