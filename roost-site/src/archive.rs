//! The `/archive/` index: one short linked line per tweet.
use crate::escape::{collapse_whitespace, escape_html, take_chars};
use roost_common::{Result, RoostError};
use roost_social::twitter::Record;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const PREVIEW_CHARS: usize = 70;

const HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>archive</title>
  <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css" rel="stylesheet" crossorigin="anonymous">
  <link rel="stylesheet" href="/styles.css">
</head>
<body>
  <div class="container py-4">
    <div class="row">
      <div class="col-12 text-white">
        <h1 class="display-6">archive</h1>
        <div class="small d-flex flex-wrap" id="archive-list">
"#;

const FOOT: &str = r#"
        </div>
      </div>
    </div>
  </div>
</body>
</html>
"#;

/// Single-line preview: whitespace collapsed, cut to [`PREVIEW_CHARS`] with `…`.
pub fn preview(alt: &str) -> String {
    let tidy = collapse_whitespace(alt);
    match take_chars(&tidy, PREVIEW_CHARS) {
        (head, true) => format!("{}…", head.trim_end()),
        (head, false) => head.to_string(),
    }
}

/// One `<a>` line, or `None` for records without an id.
pub fn archive_entry(record: &Record) -> Option<String> {
    let id = escape_html(&record.id_string()?);
    let text = escape_html(&preview(&record.alt));
    Some(format!(
        r#"          <a href="/tweet/{id}" class="text-white text-decoration-none small me-2 mb-1">{id}: {text}</a>"#
    ))
}

/// The rendered archive and how many tweet links it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePage {
    pub html: String,
    pub entries: usize,
}

/// Render the whole archive page.
///
/// ```
/// use roost_site::archive::render_archive;
/// use roost_social::twitter::{Record, RecordId};
///
/// let records = vec![
///     Record {
///         id: Some(RecordId::Text("1".into())),
///         alt: "first\n\n  tweet".into(),
///         ..Record::default()
///     },
///     Record::default(),
/// ];
/// let page = render_archive(&records);
/// assert_eq!(page.entries, 1);
/// assert!(page.html.contains(r#"href="/tweet/1""#));
/// assert!(page.html.contains("1: first tweet</a>"));
/// ```
pub fn render_archive(records: &[Record]) -> ArchivePage {
    let mut html = String::from(HEAD);
    let mut entries = 0;
    for line in records.iter().filter_map(archive_entry) {
        html.push_str(&line);
        html.push('\n');
        entries += 1;
    }
    html.push_str(FOOT);
    ArchivePage { html, entries }
}

/// Typed records for the archive; entries that do not convert are skipped.
pub fn archive_records(raw: &[Value]) -> Vec<Record> {
    raw.iter()
        .enumerate()
        .filter_map(|(idx, v)| match Record::from_value(v) {
            Ok(r) => Some(r),
            Err(e) => {
                debug!(idx, error = %e, "record left out of archive");
                None
            }
        })
        .collect()
}

pub fn write_archive(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RoostError::io(parent, e))?;
    }
    fs::write(path, html).map_err(|e| RoostError::io(path, e))
}
