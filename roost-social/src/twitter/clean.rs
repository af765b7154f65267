//! One-time cleanup: move leading dates out of `alt` into `date`.
use crate::twitter::dataset::{load_records, write_records};
use crate::twitter::dates::extract_leading_date;
use roost_common::{Result, RoostError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub processed: usize,
    pub updated: usize,
}

/// Paths for a file-level clean run.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub input: PathBuf,
    /// Defaults to `<input>.bak`.
    pub backup: Option<PathBuf>,
    /// Defaults to overwriting `input`.
    pub output: Option<PathBuf>,
}

impl CleanOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            backup: None,
            output: None,
        }
    }

    pub fn backup_path(&self) -> PathBuf {
        self.backup
            .clone()
            .unwrap_or_else(|| default_backup_path(&self.input))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.input.clone())
    }
}

/// `data.json` becomes `data.json.bak`.
pub fn default_backup_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Clean one raw record in place. Returns whether it changed.
///
/// Entries that are not objects, and objects whose `alt` is missing, `null`,
/// empty or not a string, are left untouched.
pub fn clean_record(record: &mut Value) -> bool {
    let Some(obj) = record.as_object_mut() else {
        return false;
    };
    let Some(alt) = obj.get("alt").and_then(Value::as_str).filter(|s| !s.is_empty()) else {
        return false;
    };
    let Some(found) = extract_leading_date(alt) else {
        return false;
    };

    obj.insert("date".to_string(), Value::String(found.iso()));
    obj.insert("alt".to_string(), Value::String(found.rest));
    true
}

/// Clean every record, preserving order.
pub fn clean_records(records: &mut [Value]) -> CleanReport {
    let mut report = CleanReport {
        processed: records.len(),
        updated: 0,
    };
    for (idx, record) in records.iter_mut().enumerate() {
        if clean_record(record) {
            report.updated += 1;
            debug!(idx, id = ?record.get("id"), "extracted leading date");
        }
    }
    report
}

/// Load, back up, clean and rewrite a dataset file.
///
/// Nothing is written if the input cannot be read or parsed. The backup is a
/// byte copy of the original and is always written before the output.
pub fn clean_file(opts: &CleanOptions) -> Result<CleanReport> {
    let mut records = load_records(&opts.input)?;

    let backup = opts.backup_path();
    if let Some(parent) = backup.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RoostError::io(parent, e))?;
    }
    fs::copy(&opts.input, &backup).map_err(|e| RoostError::io(&backup, e))?;
    info!(backup = %backup.display(), "backed up original dataset");

    let report = clean_records(&mut records);

    let output = opts.output_path();
    write_records(&output, &records)?;
    info!(
        processed = report.processed,
        updated = report.updated,
        output = %output.display(),
        "dataset cleaned"
    );
    Ok(report)
}
