//! Writing per-tweet pages to disk.
//!
//! Every record gets one line in an append-only, tab-separated bake log:
//! `<id>\tOK` or `<id>\tFAIL\t<message>`. A failing record never stops the
//! run; only problems with the log or output directory themselves do.
use crate::page::{RenderedPage, render_page};
use roost_common::{Result, RoostError};
use roost_social::twitter::Record;
use roost_social::twitter::types::raw_id_label;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Which records to bake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl FromStr for IdFilter {
    type Err = std::convert::Infallible;

    /// `all` (any case) or a comma-separated id list. Blank entries are
    /// dropped, and a list with nothing left in it means every record.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let ids: BTreeSet<String> = s
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Ok(if ids.is_empty() { Self::All } else { Self::Only(ids) })
    }
}

impl IdFilter {
    fn admits(&self, record: &Value) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => raw_id_label(record).is_some_and(|id| wanted.contains(&id)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BakeOptions {
    /// Directory holding one `<id>/index.html` per tweet.
    pub out_dir: PathBuf,
    pub log_path: PathBuf,
    pub ids: IdFilter,
    /// Applied after the id filter; `Some(0)` means no limit.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeSummary {
    pub considered: usize,
    pub created: usize,
    pub failed: usize,
}

/// Tab-separated per-record outcome log.
pub struct BakeLog<W: Write> {
    out: W,
}

impl BakeLog<File> {
    /// Open `path` for appending, creating parent directories.
    pub fn append_to(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RoostError::io(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| RoostError::io(path, e))?;
        Ok(Self { out: file })
    }
}

impl<W: Write> BakeLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn ok(&mut self, id: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}\tOK", one_field(id))
    }

    pub fn fail(&mut self, id: &str, message: &str) -> std::io::Result<()> {
        writeln!(self.out, "{}\tFAIL\t{}", one_field(id), one_field(message))
    }
}

// Keep each entry on one line with a fixed column count.
fn one_field(s: &str) -> String {
    s.replace(['\t', '\r', '\n'], " ")
}

/// Apply the id filter, then the limit. A zero limit is the same as none.
pub fn select_records<'a>(records: &'a [Value], ids: &IdFilter, limit: Option<usize>) -> Vec<&'a Value> {
    let limit = limit.filter(|&n| n > 0).unwrap_or(usize::MAX);
    records.iter().filter(|r| ids.admits(r)).take(limit).collect()
}

/// Write one rendered page under `out_dir`.
pub fn write_page(out_dir: &Path, page: &RenderedPage) -> Result<PathBuf> {
    let path = out_dir.join(page.relative_path());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RoostError::io(parent, e))?;
    }
    fs::write(&path, &page.html).map_err(|e| RoostError::io(&path, e))?;
    Ok(path)
}

fn bake_one(raw: &Value, out_dir: &Path) -> Result<(String, PathBuf)> {
    let record = Record::from_value(raw)?;
    let page = render_page(&record)?;
    let path = write_page(out_dir, &page)?;
    Ok((page.id, path))
}

/// Bake `records` into `out_dir`, recording each outcome in `log`.
pub fn bake_records<W: Write>(
    records: &[&Value],
    out_dir: &Path,
    log: &mut BakeLog<W>,
) -> Result<BakeSummary> {
    let log_err = |e: std::io::Error| RoostError::io("bake log", e);
    let mut summary = BakeSummary {
        considered: records.len(),
        ..BakeSummary::default()
    };

    for raw in records {
        match bake_one(raw, out_dir) {
            Ok((id, path)) => {
                debug!(%id, path = %path.display(), "page written");
                log.ok(&id).map_err(log_err)?;
                summary.created += 1;
            }
            Err(RoostError::MissingId) => {
                warn!("record without id skipped");
                log.fail("MISSING_ID", "missing id").map_err(log_err)?;
                summary.failed += 1;
            }
            Err(e) => {
                let label = raw_id_label(raw).unwrap_or_else(|| "UNKNOWN".to_string());
                warn!(id = %label, error = %e, "page failed");
                log.fail(&label, &e.to_string()).map_err(log_err)?;
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Select, render and write pages, appending outcomes to the bake log file.
///
/// Returns an error only when the log cannot be opened or written.
pub fn bake_pages(records: &[Value], opts: &BakeOptions) -> Result<BakeSummary> {
    let selected = select_records(records, &opts.ids, opts.limit);
    let mut log = BakeLog::append_to(&opts.log_path)?;
    fs::create_dir_all(&opts.out_dir).map_err(|e| RoostError::io(&opts.out_dir, e))?;

    let summary = bake_records(&selected, &opts.out_dir, &mut log)?;
    log.into_inner()
        .flush()
        .map_err(|e| RoostError::io(&opts.log_path, e))?;

    info!(
        considered = summary.considered,
        created = summary.created,
        failed = summary.failed,
        log = %opts.log_path.display(),
        "bake complete"
    );
    Ok(summary)
}
