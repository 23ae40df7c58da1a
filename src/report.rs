use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use fs2::FileExt;
use jiff::civil::Date;
use serde::Serialize;

use crate::models::{Outcome, Status};

/// Atomically write content to a file using a temporary file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Output path has no file name: {}", path.display()))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp = path.with_file_name(temp_name);

    let mut file = File::create(&temp)
        .with_context(|| format!("Failed to create temporary file: {}", temp.display()))?;
    file.lock_exclusive()
        .context("Failed to acquire file lock")?;
    file.write_all(content)
        .context("Failed to write file content")?;
    file.sync_all().context("Failed to sync file")?;
    file.unlock().context("Failed to unlock file")?;
    fs::rename(&temp, path).with_context(|| format!("Failed to rename to {}", path.display()))?;
    Ok(())
}

/// Writes outcomes as a pretty-printed JSON array, creating parent
/// directories as needed.
pub fn export_outcomes(outcomes: &[Outcome], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let mut content = serde_json::to_string_pretty(outcomes).context("Failed to encode results")?;
    content.push('\n');
    atomic_write(path, content.as_bytes())
}

/// Reads back a file written by [`export_outcomes`].
pub fn read_outcomes(path: &Path) -> Result<Vec<Outcome>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Prefixes the file name with a `YYMMDD_` token, optionally nesting it in
/// a directory named after the year.
///
/// `reports/scan.json` on 2025-03-07 becomes `reports/250307_scan.json`, or
/// `reports/2025/250307_scan.json` when `by_year` is set.
pub fn timestamped_path(base: &Path, date: Date, by_year: bool) -> PathBuf {
    let name = base
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamped = format!("{}_{name}", date.strftime("%y%m%d"));

    let mut dir = base.parent().map(Path::to_path_buf).unwrap_or_default();
    if by_year {
        dir.push(date.year().to_string());
    }
    dir.join(stamped)
}

pub fn filter_by_status(outcomes: Vec<Outcome>, status: Status) -> Vec<Outcome> {
    outcomes
        .into_iter()
        .filter(|outcome| outcome.status() == status)
        .collect()
}

/// Stable order for display: by log id, then by path for duplicate ids.
pub fn sort_outcomes(outcomes: &mut [Outcome]) {
    outcomes.sort_by(|a, b| {
        a.log_id()
            .cmp(b.log_id())
            .then_with(|| a.file_path().cmp(b.file_path()))
    });
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedLog {
    pub log_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Summary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub failures: Vec<FailedLog>,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let failures: Vec<FailedLog> = outcomes
            .iter()
            .filter(|outcome| !outcome.is_success())
            .map(|outcome| FailedLog {
                log_id: outcome.log_id().to_owned(),
                message: outcome.message().to_owned(),
            })
            .collect();

        Self {
            total: outcomes.len(),
            successful: outcomes.len() - failures.len(),
            failed: failures.len(),
            failures,
        }
    }
}
