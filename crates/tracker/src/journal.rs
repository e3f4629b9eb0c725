use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::format_timestamp;

/// Append-only, human-readable portal log.
///
/// Each event becomes one `[yyyy-MM-dd HH:mm:ss] message` line. A header is
/// written once, when the file is first created.
#[derive(Debug, Clone)]
pub struct PortalJournal {
    path: PathBuf,
}

impl PortalJournal {
    /// Journal backed by the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header if it does not exist yet.
    ///
    /// Returns `true` when the file was created by this call.
    pub fn ensure_header(&self, now: &DateTime<Local>) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create log directory")?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Could not create log file {}", self.path.display()))?;
        write!(
            file,
            "=== Portal Log Started at {} ===\nFormat: [Timestamp] Dimension: (X, Y, Z) -> Destination\n\n",
            format_timestamp(now)
        )
        .context("Failed to write log header")?;
        Ok(true)
    }

    /// Append one timestamped line.
    pub fn append(&self, now: &DateTime<Local>, message: &str) -> Result<()> {
        self.ensure_header(now)?;
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file {}", self.path.display()))?;
        writeln!(file, "[{}] {}", format_timestamp(now), message)
            .context("Failed to write to log file")?;
        Ok(())
    }
}
