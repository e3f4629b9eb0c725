#![warn(missing_docs)]
//! Deterministic test doubles for driving the portal tracker headlessly.

mod clock;
mod recording;
mod world;

use anyhow::Result;
use portal_logger_core::SimTick;
use portal_logger_tracker::TickOutcome;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub use clock::*;
pub use recording::*;
pub use world::*;

/// One portal transition captured during a scripted run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    /// Tick at which the transition happened.
    pub tick: SimTick,
    /// `entered` or `exited`.
    pub kind: &'static str,
    /// Portal identifier (`Dimension:x,y,z`).
    pub portal: String,
    /// Arrival identifier for cross-dimension exits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival: Option<String>,
    /// Whether an entry was a repeat.
    pub repeat: bool,
}

impl TransitionRecord {
    /// Convert a tick outcome; `None` for idle ticks.
    pub fn from_outcome(tick: SimTick, outcome: TickOutcome) -> Option<Self> {
        match outcome {
            TickOutcome::Idle => None,
            TickOutcome::Entered { portal, repeat } => Some(Self {
                tick,
                kind: "entered",
                portal: portal.to_string(),
                arrival: None,
                repeat,
            }),
            TickOutcome::Exited { from, to } => Some(Self {
                tick,
                kind: "exited",
                portal: from.to_string(),
                arrival: to.map(|id| id.to_string()),
                repeat: false,
            }),
        }
    }
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append one record.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

/// Scratch directory under the system temp dir, removed on drop.
#[derive(Debug)]
pub struct TempDir {
    inner: tempfile::TempDir,
}

impl TempDir {
    /// Create a fresh directory whose name starts with `prefix`.
    pub fn new(prefix: &str) -> Result<Self> {
        let inner = tempfile::Builder::new().prefix(prefix).tempdir()?;
        Ok(Self { inner })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Path of a file inside the directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_logger_core::{BlockPos, DimensionId};
    use portal_logger_tracker::PortalId;

    #[test]
    fn jsonl_sink_writes_one_line_per_record() {
        let dir = TempDir::new("portal_logger_testkit_jsonl").expect("temp dir");
        let path = dir.join("transitions.jsonl");
        let portal = PortalId::new(DimensionId::Overworld, BlockPos::new(1, 2, 3));

        let mut sink = JsonlSink::create(&path).expect("sink create");
        let entered = TransitionRecord::from_outcome(
            SimTick(4),
            TickOutcome::Entered {
                portal,
                repeat: false,
            },
        )
        .expect("entry is recorded");
        sink.write(&entered).expect("write succeeds");

        let contents = std::fs::read_to_string(&path).expect("file readable");
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("\"portal\":\"Overworld:1,2,3\""));
        assert!(!contents.contains("arrival"));
    }

    #[test]
    fn idle_ticks_are_not_recorded() {
        assert!(TransitionRecord::from_outcome(SimTick::ZERO, TickOutcome::Idle).is_none());
    }

    #[test]
    fn temp_dir_is_removed_on_drop() {
        let path = {
            let dir = TempDir::new("portal_logger_testkit_tempdir").expect("temp dir");
            assert!(dir.path().is_dir());
            dir.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
