//! Flat-file portal catalog persistence.
//!
//! One record per line, `;`-separated:
//!
//! ```text
//! dimension;x;y;z;firstSeenMillis;useCount;link1,link2,...
//! ```
//!
//! The file is rewritten in full on every save. Lines that fail to parse,
//! including lines that are not valid UTF-8, are skipped individually on load.
//! Last-used time is not stored; loaded records report their first-seen time
//! as last-used.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use portal_logger_core::{BlockPos, DimensionId, UnknownDimension};
use thiserror::Error;
use tracing::debug;

use crate::{PortalCatalog, PortalId, PortalRecord};

/// Field separator within a record line.
pub const FIELD_SEPARATOR: char = ';';
/// Separator between linked-portal identifiers.
pub const LINK_SEPARATOR: char = ',';
/// Number of fields in a well-formed record line.
pub const RECORD_FIELDS: usize = 7;

/// Errors emitted while parsing a single catalog line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    /// Fewer than [`RECORD_FIELDS`] fields.
    #[error("expected 7 fields, found {0}")]
    FieldCount(usize),
    /// Dimension column not recognised.
    #[error(transparent)]
    Dimension(#[from] UnknownDimension),
    /// A numeric column failed to parse.
    #[error("invalid {field}: {source}")]
    Number {
        /// Column name.
        field: &'static str,
        /// Underlying integer parse failure.
        source: ParseIntError,
    },
}

fn number<T>(field: &'static str, value: &str) -> Result<T, RecordParseError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    value
        .trim()
        .parse()
        .map_err(|source| RecordParseError::Number { field, source })
}

/// Serialize one record as a catalog line (without trailing newline).
pub fn encode_record(record: &PortalRecord) -> String {
    let links = record
        .linked
        .iter()
        .map(PortalId::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{};{};{};{};{};{};{}",
        record.id.dimension,
        record.id.pos.x,
        record.id.pos.y,
        record.id.pos.z,
        record.first_seen_ms,
        record.use_count,
        links
    )
}

/// Parse one catalog line.
pub fn parse_record(line: &str) -> Result<PortalRecord, RecordParseError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < RECORD_FIELDS {
        return Err(RecordParseError::FieldCount(fields.len()));
    }

    let dimension = DimensionId::parse_display_name(fields[0].trim())?;
    let pos = BlockPos::new(
        number("x", fields[1])?,
        number("y", fields[2])?,
        number("z", fields[3])?,
    );
    let first_seen_ms: i64 = number("first seen", fields[4])?;
    let use_count: u32 = number("use count", fields[5])?;

    let mut record = PortalRecord::new(PortalId::new(dimension, pos), first_seen_ms);
    record.use_count = use_count;
    record.linked.extend(parse_links(fields[6]));
    Ok(record)
}

/// Parse the linked-portal column.
///
/// Identifiers themselves contain commas (`Nether:12,64,25`), so the column is
/// re-grouped: every token carrying a `:` starts a new identifier and the
/// following tokens are its coordinates. Unparseable identifiers are dropped.
pub fn parse_links(field: &str) -> Vec<PortalId> {
    let mut groups: Vec<String> = Vec::new();
    for token in field.split(LINK_SEPARATOR).map(str::trim) {
        if token.is_empty() {
            continue;
        }
        match groups.last_mut() {
            Some(current) if !token.contains(':') => {
                current.push(LINK_SEPARATOR);
                current.push_str(token);
            }
            _ => groups.push(token.to_string()),
        }
    }

    groups
        .iter()
        .filter_map(|group| match group.parse::<PortalId>() {
            Ok(id) => Some(id),
            Err(err) => {
                debug!(%err, "Dropping malformed portal link");
                None
            }
        })
        .collect()
}

/// The catalog file on disk.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    /// Store backed by the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every well-formed record. A missing file yields an empty catalog.
    pub fn load(&self) -> Result<PortalCatalog> {
        let mut catalog = PortalCatalog::new();
        if !self.path.exists() {
            return Ok(catalog);
        }

        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read portal catalog {}", self.path.display()))?;

        let mut skipped = 0usize;
        for (index, raw) in bytes.split(|&b| b == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(err) => {
                    skipped += 1;
                    debug!(line = index + 1, %err, "Skipping malformed catalog line");
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_record(line) {
                Ok(record) => catalog.insert(record),
                Err(err) => {
                    skipped += 1;
                    debug!(line = index + 1, %err, "Skipping malformed catalog line");
                }
            }
        }

        debug!(
            path = %self.path.display(),
            portals = catalog.len(),
            skipped,
            "Loaded portal catalog"
        );
        Ok(catalog)
    }

    /// Rewrite the file with every record in `catalog`.
    pub fn save(&self, catalog: &PortalCatalog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create catalog directory")?;
            }
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create portal catalog {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        for record in catalog.iter() {
            writeln!(writer, "{}", encode_record(record))
                .context("Failed to write portal record")?;
        }
        writer.flush().context("Failed to flush portal catalog")?;
        Ok(())
    }
}
