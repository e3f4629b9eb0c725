//! Dimension identifiers.
//!
//! Portal records, log lines and catalog files are all dimension-scoped. The
//! host reports dimensions as namespaced registry keys; everything downstream
//! works with the short display name (`Overworld`, `Nether`, `End`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable identifier for a world dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DimensionId {
    /// The Overworld dimension.
    Overworld,
    /// The Nether dimension.
    Nether,
    /// The End dimension.
    End,
    /// Any dimension the host reports that is not one of the vanilla three.
    Unknown,
}

/// Error returned when a display name does not name a known dimension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dimension name: {0:?}")]
pub struct UnknownDimension(pub String);

impl DimensionId {
    /// Map a host registry key (e.g. `minecraft:the_nether`) to a dimension.
    ///
    /// Modded or otherwise unrecognised keys collapse to [`DimensionId::Unknown`].
    pub fn from_registry_key(key: &str) -> Self {
        match key {
            "minecraft:overworld" => Self::Overworld,
            "minecraft:the_nether" => Self::Nether,
            "minecraft:the_end" => Self::End,
            _ => Self::Unknown,
        }
    }

    /// Human-readable name used in messages, identifiers and catalog files.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Overworld => "Overworld",
            Self::Nether => "Nether",
            Self::End => "End",
            Self::Unknown => "Unknown",
        }
    }

    /// Inverse of [`DimensionId::display_name`].
    pub fn parse_display_name(name: &str) -> Result<Self, UnknownDimension> {
        match name {
            "Overworld" => Ok(Self::Overworld),
            "Nether" => Ok(Self::Nether),
            "End" => Ok(Self::End),
            "Unknown" => Ok(Self::Unknown),
            other => Err(UnknownDimension(other.to_string())),
        }
    }
}

impl Default for DimensionId {
    fn default() -> Self {
        Self::Overworld
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for DimensionId {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_display_name(s)
    }
}
