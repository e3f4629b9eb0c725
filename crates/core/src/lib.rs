#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod dimension;
pub mod pos;
pub mod shape;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use dimension::{DimensionId, UnknownDimension};
pub use pos::BlockPos;
pub use shape::{Aabb, PortalAxis};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any replay timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}
