//! Integer block coordinates.

use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Aabb;

/// Position of a block in world space.
///
/// Ordering is lexical by `(x, y, z)` so maps keyed by position iterate
/// deterministically.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Create a new block position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Block containing the given world-space point.
    pub fn containing(point: DVec3) -> Self {
        Self::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }

    /// Block corner as a float vector.
    pub fn as_dvec3(self) -> DVec3 {
        IVec3::from(self).as_dvec3()
    }

    /// Euclidean distance between two block positions.
    pub fn distance(self, other: Self) -> f64 {
        self.as_dvec3().distance(other.as_dvec3())
    }

    /// Translate a block-local box into world space at this position.
    pub fn offset_box(self, local: Aabb) -> Aabb {
        local.offset(self.as_dvec3())
    }
}

impl From<BlockPos> for IVec3 {
    fn from(pos: BlockPos) -> Self {
        IVec3::new(pos.x, pos.y, pos.z)
    }
}

impl From<IVec3> for BlockPos {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = BlockPos::new(0, 64, 0);
        let b = BlockPos::new(3, 68, 0);
        assert!((a.distance(b) - 5.0).abs() < 1e-9);
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn containing_floors_negative_coordinates() {
        let pos = BlockPos::containing(DVec3::new(-0.5, 64.9, 10.0));
        assert_eq!(pos, BlockPos::new(-1, 64, 10));
    }

    #[test]
    fn display_matches_message_format() {
        assert_eq!(BlockPos::new(100, 64, 200).to_string(), "(100, 64, 200)");
    }
}
