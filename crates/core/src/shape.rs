//! Block outline shapes (AABB, portal slabs).

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Thickness of a nether portal sheet, in blocks.
pub const PORTAL_THICKNESS: f64 = 2.0 / 16.0;

/// Axis-aligned bounding box used for outline rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (x, y, z).
    pub min: [f64; 3],
    /// Maximum corner (x, y, z).
    pub max: [f64; 3],
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        debug_assert!(min[0] <= max[0] && min[1] <= max[1] && min[2] <= max[2]);
        Self { min, max }
    }

    /// The unit cube occupying a whole block in block-local space.
    pub fn full_block() -> Self {
        Self::new([0.0; 3], [1.0; 3])
    }

    /// Translate the box by `delta`.
    pub fn offset(self, delta: DVec3) -> Self {
        Self {
            min: [
                self.min[0] + delta.x,
                self.min[1] + delta.y,
                self.min[2] + delta.z,
            ],
            max: [
                self.max[0] + delta.x,
                self.max[1] + delta.y,
                self.max[2] + delta.z,
            ],
        }
    }

    /// Block-local outline of a portal sheet spanning the given axis.
    pub fn portal_slab(axis: PortalAxis) -> Self {
        let near = 0.5 - PORTAL_THICKNESS * 0.5;
        let far = 0.5 + PORTAL_THICKNESS * 0.5;
        match axis {
            PortalAxis::X => Self::new([0.0, 0.0, near], [1.0, 1.0, far]),
            PortalAxis::Z => Self::new([near, 0.0, 0.0], [far, 1.0, 1.0]),
        }
    }
}

/// Horizontal axis a nether portal sheet spans.
///
/// Mirrors the low bit of the portal block state: 0 spans X, 1 spans Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortalAxis {
    /// Sheet spans the X axis (thin along Z).
    X,
    /// Sheet spans the Z axis (thin along X).
    Z,
}

impl PortalAxis {
    /// Decode the axis from a portal block state.
    pub const fn from_state(state: u16) -> Self {
        if state & 0x01 == 0 {
            Self::X
        } else {
            Self::Z
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_slab_is_thin_along_the_other_axis() {
        let x = Aabb::portal_slab(PortalAxis::X);
        assert_eq!(x.min[0], 0.0);
        assert_eq!(x.max[0], 1.0);
        assert!((x.max[2] - x.min[2] - PORTAL_THICKNESS).abs() < 1e-12);

        let z = Aabb::portal_slab(PortalAxis::Z);
        assert!((z.max[0] - z.min[0] - PORTAL_THICKNESS).abs() < 1e-12);
        assert_eq!(z.min[2], 0.0);
        assert_eq!(z.max[2], 1.0);
    }

    #[test]
    fn offset_translates_both_corners() {
        let moved = Aabb::full_block().offset(DVec3::new(10.0, 64.0, -3.0));
        assert_eq!(moved.min, [10.0, 64.0, -3.0]);
        assert_eq!(moved.max, [11.0, 65.0, -2.0]);
    }

    #[test]
    fn axis_follows_state_bit() {
        assert_eq!(PortalAxis::from_state(0), PortalAxis::X);
        assert_eq!(PortalAxis::from_state(1), PortalAxis::Z);
        assert_eq!(PortalAxis::from_state(2), PortalAxis::X);
    }
}
