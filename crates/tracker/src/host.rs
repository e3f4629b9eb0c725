use chrono::{DateTime, Local};
use portal_logger_core::{Aabb, BlockPos, DimensionId};

use crate::{Rgba, ShapeMode};

/// Player state the host samples once per tick or frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Block the player's feet are in.
    pub block_pos: BlockPos,
    /// Dimension the player is currently in.
    pub dimension: DimensionId,
    /// Whether the player carries a portal-travel cooldown.
    pub portal_cooldown: bool,
    /// Portal cooldown of the ridden entity, when the player is mounted.
    pub vehicle_portal_cooldown: Option<bool>,
}

impl PlayerSnapshot {
    /// Cooldown that governs portal travel: the vehicle's when riding, else the player's.
    pub fn in_portal_cooldown(&self) -> bool {
        self.vehicle_portal_cooldown.unwrap_or(self.portal_cooldown)
    }
}

/// Read-only view of the host world.
pub trait WorldView {
    /// Current player state, or `None` when no world is loaded.
    fn player(&self) -> Option<PlayerSnapshot>;

    /// Whether the block at `pos` in the player's current dimension is a portal block.
    fn is_portal_block(&self, pos: BlockPos) -> bool;

    /// Block-local outline boxes of the block at `pos` (empty when it has no shape).
    fn outline_shape(&self, pos: BlockPos) -> Vec<Aabb>;
}

/// Per-frame box drawing primitive offered by the host renderer.
pub trait BoxRenderer {
    /// Draw a world-space box with the given fill and outline colors.
    fn draw_box(&mut self, aabb: Aabb, side: Rgba, line: Rgba, mode: ShapeMode);
}

/// User-facing output channels of the host.
pub trait Notifier {
    /// Module status message.
    fn info(&mut self, message: &str);

    /// Error report (I/O failures and the like).
    fn error(&mut self, message: &str);

    /// Chat line shown with a short prefix tag.
    fn chat(&mut self, prefix: &str, message: &str);
}

/// Wall-clock source.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;

    /// Current time as Unix epoch milliseconds.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// [`Clock`] backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Format used for timestamps in chat and the portal log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `time` in [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}
