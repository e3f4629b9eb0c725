use std::collections::BTreeMap;

use portal_logger_core::{Aabb, BlockPos, DimensionId, PortalAxis};
use portal_logger_tracker::{PlayerSnapshot, WorldView};

/// Hand-driven world: one player plus a set of portal blocks per dimension.
#[derive(Debug, Clone, Default)]
pub struct ScriptedWorld {
    player: Option<PlayerSnapshot>,
    portals: BTreeMap<(DimensionId, BlockPos), PortalAxis>,
}

impl ScriptedWorld {
    /// World with no player loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// World with the player standing at `pos` in `dimension`.
    pub fn with_player(dimension: DimensionId, pos: BlockPos) -> Self {
        let mut world = Self::new();
        world.move_player(dimension, pos);
        world
    }

    /// Place (or replace) a portal block.
    pub fn place_portal(&mut self, dimension: DimensionId, pos: BlockPos, axis: PortalAxis) {
        self.portals.insert((dimension, pos), axis);
    }

    /// Remove a portal block.
    pub fn break_portal(&mut self, dimension: DimensionId, pos: BlockPos) {
        self.portals.remove(&(dimension, pos));
    }

    /// Teleport/walk the player. Cooldown flags are kept.
    pub fn move_player(&mut self, dimension: DimensionId, pos: BlockPos) {
        let previous = self.player.take();
        self.player = Some(PlayerSnapshot {
            block_pos: pos,
            dimension,
            portal_cooldown: previous.is_some_and(|p| p.portal_cooldown),
            vehicle_portal_cooldown: previous.and_then(|p| p.vehicle_portal_cooldown),
        });
    }

    /// Set the player's own portal cooldown flag.
    pub fn set_cooldown(&mut self, cooldown: bool) {
        if let Some(player) = self.player.as_mut() {
            player.portal_cooldown = cooldown;
        }
    }

    /// Mount (`Some`) or dismount (`None`) the player, with the vehicle's cooldown.
    pub fn set_vehicle_cooldown(&mut self, cooldown: Option<bool>) {
        if let Some(player) = self.player.as_mut() {
            player.vehicle_portal_cooldown = cooldown;
        }
    }

    /// Unload the world (no player).
    pub fn unload(&mut self) {
        self.player = None;
    }

    fn current_dimension(&self) -> Option<DimensionId> {
        self.player.map(|p| p.dimension)
    }
}

impl WorldView for ScriptedWorld {
    fn player(&self) -> Option<PlayerSnapshot> {
        self.player
    }

    fn is_portal_block(&self, pos: BlockPos) -> bool {
        self.current_dimension()
            .is_some_and(|dim| self.portals.contains_key(&(dim, pos)))
    }

    fn outline_shape(&self, pos: BlockPos) -> Vec<Aabb> {
        self.current_dimension()
            .and_then(|dim| self.portals.get(&(dim, pos)))
            .map(|&axis| vec![Aabb::portal_slab(axis)])
            .unwrap_or_default()
    }
}
