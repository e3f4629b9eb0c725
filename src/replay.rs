use anyhow::{Context, Result};
use glam::DVec3;
use portal_logger_core::{Aabb, BlockPos, DimensionId, PortalAxis, SimTick};
use portal_logger_tracker::{PlayerSnapshot, WorldView};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, VecDeque},
    fs,
    path::Path,
};

#[derive(Debug, Deserialize)]
struct ReplayFile {
    steps: Vec<ReplayStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct PortalBlockDef {
    dimension: String,
    pos: [i32; 3],
    #[serde(default)]
    state: u16,
}

#[derive(Debug, Clone, Deserialize)]
struct ReplayStepDef {
    tick: u64,
    dimension: String,
    /// World-space feet position.
    pos: [f64; 3],
    #[serde(default)]
    portal_cooldown: bool,
    #[serde(default)]
    riding_cooldown: Option<bool>,
    #[serde(default)]
    unloaded: bool,
    #[serde(default)]
    portal_blocks: Vec<PortalBlockDef>,
    #[serde(default)]
    broken_blocks: Vec<PortalBlockDef>,
}

/// One scheduled world change.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    /// Tick the change applies on.
    pub tick: SimTick,
    /// Player state from this tick on; `None` while the world is unloaded.
    pub player: Option<PlayerSnapshot>,
    /// Portal blocks placed (with their block state).
    pub placed: Vec<(DimensionId, BlockPos, u16)>,
    /// Portal blocks removed.
    pub broken: Vec<(DimensionId, BlockPos)>,
}

/// Accept display names (`Nether`) as well as registry keys (`minecraft:the_nether`).
fn parse_dimension(name: &str) -> DimensionId {
    DimensionId::parse_display_name(name)
        .unwrap_or_else(|_| DimensionId::from_registry_key(name))
}

fn block_pos([x, y, z]: [i32; 3]) -> BlockPos {
    BlockPos::new(x, y, z)
}

/// Deterministic replay script runner.
///
/// Scripts are a list of per-tick player states, applied in file order.
#[derive(Debug)]
pub struct ReplayScript {
    pending: VecDeque<ReplayStep>,
    last_tick: SimTick,
}

impl ReplayScript {
    /// Load a replay script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Load a replay script from an in-memory JSON string.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ReplayFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("replay script contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for step in file.steps {
            if let Some(prev) = last_tick {
                if step.tick < prev {
                    anyhow::bail!("replay script steps must be sorted by tick");
                }
            }
            last_tick = Some(step.tick);

            let player = (!step.unloaded).then(|| PlayerSnapshot {
                block_pos: BlockPos::containing(DVec3::from_array(step.pos)),
                dimension: parse_dimension(&step.dimension),
                portal_cooldown: step.portal_cooldown,
                vehicle_portal_cooldown: step.riding_cooldown,
            });
            pending.push_back(ReplayStep {
                tick: SimTick(step.tick),
                player,
                placed: step
                    .portal_blocks
                    .iter()
                    .map(|block| {
                        (
                            parse_dimension(&block.dimension),
                            block_pos(block.pos),
                            block.state,
                        )
                    })
                    .collect(),
                broken: step
                    .broken_blocks
                    .iter()
                    .map(|block| (parse_dimension(&block.dimension), block_pos(block.pos)))
                    .collect(),
            });
        }

        Ok(Self {
            pending,
            last_tick: SimTick(last_tick.unwrap_or_default()),
        })
    }

    /// Tick of the final step.
    pub fn last_tick(&self) -> SimTick {
        self.last_tick
    }

    /// Drain and return all steps scheduled for ticks `<= tick`.
    pub fn drain_ready_steps(&mut self, tick: SimTick) -> Vec<ReplayStep> {
        let mut steps = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick) {
            if let Some(step) = self.pending.pop_front() {
                steps.push(step);
            }
        }
        steps
    }

    /// Whether every step has been drained.
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

/// World state rebuilt from replay steps.
#[derive(Debug, Default)]
pub struct ReplayWorld {
    player: Option<PlayerSnapshot>,
    portal_states: BTreeMap<(DimensionId, BlockPos), u16>,
}

impl ReplayWorld {
    /// Apply one scheduled change.
    pub fn apply(&mut self, step: ReplayStep) {
        for (dimension, pos, state) in step.placed {
            self.portal_states.insert((dimension, pos), state);
        }
        for (dimension, pos) in step.broken {
            self.portal_states.remove(&(dimension, pos));
        }
        self.player = step.player;
    }

    fn state_at(&self, pos: BlockPos) -> Option<u16> {
        let dimension = self.player?.dimension;
        self.portal_states.get(&(dimension, pos)).copied()
    }
}

impl WorldView for ReplayWorld {
    fn player(&self) -> Option<PlayerSnapshot> {
        self.player
    }

    fn is_portal_block(&self, pos: BlockPos) -> bool {
        self.state_at(pos).is_some()
    }

    fn outline_shape(&self, pos: BlockPos) -> Vec<Aabb> {
        self.state_at(pos)
            .map(|state| vec![Aabb::portal_slab(PortalAxis::from_state(state))])
            .unwrap_or_default()
    }
}
