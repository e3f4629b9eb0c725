use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    emit_draws, entry_message, plan_draws, teleport_message, BoxRenderer, CatalogStore, Clock,
    EventChannel, Module, Notifier, PortalCatalog, PortalId, PortalJournal, PortalSettings,
    SystemClock, WorldView,
};

/// Default catalog file name.
pub const DEFAULT_CATALOG_FILE: &str = "portal_database.txt";
/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "portal_log.txt";
/// Prefix tag on chat lines.
pub const CHAT_PREFIX: &str = "Portal";
/// Module name used for lookup in a [`crate::ModuleRegistry`].
pub const MODULE_NAME: &str = "portal-logger";

/// Where the tracker keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerPaths {
    /// Catalog file.
    pub catalog: PathBuf,
    /// Human-readable log file.
    pub log: PathBuf,
}

impl TrackerPaths {
    /// Default file names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            catalog: dir.join(DEFAULT_CATALOG_FILE),
            log: dir.join(DEFAULT_LOG_FILE),
        }
    }
}

impl Default for TrackerPaths {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG_FILE),
            log: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// Transient per-activation state. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Whether the player was inside a portal on the previous tick.
    pub inside_portal: bool,
    /// Portal entered and not yet exited.
    pub in_transit: Option<PortalId>,
}

/// What a tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No transition (or no player).
    Idle,
    /// The player walked into a portal.
    Entered {
        /// Portal entered.
        portal: PortalId,
        /// Whether this portal was already logged this session.
        repeat: bool,
    },
    /// The player left the portal volume.
    Exited {
        /// Portal that was entered.
        from: PortalId,
        /// Arrival point, when the dimension changed.
        to: Option<PortalId>,
    },
}

/// Tracks portal use, persists the catalog and outlines known portals.
pub struct PortalTracker<C: Clock = SystemClock> {
    settings: PortalSettings,
    catalog: PortalCatalog,
    store: CatalogStore,
    journal: PortalJournal,
    logged: HashSet<PortalId>,
    session: SessionState,
    clock: C,
}

impl PortalTracker<SystemClock> {
    /// Tracker using the system clock.
    pub fn new(settings: PortalSettings, paths: TrackerPaths) -> Self {
        Self::with_clock(settings, paths, SystemClock)
    }
}

impl<C: Clock> PortalTracker<C> {
    /// Tracker with an explicit clock.
    pub fn with_clock(settings: PortalSettings, paths: TrackerPaths, clock: C) -> Self {
        Self {
            settings,
            catalog: PortalCatalog::new(),
            store: CatalogStore::new(paths.catalog),
            journal: PortalJournal::new(paths.log),
            logged: HashSet::new(),
            session: SessionState::default(),
            clock,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &PortalSettings {
        &self.settings
    }

    /// Mutable settings; changes apply from the next callback.
    pub fn settings_mut(&mut self) -> &mut PortalSettings {
        &mut self.settings
    }

    /// Known portals.
    pub fn catalog(&self) -> &PortalCatalog {
        &self.catalog
    }

    /// Transit state.
    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Reset transit state, load the catalog and prepare the log file.
    pub fn activate(&mut self, notifier: &mut dyn Notifier) {
        self.session = SessionState::default();
        self.load_catalog(notifier);

        notifier.info("Portal Logger activated! Portals you've been through will appear black.");

        if self.settings.general.log_to_file {
            if let Err(err) = self.journal.ensure_header(&self.clock.now()) {
                warn!("Could not create portal log: {err:#}");
                notifier.error(&format!("Could not create log file: {err:#}"));
            }
        }
    }

    /// Save the catalog.
    pub fn deactivate(&mut self, notifier: &mut dyn Notifier) {
        self.save_catalog(notifier);
        notifier.info("Portal Logger deactivated!");
    }

    /// Advance the portal state machine by one tick.
    pub fn tick(&mut self, world: &dyn WorldView, notifier: &mut dyn Notifier) -> TickOutcome {
        let Some(player) = world.player() else {
            return TickOutcome::Idle;
        };

        let in_portal = player.in_portal_cooldown() || world.is_portal_block(player.block_pos);
        let here = PortalId::new(player.dimension, player.block_pos);

        let outcome = match (self.session.inside_portal, in_portal, self.session.in_transit) {
            (false, true, _) => self.handle_entry(here, notifier),
            (true, false, Some(from)) => self.handle_exit(from, here, notifier),
            _ => TickOutcome::Idle,
        };

        self.session.inside_portal = in_portal;
        outcome
    }

    /// Draw outlines for known portals near the player.
    pub fn render(&self, world: &dyn WorldView, renderer: &mut dyn BoxRenderer) {
        let Some(player) = world.player() else {
            return;
        };
        let draws = plan_draws(
            &self.catalog,
            world,
            player.block_pos,
            player.dimension,
            &self.settings.render,
        );
        emit_draws(&draws, renderer);
    }

    fn handle_entry(&mut self, portal: PortalId, notifier: &mut dyn Notifier) -> TickOutcome {
        let now = self.clock.now_millis();
        self.catalog.get_or_create(portal, now).record_use(now);
        self.session.in_transit = Some(portal);

        let repeat = !self.logged.insert(portal);
        let message = entry_message(portal, repeat, &self.settings.general);
        debug!(%portal, repeat, "Portal entered");
        self.publish(&message, notifier);

        self.save_catalog(notifier);
        TickOutcome::Entered { portal, repeat }
    }

    fn handle_exit(
        &mut self,
        from: PortalId,
        here: PortalId,
        notifier: &mut dyn Notifier,
    ) -> TickOutcome {
        self.session.in_transit = None;
        if from.dimension == here.dimension {
            debug!(%from, "Left portal without changing dimension");
            return TickOutcome::Exited { from, to: None };
        }

        let message = teleport_message(from, here);
        info!(%from, to = %here, "Teleported");
        self.publish(&message, notifier);
        self.catalog.link(from, here, self.clock.now_millis());
        TickOutcome::Exited {
            from,
            to: Some(here),
        }
    }

    /// Send a message to every enabled sink. Repeats are not suppressed.
    fn publish(&self, message: &str, notifier: &mut dyn Notifier) {
        if self.settings.general.chat_messages {
            notifier.chat(CHAT_PREFIX, message);
        }
        if self.settings.general.log_to_file {
            if let Err(err) = self.journal.append(&self.clock.now(), message) {
                warn!("Portal log write failed: {err:#}");
                notifier.error(&format!("Failed to write to log file: {err:#}"));
            }
        }
    }

    fn load_catalog(&mut self, notifier: &mut dyn Notifier) {
        match self.store.load() {
            Ok(catalog) => {
                info!(portals = catalog.len(), "Portal catalog loaded");
                self.catalog = catalog;
            }
            Err(err) => {
                warn!("Portal catalog load failed: {err:#}");
                notifier.error(&format!("Failed to load portal database: {err:#}"));
                self.catalog.clear();
            }
        }
    }

    fn save_catalog(&self, notifier: &mut dyn Notifier) {
        if let Err(err) = self.store.save(&self.catalog) {
            warn!("Portal catalog save failed: {err:#}");
            notifier.error(&format!("Failed to save portal database: {err:#}"));
        }
    }
}

impl<C: Clock + 'static> Module for PortalTracker<C> {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn description(&self) -> &str {
        "Logs portals you've been through and highlights them with ESP."
    }

    fn channels(&self) -> &'static [EventChannel] {
        &[EventChannel::Tick, EventChannel::Render]
    }

    fn on_activate(&mut self, notifier: &mut dyn Notifier) {
        self.activate(notifier);
    }

    fn on_deactivate(&mut self, notifier: &mut dyn Notifier) {
        self.deactivate(notifier);
    }

    fn on_tick(&mut self, world: &dyn WorldView, notifier: &mut dyn Notifier) {
        self.tick(world, notifier);
    }

    fn on_render(&self, world: &dyn WorldView, renderer: &mut dyn BoxRenderer) {
        self.render(world, renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerSnapshot;
    use chrono::{DateTime, Local, TimeZone};
    use portal_logger_core::{Aabb, BlockPos, DimensionId};
    use std::cell::Cell;
    use tempfile::{tempdir, TempDir};

    struct StepClock(Cell<i64>);

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Local> {
            let millis = self.0.get();
            self.0.set(millis + 1_000);
            Local
                .timestamp_millis_opt(millis)
                .single()
                .expect("valid timestamp")
        }
    }

    struct OnePlayer(Option<PlayerSnapshot>);

    impl WorldView for OnePlayer {
        fn player(&self) -> Option<PlayerSnapshot> {
            self.0
        }

        fn is_portal_block(&self, _pos: BlockPos) -> bool {
            false
        }

        fn outline_shape(&self, _pos: BlockPos) -> Vec<Aabb> {
            Vec::new()
        }
    }

    #[derive(Default)]
    struct Lines(Vec<String>);

    impl Notifier for Lines {
        fn info(&mut self, _message: &str) {}

        fn error(&mut self, message: &str) {
            self.0.push(format!("error: {message}"));
        }

        fn chat(&mut self, _prefix: &str, message: &str) {
            self.0.push(message.to_string());
        }
    }

    fn tracker() -> (PortalTracker<StepClock>, TempDir) {
        let dir = tempdir().expect("temp dir");
        let tracker = PortalTracker::with_clock(
            PortalSettings::default(),
            TrackerPaths::in_dir(dir.path()),
            StepClock(Cell::new(1_700_000_000_000)),
        );
        (tracker, dir)
    }

    fn at(dimension: DimensionId, x: i32, y: i32, z: i32, cooldown: bool) -> OnePlayer {
        OnePlayer(Some(PlayerSnapshot {
            block_pos: BlockPos::new(x, y, z),
            dimension,
            portal_cooldown: cooldown,
            vehicle_portal_cooldown: None,
        }))
    }

    #[test]
    fn no_player_is_idle() {
        let (mut tracker, _dir) = tracker();
        let mut lines = Lines::default();
        assert_eq!(tracker.tick(&OnePlayer(None), &mut lines), TickOutcome::Idle);
        assert!(tracker.catalog().is_empty());
    }

    #[test]
    fn staying_inside_does_not_recount() {
        let (mut tracker, _dir) = tracker();
        let mut lines = Lines::default();
        tracker.activate(&mut lines);

        let inside = at(DimensionId::Overworld, 1, 64, 1, true);
        assert!(matches!(
            tracker.tick(&inside, &mut lines),
            TickOutcome::Entered { repeat: false, .. }
        ));
        for _ in 0..5 {
            assert_eq!(tracker.tick(&inside, &mut lines), TickOutcome::Idle);
        }

        let id = PortalId::new(DimensionId::Overworld, BlockPos::new(1, 64, 1));
        assert_eq!(tracker.catalog().get(&id).unwrap().use_count, 1);
        assert_eq!(tracker.session().in_transit, Some(id));
    }

    #[test]
    fn same_dimension_exit_does_not_link() {
        let (mut tracker, _dir) = tracker();
        let mut lines = Lines::default();
        tracker.activate(&mut lines);

        tracker.tick(&at(DimensionId::Nether, 0, 70, 0, true), &mut lines);
        let outcome = tracker.tick(&at(DimensionId::Nether, 3, 70, 0, false), &mut lines);

        assert!(matches!(outcome, TickOutcome::Exited { to: None, .. }));
        assert_eq!(tracker.catalog().len(), 1);
        assert!(tracker.catalog().iter().all(|r| r.linked.is_empty()));
        assert_eq!(tracker.session(), SessionState::default());
    }
}
