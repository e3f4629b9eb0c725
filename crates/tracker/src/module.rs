//! Host-side module table.
//!
//! Modules declare which event channels they listen on. Subscriptions are
//! added when a module is activated and removed when it is deactivated, so an
//! inactive module never sees tick or render callbacks.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::{BoxRenderer, Notifier, WorldView};

/// Event channels a module can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventChannel {
    /// Once per game tick, after the world update.
    Tick,
    /// Once per rendered frame.
    Render,
}

/// A toggleable feature driven by host callbacks.
pub trait Module {
    /// Stable module name (kebab-case).
    fn name(&self) -> &str;

    /// Short human-readable description.
    fn description(&self) -> &str {
        ""
    }

    /// Channels the module listens on while active.
    fn channels(&self) -> &'static [EventChannel];

    /// Called when the module is switched on.
    fn on_activate(&mut self, notifier: &mut dyn Notifier);

    /// Called when the module is switched off.
    fn on_deactivate(&mut self, notifier: &mut dyn Notifier);

    /// [`EventChannel::Tick`] handler.
    fn on_tick(&mut self, _world: &dyn WorldView, _notifier: &mut dyn Notifier) {}

    /// [`EventChannel::Render`] handler. Rendering never mutates module state.
    fn on_render(&self, _world: &dyn WorldView, _renderer: &mut dyn BoxRenderer) {}
}

/// Index of a registered module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleHandle(usize);

struct Slot {
    module: Box<dyn Module>,
    active: bool,
}

/// Registered modules plus the per-channel subscription table.
#[derive(Default)]
pub struct ModuleRegistry {
    slots: Vec<Slot>,
    subscriptions: BTreeMap<EventChannel, Vec<ModuleHandle>>,
}

impl ModuleRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an (inactive) module.
    pub fn register(&mut self, module: Box<dyn Module>) -> ModuleHandle {
        let handle = ModuleHandle(self.slots.len());
        debug!(module = module.name(), "Registered module");
        self.slots.push(Slot {
            module,
            active: false,
        });
        handle
    }

    /// Find a module by name.
    pub fn find(&self, name: &str) -> Option<ModuleHandle> {
        self.slots
            .iter()
            .position(|slot| slot.module.name() == name)
            .map(ModuleHandle)
    }

    /// Borrow a registered module.
    pub fn get(&self, handle: ModuleHandle) -> Option<&dyn Module> {
        self.slots.get(handle.0).map(|slot| slot.module.as_ref())
    }

    /// Whether the module is currently active.
    pub fn is_active(&self, handle: ModuleHandle) -> bool {
        self.slots.get(handle.0).is_some_and(|slot| slot.active)
    }

    /// Switch a module on. Returns `false` if it was already active.
    pub fn activate(&mut self, handle: ModuleHandle, notifier: &mut dyn Notifier) -> bool {
        let Some(slot) = self.slots.get_mut(handle.0) else {
            return false;
        };
        if slot.active {
            return false;
        }
        slot.active = true;
        slot.module.on_activate(notifier);
        for &channel in slot.module.channels() {
            let handles = self.subscriptions.entry(channel).or_default();
            if !handles.contains(&handle) {
                handles.push(handle);
            }
        }
        info!(module = slot.module.name(), "Module activated");
        true
    }

    /// Switch a module off. Returns `false` if it was not active.
    pub fn deactivate(&mut self, handle: ModuleHandle, notifier: &mut dyn Notifier) -> bool {
        let Some(slot) = self.slots.get_mut(handle.0) else {
            return false;
        };
        if !slot.active {
            return false;
        }
        for handles in self.subscriptions.values_mut() {
            handles.retain(|&h| h != handle);
        }
        slot.active = false;
        slot.module.on_deactivate(notifier);
        info!(module = slot.module.name(), "Module deactivated");
        true
    }

    /// Flip a module's state. Returns the new state.
    pub fn toggle(&mut self, handle: ModuleHandle, notifier: &mut dyn Notifier) -> bool {
        if self.is_active(handle) {
            self.deactivate(handle, notifier);
            false
        } else {
            self.activate(handle, notifier)
        }
    }

    /// Switch every active module off (host shutdown).
    pub fn deactivate_all(&mut self, notifier: &mut dyn Notifier) {
        for index in 0..self.slots.len() {
            self.deactivate(ModuleHandle(index), notifier);
        }
    }

    /// Modules subscribed to `channel`, in activation order.
    pub fn subscribers(&self, channel: EventChannel) -> &[ModuleHandle] {
        self.subscriptions
            .get(&channel)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Deliver a tick to every subscribed module.
    pub fn dispatch_tick(&mut self, world: &dyn WorldView, notifier: &mut dyn Notifier) {
        let Some(handles) = self.subscriptions.get(&EventChannel::Tick) else {
            return;
        };
        for handle in handles {
            if let Some(slot) = self.slots.get_mut(handle.0) {
                slot.module.on_tick(world, notifier);
            }
        }
    }

    /// Deliver a frame to every subscribed module.
    pub fn dispatch_render(&self, world: &dyn WorldView, renderer: &mut dyn BoxRenderer) {
        for handle in self.subscribers(EventChannel::Render) {
            if let Some(slot) = self.slots.get(handle.0) {
                slot.module.on_render(world, renderer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlayerSnapshot, Rgba, ShapeMode};
    use portal_logger_core::{Aabb, BlockPos};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counter {
        ticks: Rc<Cell<u32>>,
        renders: Rc<Cell<u32>>,
    }

    impl Module for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn channels(&self) -> &'static [EventChannel] {
            &[EventChannel::Tick, EventChannel::Render]
        }

        fn on_activate(&mut self, notifier: &mut dyn Notifier) {
            notifier.info("on");
        }

        fn on_deactivate(&mut self, notifier: &mut dyn Notifier) {
            notifier.info("off");
        }

        fn on_tick(&mut self, _world: &dyn WorldView, _notifier: &mut dyn Notifier) {
            self.ticks.set(self.ticks.get() + 1);
        }

        fn on_render(&self, _world: &dyn WorldView, _renderer: &mut dyn BoxRenderer) {
            self.renders.set(self.renders.get() + 1);
        }
    }

    struct Empty;

    impl WorldView for Empty {
        fn player(&self) -> Option<PlayerSnapshot> {
            None
        }

        fn is_portal_block(&self, _pos: BlockPos) -> bool {
            false
        }

        fn outline_shape(&self, _pos: BlockPos) -> Vec<Aabb> {
            Vec::new()
        }
    }

    #[derive(Default)]
    struct Sink(Vec<String>);

    impl Notifier for Sink {
        fn info(&mut self, message: &str) {
            self.0.push(message.to_string());
        }

        fn error(&mut self, message: &str) {
            self.0.push(message.to_string());
        }

        fn chat(&mut self, _prefix: &str, message: &str) {
            self.0.push(message.to_string());
        }
    }

    impl BoxRenderer for Sink {
        fn draw_box(&mut self, _aabb: Aabb, _side: Rgba, _line: Rgba, _mode: ShapeMode) {}
    }

    #[test]
    fn inactive_modules_receive_no_events() {
        let ticks = Rc::new(Cell::new(0));
        let renders = Rc::new(Cell::new(0));
        let mut registry = ModuleRegistry::new();
        let handle = registry.register(Box::new(Counter {
            ticks: ticks.clone(),
            renders: renders.clone(),
        }));
        let mut sink = Sink::default();

        registry.dispatch_tick(&Empty, &mut sink);
        assert_eq!(ticks.get(), 0);

        assert!(registry.activate(handle, &mut sink));
        assert!(!registry.activate(handle, &mut sink));
        registry.dispatch_tick(&Empty, &mut sink);
        registry.dispatch_render(&Empty, &mut Sink::default());
        assert_eq!(ticks.get(), 1);
        assert_eq!(renders.get(), 1);
        assert_eq!(registry.subscribers(EventChannel::Tick), &[handle]);

        assert!(!registry.toggle(handle, &mut sink));
        registry.dispatch_tick(&Empty, &mut sink);
        assert_eq!(ticks.get(), 1);
        assert!(registry.subscribers(EventChannel::Render).is_empty());
        assert_eq!(sink.0, vec!["on".to_string(), "off".to_string()]);
    }

    #[test]
    fn modules_are_found_by_name() {
        let mut registry = ModuleRegistry::new();
        let handle = registry.register(Box::new(Counter {
            ticks: Rc::default(),
            renders: Rc::default(),
        }));
        assert_eq!(registry.find("counter"), Some(handle));
        assert_eq!(registry.find("missing"), None);
        assert_eq!(registry.get(handle).map(|m| m.name()), Some("counter"));
        assert!(!registry.is_active(handle));
    }
}
