//! Stdout host adapters for headless replays.

use portal_logger_core::{Aabb, SimTick};
use portal_logger_tracker::{BoxRenderer, Notifier, Rgba, ShapeMode};

/// Prints chat and status lines.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    errors: usize,
}

impl ConsoleNotifier {
    /// Number of errors reported so far.
    pub fn error_count(&self) -> usize {
        self.errors
    }
}

impl Notifier for ConsoleNotifier {
    fn info(&mut self, message: &str) {
        println!("{message}");
    }

    fn error(&mut self, message: &str) {
        self.errors += 1;
        eprintln!("error: {message}");
    }

    fn chat(&mut self, prefix: &str, message: &str) {
        println!("[{prefix}] {message}");
    }
}

/// Prints one line per outline box, tagged with the frame's tick.
#[derive(Debug)]
pub struct ConsoleRenderer {
    tick: SimTick,
    boxes: usize,
}

impl Default for ConsoleRenderer {
    fn default() -> Self {
        Self {
            tick: SimTick::ZERO,
            boxes: 0,
        }
    }
}

impl ConsoleRenderer {
    /// Start a new frame.
    pub fn begin_frame(&mut self, tick: SimTick) {
        self.tick = tick;
    }

    /// Boxes drawn across all frames.
    pub fn box_count(&self) -> usize {
        self.boxes
    }
}

fn rgba(color: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}{:02x}", color.r, color.g, color.b, color.a)
}

impl BoxRenderer for ConsoleRenderer {
    fn draw_box(&mut self, aabb: Aabb, side: Rgba, line: Rgba, mode: ShapeMode) {
        self.boxes += 1;
        let mut paint = String::new();
        if mode.draws_sides() {
            paint.push_str(&format!(" side {}", rgba(side)));
        }
        if mode.draws_lines() {
            paint.push_str(&format!(" line {}", rgba(line)));
        }
        println!(
            "tick {}: outline {:?}..{:?}{paint}",
            self.tick.0, aabb.min, aabb.max
        );
    }
}
