use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Local, TimeZone};
use portal_logger_tracker::Clock;

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct FixedClock {
    millis: Rc<Cell<i64>>,
}

impl FixedClock {
    /// Clock frozen at `millis` since the Unix epoch.
    pub fn at_millis(millis: i64) -> Self {
        Self {
            millis: Rc::new(Cell::new(millis)),
        }
    }

    /// Move time forward.
    pub fn advance_millis(&self, delta: i64) {
        self.millis.set(self.millis.get() + delta);
    }

    /// Current epoch milliseconds.
    pub fn millis(&self) -> i64 {
        self.millis.get()
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        // 2023-11-14T22:13:20Z
        Self::at_millis(1_700_000_000_000)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        Local
            .timestamp_millis_opt(self.millis.get())
            .single()
            .unwrap_or_else(Local::now)
    }

    fn now_millis(&self) -> i64 {
        self.millis.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_time() {
        let clock = FixedClock::at_millis(1_000);
        let handle = clock.clone();
        handle.advance_millis(500);
        assert_eq!(clock.now_millis(), 1_500);
        assert_eq!(clock.now().timestamp_millis(), 1_500);
    }
}
