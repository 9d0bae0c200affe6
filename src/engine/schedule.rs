//! Recomputation triggers.
//!
//! Single-threaded and cooperative: nothing here sleeps or spawns. The
//! caller feeds in the current `Instant` and gets told what is due.

use std::time::{Duration, Instant};

/// Why a recomputation ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// First render of the session
    Load,
    /// Data from a fetch the periodic timer started
    Timer,
    /// Input went quiet after a burst of events
    Debounced,
    /// Explicit user action (apply button, preset)
    Manual,
    /// Any other background fetch delivered new data
    DataArrived,
}

/// Handle to a scheduled task. Only the most recent handle can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle {
    id: u64,
    due: Instant,
}

impl TaskHandle {
    pub fn due(&self) -> Instant {
        self.due
    }
}

/// Cancel-and-restart delay: each event pushes the deadline out by the quiet
/// period, replacing whatever was pending.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<TaskHandle>,
    next_id: u64,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            next_id: 0,
        }
    }

    /// Register an input event at `now`; cancels any pending task.
    pub fn schedule(&mut self, now: Instant) -> TaskHandle {
        if let Some(old) = self.pending.take() {
            log::debug!("debounce: cancelled task {}", old.id);
        }
        self.next_id += 1;
        let handle = TaskHandle {
            id: self.next_id,
            due: now + self.quiet,
        };
        self.pending = Some(handle);
        handle
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether `handle` is still the live task.
    pub fn is_current(&self, handle: TaskHandle) -> bool {
        self.pending == Some(handle)
    }

    /// Fire the pending task if its deadline has passed. Fires at most once.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(task) if now >= task.due => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|t| t.due)
    }
}

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Fixed-period timer.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    /// First tick one period after `start`. Periods under 1 ms are raised
    /// to 1 ms.
    pub fn new(period: Duration, start: Instant) -> Self {
        let period = period.max(MIN_PERIOD);
        Self {
            period,
            next: start + period,
        }
    }

    /// Fire when due. Missed ticks collapse into one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        while self.next <= now {
            self.next += self.period;
        }
        true
    }

    pub fn next_deadline(&self) -> Instant {
        self.next
    }
}
