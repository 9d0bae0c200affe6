//! Scroll behaviour tracking.
//!
//! Raw scroll events (position + timestamp) are turned into speed/direction
//! samples kept in a rolling window of the last `WINDOW` events.

use std::collections::VecDeque;

use serde::Serialize;

use super::SignalSource;

/// Maximum number of samples kept; the oldest is evicted first.
pub const WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// One processed scroll event
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollSample {
    /// Pixels per millisecond
    pub speed: f64,
    pub direction: ScrollDirection,
    /// Event time in milliseconds
    pub time_ms: u64,
}

/// Rolling window of scroll samples.
///
/// Positions are in pixels, times in milliseconds on any monotonic origin.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    samples: VecDeque<ScrollSample>,
    last_position: f64,
    last_time_ms: u64,
}

impl ScrollTracker {
    /// Start tracking at scroll position 0 at time `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW + 1),
            last_position: 0.0,
            last_time_ms: start_ms,
        }
    }

    /// Process a scroll event and return the sample it produced.
    pub fn record(&mut self, position: f64, time_ms: u64) -> ScrollSample {
        // Zero elapsed time would give an infinite speed
        let dt = time_ms.saturating_sub(self.last_time_ms).max(1) as f64;
        let delta = position - self.last_position;
        let direction = if delta > 0.0 {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };

        let sample = ScrollSample {
            speed: delta.abs() / dt,
            direction,
            time_ms,
        };
        self.samples.push_back(sample);
        while self.samples.len() > WINDOW {
            self.samples.pop_front();
        }

        self.last_position = position;
        self.last_time_ms = time_ms;
        sample
    }

    pub fn samples(&self) -> impl ExactSizeIterator<Item = &ScrollSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SignalSource for ScrollTracker {
    type Reading = Vec<ScrollSample>;

    fn current_reading(&mut self) -> Vec<ScrollSample> {
        self.samples.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_and_direction() {
        let mut t = ScrollTracker::new(0);
        let s = t.record(200.0, 100);
        assert!((s.speed - 2.0).abs() < 1e-12);
        assert_eq!(s.direction, ScrollDirection::Down);

        let s = t.record(150.0, 150);
        assert!((s.speed - 1.0).abs() < 1e-12);
        assert_eq!(s.direction, ScrollDirection::Up);
    }

    #[test]
    fn no_movement_counts_as_up() {
        let mut t = ScrollTracker::new(0);
        t.record(0.0, 10);
        assert_eq!(t.samples().next().map(|s| s.direction), Some(ScrollDirection::Up));
    }

    #[test]
    fn zero_elapsed_time_stays_finite() {
        let mut t = ScrollTracker::new(50);
        let s = t.record(30.0, 50);
        assert!(s.speed.is_finite());
        assert!((s.speed - 30.0).abs() < 1e-12);
    }

    #[test]
    fn window_evicts_oldest() {
        let mut t = ScrollTracker::new(0);
        for i in 1..=15u64 {
            t.record(i as f64 * 10.0, i * 10);
        }
        assert_eq!(t.len(), WINDOW);
        let reading = t.current_reading();
        assert_eq!(reading.first().map(|s| s.time_ms), Some(60));
        assert_eq!(reading.last().map(|s| s.time_ms), Some(150));
    }
}
