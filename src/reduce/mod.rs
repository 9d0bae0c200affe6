//! Uncertainty reduction: raw readings folded into scalar scores.
//!
//! The clock and scroll variants produce scores that are blended into one
//! combined value; the weather variant has no reduced scalar and hands its
//! raw reading straight to layout and style.

pub mod clock;
pub mod scroll;

use serde::Serialize;

pub use clock::{time_uncertainty, ClockMood};
pub use scroll::scroll_volatility;

/// Weight of the time-of-day score in the blend
pub const CLOCK_WEIGHT: f64 = 0.7;
/// Weight of the scroll volatility score in the blend
pub const SCROLL_WEIGHT: f64 = 0.3;

/// Sub-scores plus their weighted combination.
///
/// `combined` can exceed 100 when the clock score is in its upper range;
/// that is what drives the extreme tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UncertaintyScore {
    pub time: f64,
    pub scroll: f64,
    pub combined: f64,
}

impl UncertaintyScore {
    pub fn new(time: f64, scroll: f64) -> Self {
        Self {
            time,
            scroll,
            combined: combine(time, scroll),
        }
    }
}

/// Clock-dominated blend of the two sub-scores.
pub fn combine(time: f64, scroll: f64) -> f64 {
    time * CLOCK_WEIGHT + scroll * SCROLL_WEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_night_without_scrolling() {
        assert_eq!(combine(270.0, 0.0), 189.0);
    }

    #[test]
    fn scroll_is_secondary() {
        let s = UncertaintyScore::new(30.0, 100.0);
        assert!((s.combined - 51.0).abs() < 1e-9);
        assert_eq!(s.time, 30.0);
        assert_eq!(s.scroll, 100.0);
    }
}
