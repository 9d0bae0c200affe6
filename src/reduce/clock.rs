//! Time-of-day uncertainty table.

use serde::Serialize;

use crate::render::status::{Icon, StatusDisplay};
use crate::signal::clock::ClockReading;

/// Score when nothing in the table matches
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Which days a band applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Days {
    Any,
    Weekday,
    Weekend,
}

/// One row of the table. `from..until` is half-open and wraps past midnight
/// when `from > until`.
struct Band {
    from: u32,
    until: u32,
    days: Days,
    score: f64,
    icon: Icon,
    message: &'static str,
}

impl Band {
    fn matches(&self, r: &ClockReading) -> bool {
        let in_hours = if self.from <= self.until {
            r.hour >= self.from && r.hour < self.until
        } else {
            r.hour >= self.from || r.hour < self.until
        };
        let in_days = match self.days {
            Days::Any => true,
            Days::Weekday => !r.is_weekend,
            Days::Weekend => r.is_weekend,
        };
        in_hours && in_days
    }
}

/// First match wins.
const TABLE: &[Band] = &[
    Band {
        from: 2,
        until: 6,
        days: Days::Any,
        score: 270.0,
        icon: Icon::Moon,
        message: "You are here when the world is asleep",
    },
    Band {
        from: 23,
        until: 2,
        days: Days::Any,
        score: 130.0,
        icon: Icon::NightCity,
        message: "Late night exploration",
    },
    Band {
        from: 6,
        until: 9,
        days: Days::Any,
        score: 90.0,
        icon: Icon::Sunrise,
        message: "Early riser",
    },
    Band {
        from: 9,
        until: 17,
        days: Days::Weekday,
        score: 30.0,
        icon: Icon::Briefcase,
        message: "Standard browsing hours",
    },
    Band {
        from: 9,
        until: 17,
        days: Days::Weekend,
        score: 70.0,
        icon: Icon::Sun,
        message: "Weekend browsing",
    },
    Band {
        from: 17,
        until: 23,
        days: Days::Weekday,
        score: 70.0,
        icon: Icon::Dusk,
        message: "After work exploration",
    },
    Band {
        from: 17,
        until: 23,
        days: Days::Weekend,
        score: 60.0,
        icon: Icon::Dusk,
        message: "Weekend evening",
    },
];

/// Result of the time-of-day lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockMood {
    /// 0..=270
    pub score: f64,
    pub status: StatusDisplay,
}

/// Look the reading up in the time-of-day table.
pub fn time_uncertainty(reading: &ClockReading) -> ClockMood {
    lookup(TABLE, reading)
}

fn lookup(table: &[Band], reading: &ClockReading) -> ClockMood {
    match table.iter().find(|band| band.matches(reading)) {
        Some(band) => ClockMood {
            score: band.score,
            status: StatusDisplay::new(band.icon, band.message),
        },
        None => ClockMood {
            score: NEUTRAL_SCORE,
            status: StatusDisplay::new(Icon::AlarmClock, ""),
        },
    }
}
