use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use super::SignalSource;

/// Wall-clock reading used by the time-of-day reducer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    /// 0..=23, local time
    pub hour: u32,
    pub is_weekend: bool,
}

impl ClockReading {
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            hour: at.hour(),
            is_weekend: matches!(at.weekday(), Weekday::Sat | Weekday::Sun),
        }
    }
}

/// Source of "now". Injected so the pipeline can be driven at a fixed time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Clock-derived signal source. Holds no state besides the clock itself.
#[derive(Debug, Clone, Default)]
pub struct ClockSource<C: Clock = SystemClock> {
    clock: C,
}

impl<C: Clock> ClockSource<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> SignalSource for ClockSource<C> {
    type Reading = ClockReading;

    fn current_reading(&mut self) -> ClockReading {
        ClockReading::from_datetime(self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 30, 0))
            .unwrap()
    }

    #[test]
    fn weekday_reading() {
        // 2024-06-12 is a Wednesday
        let mut src = ClockSource::new(FixedClock(at(2024, 6, 12, 10)));
        let r = src.current_reading();
        assert_eq!(r.hour, 10);
        assert!(!r.is_weekend);
    }

    #[test]
    fn saturday_and_sunday_are_weekend() {
        let sat = ClockReading::from_datetime(at(2024, 6, 15, 10));
        let sun = ClockReading::from_datetime(at(2024, 6, 16, 23));
        assert!(sat.is_weekend);
        assert!(sun.is_weekend);
        assert_eq!(sun.hour, 23);
    }
}
