//! Signal sources.
//!
//! Each source produces one small reading per recomputation pass:
//! - `clock`: hour of day + weekend flag
//! - `scroll`: rolling window of scroll speed/direction samples
//! - `weather`: wind, temperature, cloud cover and rain (simulated or live)

pub mod clock;
pub mod scroll;
pub mod weather;

/// Anything that can hand the pipeline its current reading.
pub trait SignalSource {
    type Reading;

    fn current_reading(&mut self) -> Self::Reading;
}
