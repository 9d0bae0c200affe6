pub mod layout;
pub mod status;
pub mod style;

/// Which page is being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Time of day blended with scroll volatility
    Uncertainty,
    /// Slider-driven weather
    SimulatedWeather,
    /// Fetched weather
    LiveWeather,
}

impl Default for Variant {
    fn default() -> Self {
        Self::Uncertainty
    }
}
