//! Runtime settings.
//!
//! Every knob has a documented default; the CLI overrides them from flags or
//! environment variables.

use std::time::Duration;

/// Open-Meteo forecast endpoint
pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Container size used when the page does not declare one (px)
pub const DEFAULT_CONTAINER: (f64, f64) = (1200.0, 800.0);

#[derive(Debug, Clone)]
pub struct Settings {
    /// Fallback container width in pixels
    pub container_width: f64,
    /// Fallback container height in pixels
    pub container_height: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub forecast_url: String,
    /// Live weather refresh period
    pub refresh_interval: Duration,
    /// Quiet period before scroll volatility is recomputed
    pub scroll_debounce: Duration,
    pub fetch_timeout: Duration,
    /// How long the first render waits for the initial fetch
    pub fetch_grace: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            container_width: DEFAULT_CONTAINER.0,
            container_height: DEFAULT_CONTAINER.1,
            // Eindhoven
            latitude: 51.4408,
            longitude: 5.4778,
            forecast_url: OPEN_METEO_URL.to_string(),
            refresh_interval: Duration::from_secs(10 * 60),
            scroll_debounce: Duration::from_millis(150),
            fetch_timeout: Duration::from_secs(10),
            fetch_grace: Duration::from_secs(2),
        }
    }
}

impl Settings {
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn with_container(mut self, width: f64, height: f64) -> Self {
        self.container_width = width;
        self.container_height = height;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn with_forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }
}
