//! Weather readings: slider-driven (simulated) and fetched (live).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use super::SignalSource;
use crate::error::UnknownPreset;
use crate::net::poller::{FetchOutcome, WeatherPoller};

/// Wind, temperature, cloud and rain readings for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherReading {
    /// Degrees, 0..=360
    pub wind_dir: f64,
    /// km/h
    pub wind_speed: f64,
    /// °C
    pub temp: f64,
    /// Percent, 0..=100
    pub clouds: f64,
    /// mm/h
    pub rain: f64,
}

impl WeatherReading {
    /// Substituted whenever a fetch fails.
    pub const FALLBACK: Self = Self {
        wind_dir: 180.0,
        wind_speed: 10.0,
        temp: 12.0,
        clouds: 50.0,
        rain: 0.0,
    };

    /// Live source state before the first fetch has landed.
    pub const UNFETCHED: Self = Self {
        wind_dir: 0.0,
        wind_speed: 0.0,
        temp: 12.0,
        clouds: 50.0,
        rain: 0.0,
    };

    /// Initial slider positions of the simulated page.
    pub const SIMULATED_START: Self = Self {
        wind_dir: 45.0,
        wind_speed: 15.0,
        temp: 12.0,
        clouds: 60.0,
        rain: 0.0,
    };
}

/// Named control presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
    Cold,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Sunny,
        Preset::Cloudy,
        Preset::Rainy,
        Preset::Stormy,
        Preset::Cold,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Sunny => "sunny",
            Preset::Cloudy => "cloudy",
            Preset::Rainy => "rainy",
            Preset::Stormy => "stormy",
            Preset::Cold => "cold",
        }
    }

    pub fn reading(self) -> WeatherReading {
        let (wind_dir, wind_speed, temp, clouds, rain) = match self {
            Preset::Sunny => (90.0, 8.0, 22.0, 10.0, 0.0),
            Preset::Cloudy => (180.0, 12.0, 15.0, 85.0, 0.0),
            Preset::Rainy => (270.0, 20.0, 10.0, 95.0, 8.0),
            Preset::Stormy => (315.0, 45.0, 8.0, 100.0, 15.0),
            Preset::Cold => (0.0, 25.0, -5.0, 50.0, 0.0),
        };
        WeatherReading {
            wind_dir,
            wind_speed,
            temp,
            clouds,
            rain,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// The slider panel of the simulated page.
///
/// Moving a control only updates the stored value; recomputation happens on
/// an explicit apply or when a preset is loaded.
#[derive(Debug, Clone)]
pub struct WeatherControls {
    values: WeatherReading,
}

impl Default for WeatherControls {
    fn default() -> Self {
        Self {
            values: WeatherReading::SIMULATED_START,
        }
    }
}

impl WeatherControls {
    pub fn set_wind_dir(&mut self, deg: f64) {
        self.values.wind_dir = deg.clamp(0.0, 360.0);
    }

    pub fn set_wind_speed(&mut self, kmh: f64) {
        self.values.wind_speed = kmh.max(0.0);
    }

    pub fn set_temp(&mut self, celsius: f64) {
        self.values.temp = celsius;
    }

    pub fn set_clouds(&mut self, percent: f64) {
        self.values.clouds = percent.clamp(0.0, 100.0);
    }

    pub fn set_rain(&mut self, mm: f64) {
        self.values.rain = mm.max(0.0);
    }

    /// Overwrite every control with the preset's values.
    pub fn load_preset(&mut self, preset: Preset) -> WeatherReading {
        self.values = preset.reading();
        self.values
    }

    pub fn values(&self) -> WeatherReading {
        self.values
    }
}

impl SignalSource for WeatherControls {
    type Reading = WeatherReading;

    fn current_reading(&mut self) -> WeatherReading {
        self.values
    }
}

/// Remotely fetched weather.
///
/// Holds the last good reading; a failed fetch installs
/// [`WeatherReading::FALLBACK`] instead of surfacing the error.
pub struct LiveWeather {
    poller: WeatherPoller,
    current: WeatherReading,
}

impl LiveWeather {
    pub fn new(poller: WeatherPoller) -> Self {
        Self {
            poller,
            current: WeatherReading::UNFETCHED,
        }
    }

    /// Kick off a background refresh. Returns false if one is already running.
    pub fn refresh(&mut self) -> bool {
        self.poller.request()
    }

    /// Block for at most `grace` waiting on the pending fetch.
    ///
    /// Returns true when a result (good or fallback) was installed. When the
    /// wait times out the fallback reading is installed so rendering can go
    /// ahead; the real result is picked up by a later [`poll`](Self::poll).
    pub fn settle(&mut self, grace: Duration) -> bool {
        match self.poller.wait(grace) {
            Some(outcome) => {
                self.install(outcome);
                true
            }
            None => {
                log::warn!(
                    "weather fetch still pending after {:?}; rendering with fallback",
                    grace
                );
                self.current = WeatherReading::FALLBACK;
                false
            }
        }
    }

    /// Pick up a finished fetch, if any. Returns true when a result (good or
    /// fallback) was installed.
    pub fn poll(&mut self) -> bool {
        match self.poller.poll() {
            Some(outcome) => {
                self.install(outcome);
                true
            }
            None => false,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.poller.is_pending()
    }

    fn install(&mut self, outcome: FetchOutcome) {
        self.current = match outcome {
            Ok(reading) => {
                log::info!(
                    "weather fetched: temp={} clouds={} wind={}@{} rain={}",
                    reading.temp,
                    reading.clouds,
                    reading.wind_speed,
                    reading.wind_dir,
                    reading.rain
                );
                reading
            }
            Err(e) => {
                log::warn!("weather fetch failed ({}); using fallback reading", e);
                WeatherReading::FALLBACK
            }
        };
    }
}

impl SignalSource for LiveWeather {
    type Reading = WeatherReading;

    fn current_reading(&mut self) -> WeatherReading {
        self.current
    }
}
