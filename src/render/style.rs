//! Page-level style: tier classes, colour filters, background tone and the
//! status line.

use serde::Serialize;

use super::status::{round_half_up, Icon, StatusDisplay};
use crate::reduce::UncertaintyScore;
use crate::signal::weather::WeatherReading;

/// Top of the clock score range; the continuous filter saturates here.
pub const MAX_UNCERTAINTY: f64 = 270.0;

/// Severity tier of the combined uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UncertaintyTier {
    Low,
    Medium,
    High,
    Extreme,
}

impl UncertaintyTier {
    pub fn from_score(combined: f64) -> Self {
        if combined < 40.0 {
            Self::Low
        } else if combined < 70.0 {
            Self::Medium
        } else if combined < 100.0 {
            Self::High
        } else {
            Self::Extreme
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Self::Low => "uncertainty-low",
            Self::Medium => "uncertainty-medium",
            Self::High => "uncertainty-high",
            Self::Extreme => "uncertainty-extreme",
        }
    }
}

/// `hue-rotate(..) saturate(..)` applied to the whole page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HueFilter {
    pub hue_rotate_deg: f64,
    pub saturation: f64,
}

impl HueFilter {
    pub fn from_score(combined: f64) -> Self {
        Self {
            hue_rotate_deg: (combined / MAX_UNCERTAINTY) * 180.0,
            saturation: 1.0 + (combined / MAX_UNCERTAINTY) * 0.5,
        }
    }
}

/// `contrast(..%) brightness(..%)` applied to every element image
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageFilter {
    pub contrast_pct: f64,
    pub brightness_pct: f64,
}

/// Temperature classes. Warm and hot can both be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TemperatureTiers {
    pub cold: bool,
    pub warm: bool,
    pub hot: bool,
}

impl TemperatureTiers {
    pub fn from_temp(temp: f64) -> Self {
        let mut tiers = Self::default();
        if temp < 5.0 {
            tiers.cold = true;
        } else if temp > 20.0 {
            tiers.warm = true;
        }
        if temp > 28.0 {
            tiers.hot = true;
        }
        tiers
    }

    pub fn classes(self) -> Vec<&'static str> {
        [
            (self.cold, "temp-cold"),
            (self.warm, "temp-warm"),
            (self.hot, "temp-hot"),
        ]
        .into_iter()
        .filter_map(|(on, class)| on.then_some(class))
        .collect()
    }
}

/// Everything written to the page outside the per-element geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PageStyle {
    /// Replaces the variant's class family on `<body>`
    pub body_classes: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<HueFilter>,
    /// Grey level of the page background, 0..=255
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_filter: Option<ImageFilter>,
    /// Tilt of the floating name box in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_tilt: Option<f64>,
    /// Rounded combined uncertainty shown on the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readout: Option<i64>,
}

/// Clock/scroll variant: tier class, continuous colour filter and readout.
pub fn uncertainty_style(score: &UncertaintyScore) -> PageStyle {
    let combined = score.combined;
    PageStyle {
        body_classes: vec![UncertaintyTier::from_score(combined).class()],
        filter: Some(HueFilter::from_score(combined)),
        readout: Some(round_half_up(combined) as i64),
        ..PageStyle::default()
    }
}

/// Weather variants: temperature classes, cloud shading and name tilt.
pub fn weather_style(reading: &WeatherReading) -> PageStyle {
    let cloud_opacity = reading.clouds / 100.0;
    PageStyle {
        body_classes: TemperatureTiers::from_temp(reading.temp).classes(),
        background: Some(250.0 - reading.clouds * 0.5),
        image_filter: Some(ImageFilter {
            contrast_pct: 100.0 - cloud_opacity * 15.0,
            brightness_pct: 100.0 - cloud_opacity * 10.0,
        }),
        name_tilt: Some((reading.temp - 12.0) / 20.0 * 3.0),
        ..PageStyle::default()
    }
}

/// Sky condition picked for the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Stormy,
    Rainy,
    Cloudy,
    Sunny,
    Cold,
    Windy,
    Fair,
}

impl Condition {
    pub fn icon(self) -> Icon {
        match self {
            Self::Stormy => Icon::Storm,
            Self::Rainy => Icon::Rain,
            Self::Cloudy => Icon::Cloud,
            Self::Sunny => Icon::Sun,
            Self::Cold => Icon::Snowflake,
            Self::Windy => Icon::Wind,
            Self::Fair => Icon::SunBehindCloud,
        }
    }
}

/// Status-line rules of the two weather pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusProfile {
    /// Fetched weather: temperature-prefixed text plus wind annotation
    #[default]
    Live,
    /// Slider-driven weather: fixed phrases, higher rain thresholds
    Simulated,
}

impl StatusProfile {
    /// (stormy above, rainy above) in mm/h
    fn rain_thresholds(self) -> (f64, f64) {
        match self {
            Self::Live => (5.0, 1.0),
            Self::Simulated => (10.0, 3.0),
        }
    }

    /// First matching rule wins.
    pub fn condition(self, r: &WeatherReading) -> Condition {
        let (storm, rain) = self.rain_thresholds();
        if r.rain > storm {
            Condition::Stormy
        } else if r.rain > rain {
            Condition::Rainy
        } else if r.clouds > 80.0 {
            Condition::Cloudy
        } else if r.clouds < 20.0 && r.temp > 18.0 {
            Condition::Sunny
        } else if r.temp < 0.0 {
            Condition::Cold
        } else if r.wind_speed > 30.0 {
            Condition::Windy
        } else {
            Condition::Fair
        }
    }
}

/// Icon and description for a weather reading.
pub fn weather_status(r: &WeatherReading, profile: StatusProfile) -> StatusDisplay {
    let condition = profile.condition(r);
    let text = match profile {
        StatusProfile::Live => {
            let temp = round_half_up(r.temp);
            let mut text = match condition {
                Condition::Stormy => format!("{temp}°C · Stormy"),
                Condition::Rainy => format!("{temp}°C · Rainy"),
                Condition::Cloudy => format!("{temp}°C · Cloudy"),
                Condition::Sunny => format!("{temp}°C · Sunny"),
                Condition::Cold => format!("{temp}°C · Cold"),
                Condition::Windy => format!("{temp}°C · Windy"),
                Condition::Fair => format!("{temp}°C"),
            };
            if r.wind_speed > 20.0 {
                text.push_str(&format!(" · {} km/h wind", round_half_up(r.wind_speed)));
            }
            text
        }
        StatusProfile::Simulated => match condition {
            Condition::Stormy => "Stormy conditions",
            Condition::Rainy => "Rainy weather",
            Condition::Cloudy => "Cloudy skies",
            Condition::Sunny => "Sunny and clear",
            Condition::Cold => "Cold and crisp",
            Condition::Windy => "Very windy",
            Condition::Fair => "Current weather in Eindhoven",
        }
        .to_string(),
    };
    StatusDisplay::new(condition.icon(), text)
}
