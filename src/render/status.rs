//! The two-field status display: an icon and a line of text.

use serde::Serialize;

/// Status icons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Moon,
    NightCity,
    Sunrise,
    Briefcase,
    Sun,
    Dusk,
    AlarmClock,
    Storm,
    Rain,
    Cloud,
    Snowflake,
    Wind,
    SunBehindCloud,
}

impl Icon {
    pub fn name(self) -> &'static str {
        match self {
            Icon::Moon => "moon",
            Icon::NightCity => "night_city",
            Icon::Sunrise => "sunrise",
            Icon::Briefcase => "briefcase",
            Icon::Sun => "sun",
            Icon::Dusk => "dusk",
            Icon::AlarmClock => "alarm_clock",
            Icon::Storm => "storm",
            Icon::Rain => "rain",
            Icon::Cloud => "cloud",
            Icon::Snowflake => "snowflake",
            Icon::Wind => "wind",
            Icon::SunBehindCloud => "sun_behind_cloud",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Moon => "🌙",
            Icon::NightCity => "🌃",
            Icon::Sunrise => "🌅",
            Icon::Briefcase => "💼",
            Icon::Sun => "☀️",
            Icon::Dusk => "🌆",
            Icon::AlarmClock => "⏰",
            Icon::Storm => "⛈️",
            Icon::Rain => "🌧️",
            Icon::Cloud => "☁️",
            Icon::Snowflake => "❄️",
            Icon::Wind => "💨",
            Icon::SunBehindCloud => "🌤️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusDisplay {
    pub icon: Icon,
    pub text: String,
}

impl StatusDisplay {
    pub fn new(icon: Icon, text: impl Into<String>) -> Self {
        Self {
            icon,
            text: text.into(),
        }
    }
}

/// JavaScript-style rounding: halves go toward positive infinity.
pub fn round_half_up(x: f64) -> f64 {
    // x - floor(x) is exact, unlike x + 0.5
    let down = x.floor();
    if x - down >= 0.5 {
        down + 1.0
    } else {
        down
    }
}
