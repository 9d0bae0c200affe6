use serde::Deserialize;
use url::Url;

use crate::config::Settings;
use crate::error::FetchError;
use crate::signal::weather::WeatherReading;

/// Fields requested from the `current` block
const CURRENT_FIELDS: &str = "temperature_2m,cloud_cover,wind_speed_10m,wind_direction_10m";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentWeather,
    hourly: HourlyWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature_2m: f64,
    cloud_cover: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
}

#[derive(Debug, Deserialize)]
struct HourlyWeather {
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
}

/// Decode an Open-Meteo forecast body.
///
/// `hour` indexes `hourly.precipitation` (local hour of day); a missing or
/// null entry counts as no rain.
pub fn parse_forecast(body: &str, hour: usize) -> Result<WeatherReading, FetchError> {
    let data: ForecastResponse = serde_json::from_str(body)?;
    let rain = data
        .hourly
        .precipitation
        .get(hour)
        .copied()
        .flatten()
        .unwrap_or(0.0);

    Ok(WeatherReading {
        wind_dir: data.current.wind_direction_10m,
        wind_speed: data.current.wind_speed_10m,
        temp: data.current.temperature_2m,
        clouds: data.current.cloud_cover,
        rain,
    })
}

/// Blocking Open-Meteo client for one fixed location.
#[derive(Clone)]
pub struct OpenMeteo {
    client: reqwest::blocking::Client,
    url: Url,
}

impl OpenMeteo {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let url = forecast_url(&settings.forecast_url, settings.latitude, settings.longitude)?;

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("uncertainty-layout/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.fetch_timeout)
            .build()?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch current conditions, taking rain from the given hour.
    pub fn fetch(&self, hour: usize) -> Result<WeatherReading, FetchError> {
        let response = self
            .client
            .get(self.url.as_str())
            .header("Accept", "application/json")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_forecast(&body, hour)
    }
}

/// Build the forecast URL for a location.
pub fn forecast_url(base: &str, latitude: f64, longitude: f64) -> Result<Url, FetchError> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair("latitude", &latitude.to_string())
        .append_pair("longitude", &longitude.to_string())
        .append_pair("current", CURRENT_FIELDS)
        .append_pair("hourly", "precipitation")
        .append_pair("timezone", "auto");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "latitude": 51.44,
        "longitude": 5.48,
        "current": {
            "time": "2024-06-12T14:00",
            "temperature_2m": 17.3,
            "cloud_cover": 88,
            "wind_speed_10m": 23.4,
            "wind_direction_10m": 250
        },
        "hourly": {
            "time": ["2024-06-12T00:00", "2024-06-12T01:00", "2024-06-12T02:00"],
            "precipitation": [0.0, 1.6, null]
        }
    }"#;

    #[test]
    fn parses_current_block() {
        let r = parse_forecast(BODY, 1).unwrap();
        assert!((r.temp - 17.3).abs() < 1e-9);
        assert_eq!(r.clouds, 88.0);
        assert!((r.wind_speed - 23.4).abs() < 1e-9);
        assert_eq!(r.wind_dir, 250.0);
        assert!((r.rain - 1.6).abs() < 1e-9);
    }

    #[test]
    fn null_or_missing_precipitation_is_zero() {
        assert_eq!(parse_forecast(BODY, 2).unwrap().rain, 0.0);
        assert_eq!(parse_forecast(BODY, 17).unwrap().rain, 0.0);
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let err = parse_forecast(r#"{"current": {"temperature_2m": 3}}"#, 0);
        assert!(matches!(err, Err(FetchError::Decode(_))));
        assert!(parse_forecast("<html>502</html>", 0).is_err());
    }

    #[test]
    fn url_carries_location_and_fields() {
        let url = forecast_url(crate::config::OPEN_METEO_URL, 51.4408, 5.4778).unwrap();
        let query = url.query().unwrap_or_default().to_string();
        assert!(query.contains("latitude=51.4408"));
        assert!(query.contains("longitude=5.4778"));
        assert!(query.contains("hourly=precipitation"));
        assert!(query.contains("timezone=auto"));
        assert_eq!(url.host_str(), Some("api.open-meteo.com"));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(matches!(
            forecast_url("not a url", 0.0, 0.0),
            Err(FetchError::InvalidUrl(_))
        ));
    }
}
