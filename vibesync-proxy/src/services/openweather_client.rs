//! OpenWeatherMap API client
//!
//! Current-conditions lookup by coordinates, metric units. The provider's
//! JSON is validated into a `WeatherSnapshot` here so nothing untyped
//! leaves the proxy.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use vibesync_common::WeatherSnapshot;

const USER_AGENT: &str = concat!("VibeSync/", env!("CARGO_PKG_VERSION"));

/// OpenWeatherMap client errors
#[derive(Debug, Error)]
pub enum WeatherApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(&'static str),
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
    description: String,
}

impl CurrentWeatherResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, WeatherApiError> {
        if !self.main.temp.is_finite() {
            return Err(WeatherApiError::InvalidResponse("temperature is not a number"));
        }

        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherApiError::InvalidResponse("no weather conditions"))?;

        let weather = condition.main.trim().to_string();
        let description = condition.description.trim().to_string();
        if weather.is_empty() || description.is_empty() {
            return Err(WeatherApiError::InvalidResponse("empty weather condition"));
        }

        Ok(WeatherSnapshot {
            temp: self.main.temp.round() as i64,
            weather,
            description,
            name: self
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        })
    }
}

/// OpenWeatherMap current weather client
pub struct OpenWeatherClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: String) -> Result<Self, WeatherApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WeatherApiError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Current conditions at the given coordinates
    pub async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, WeatherApiError> {
        let lat = lat.to_string();
        let lon = lon.to_string();
        let params = [
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ];

        tracing::debug!(lat = %lat, lon = %lon, "Querying OpenWeatherMap API");

        let response = self
            .http_client
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherApiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WeatherApiError::ApiError(status.as_u16(), error_text));
        }

        let parsed: CurrentWeatherResponse = response
            .json()
            .await
            .map_err(|e| WeatherApiError::ParseError(e.to_string()))?;

        let snapshot = parsed.into_snapshot()?;
        tracing::info!(
            temp = snapshot.temp,
            weather = %snapshot.weather,
            "Weather lookup successful"
        );
        Ok(snapshot)
    }
}
