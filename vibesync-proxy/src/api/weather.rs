//! Weather proxy
//!
//! GET /api/weather?lat=..&lon=..

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::{error, warn};
use vibesync_common::WeatherSnapshot;

use super::{first_value, QueryPairs};
use crate::error::{ApiResult, ProxyError};
use crate::AppState;

/// Query parameters for weather lookup
#[derive(Debug, Default)]
pub struct WeatherQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

/// Coordinates validated from the query string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl WeatherQuery {
    /// First `lat` and `lon` values win
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            lat: first_value(pairs, "lat"),
            lon: first_value(pairs, "lon"),
        }
    }

    /// Missing/blank → "Missing coordinates"; unparsable or out of range →
    /// "Invalid coordinates"
    pub fn coordinates(&self) -> Result<Coordinates, ProxyError> {
        let (Some(lat), Some(lon)) = (non_blank(&self.lat), non_blank(&self.lon)) else {
            return Err(ProxyError::BadRequest("Missing coordinates"));
        };

        let lat: f64 = lat
            .parse()
            .map_err(|_| ProxyError::BadRequest("Invalid coordinates"))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| ProxyError::BadRequest("Invalid coordinates"))?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ProxyError::BadRequest("Invalid coordinates"));
        }

        Ok(Coordinates { lat, lon })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// GET /api/weather
pub async fn current_weather(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> ApiResult<Json<WeatherSnapshot>> {
    let Query(pairs) = query.map_err(|e| {
        warn!("Malformed weather query: {}", e);
        ProxyError::BadRequest("Missing coordinates")
    })?;
    let coords = WeatherQuery::from_pairs(&pairs).coordinates()?;

    let Some(client) = state.weather.as_ref() else {
        error!("Weather request rejected: OPENWEATHER_API_KEY not configured");
        return Err(ProxyError::Misconfigured("Server misconfiguration"));
    };

    let snapshot = client
        .current_weather(coords.lat, coords.lon)
        .await
        .map_err(|e| {
            error!(error = %e, "OpenWeatherMap error details");
            ProxyError::Upstream("Failed to fetch weather")
        })?;

    Ok(Json(snapshot))
}
