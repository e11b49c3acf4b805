//! HTTP client for the vibesync proxy
//!
//! One `reqwest::Client` shared by the three endpoints. Non-success
//! responses carry `{"error": "..."}`, which is lifted into
//! `ClientError::Proxy` so callers can log the proxy's own message.

use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::debug;
use vibesync_common::api::{AnalyzeRequest, AnalyzeResponse, ErrorBody, MusicSearchResponse};
use vibesync_common::{TagSet, Track, WeatherSnapshot};

use crate::backend::{MusicSearch, TaggingService, WeatherService};
use crate::capture::CapturedImage;
use crate::error::{ClientError, Result};
use crate::weather::Coordinates;

const USER_AGENT: &str = concat!("vibesync-client/", env!("CARGO_PKG_VERSION"));

/// Default proxy location
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:5780";

pub struct ProxyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decode a success body, or turn an error body into `ClientError::Proxy`
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        return Err(ClientError::Proxy {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Parse(e.to_string()))
}

fn network(e: reqwest::Error) -> ClientError {
    ClientError::Network(e.to_string())
}

#[async_trait]
impl TaggingService for ProxyClient {
    async fn analyze(&self, image: &CapturedImage) -> Result<TagSet> {
        debug!(bytes = image.encoded_len(), "Sending image for analysis");

        let body = AnalyzeRequest {
            image: image.as_data_uri().to_string(),
        };
        let response = self
            .http_client
            .post(self.url("/api/analyze"))
            .json(&body)
            .send()
            .await
            .map_err(network)?;

        let parsed: AnalyzeResponse = read_json(response).await?;
        Ok(parsed.tags)
    }
}

#[async_trait]
impl WeatherService for ProxyClient {
    async fn lookup(&self, at: Coordinates) -> Result<WeatherSnapshot> {
        let lat = at.lat.to_string();
        let lon = at.lon.to_string();

        let response = self
            .http_client
            .get(self.url("/api/weather"))
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await
            .map_err(network)?;

        read_json(response).await
    }
}

#[async_trait]
impl MusicSearch for ProxyClient {
    async fn search(&self, phrase: &str, limit: u32) -> Result<Vec<Track>> {
        let limit = limit.to_string();

        let response = self
            .http_client
            .get(self.url("/api/music/search"))
            .query(&[("term", phrase), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(network)?;

        let parsed: MusicSearchResponse = read_json(response).await?;
        Ok(parsed.results)
    }
}
