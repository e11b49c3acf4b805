//! iTunes Search API client
//!
//! Song search by free-text term. Results are validated one by one into
//! `Track`; entries missing required fields are skipped.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use vibesync_common::Track;

const USER_AGENT: &str = concat!("VibeSync/", env!("CARGO_PKG_VERSION"));

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Value>,
}

/// Keep the first `limit` results that validate as tracks
fn validate_results(results: Vec<Value>, limit: usize) -> Vec<Track> {
    results
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<Track>(raw) {
            Ok(track) => Some(track),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping catalog result that is not a playable track");
                None
            }
        })
        .take(limit)
        .collect()
}

/// iTunes Search client
pub struct ItunesClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ItunesClient {
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search songs matching `term`, at most `limit` results
    pub async fn search_songs(&self, term: &str, limit: u32) -> Result<Vec<Track>, CatalogError> {
        let limit_param = limit.to_string();
        let params = [
            ("term", term),
            ("media", "music"),
            ("entity", "song"),
            ("limit", limit_param.as_str()),
        ];

        tracing::debug!(term = %term, limit = limit, "Querying iTunes Search API");

        let response = self
            .http_client
            .get(format!("{}/search", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        // iTunes answers with text/javascript, so decode explicitly
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;
        let parsed: SearchResponse =
            serde_json::from_slice(&bytes).map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let raw_count = parsed.results.len();
        let tracks = validate_results(parsed.results, limit as usize);
        tracing::info!(
            term = %term,
            returned = raw_count,
            kept = tracks.len(),
            "Catalog search successful"
        );
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song(id: i64) -> Value {
        json!({
            "wrapperType": "track",
            "trackId": id,
            "trackName": format!("Song {}", id),
            "artistName": "Artist",
            "previewUrl": "https://example.com/p.m4a",
            "trackViewUrl": format!("https://music.apple.com/t/{}", id),
        })
    }

    #[test]
    fn test_invalid_entries_skipped() {
        let results = vec![song(1), json!({"wrapperType": "collection"}), song(2)];
        let tracks = validate_results(results, 6);

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].track_id, 1);
        assert_eq!(tracks[1].track_id, 2);
    }

    #[test]
    fn test_results_capped_at_limit() {
        let results = (1..=10).map(song).collect();
        let tracks = validate_results(results, 3);

        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[2].track_id, 3);
    }
}
