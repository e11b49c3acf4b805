//! Shared API request/response types
//!
//! Types used by both the proxy (server side) and the client workflow.
//! Field names follow the JSON the endpoints exchange, so the music
//! catalog's camelCase track fields are preserved on the wire.

use serde::{Deserialize, Serialize};

/// Default number of tracks requested from the music-search proxy
pub const DEFAULT_SEARCH_LIMIT: u32 = 6;

/// Largest `limit` the music-search proxy forwards upstream
pub const MAX_SEARCH_LIMIT: u32 = 200;

// ========================================
// Tagging
// ========================================

/// Ordered mood keywords returned by the vision model
///
/// Order is meaningful: the first elements seed the search phrase and the
/// result title. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for TagSet {
    fn from(tags: Vec<String>) -> Self {
        Self(tags)
    }
}

impl<'a> FromIterator<&'a str> for TagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// POST /api/analyze request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 image, either a `data:` URI or raw base64
    pub image: String,
}

/// POST /api/analyze response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub tags: TagSet,
}

// ========================================
// Weather
// ========================================

/// GET /api/weather response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in degrees Celsius, rounded to the nearest integer
    pub temp: i64,

    /// Condition group reported by the provider (e.g. "Rain", "Clear")
    pub weather: String,

    /// Free-text condition description (e.g. "light rain")
    pub description: String,

    /// Location name reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ========================================
// Music search
// ========================================

/// Catalog track identifier
pub type TrackId = i64;

/// A track returned by the music-search proxy
///
/// Read-only projection of one catalog search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub track_id: TrackId,
    pub track_name: String,
    pub artist_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_url100: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub track_view_url: String,
}

/// GET /api/music/search response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicSearchResponse {
    pub result_count: usize,
    pub results: Vec<Track>,
}

impl MusicSearchResponse {
    pub fn new(results: Vec<Track>) -> Self {
        Self {
            result_count: results.len(),
            results,
        }
    }
}

// ========================================
// Error Response Types
// ========================================

/// Error body returned by every proxy endpoint on 4xx/5xx
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// ========================================
// Tests
// ========================================
