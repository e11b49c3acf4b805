//! Music-search proxy
//!
//! GET /api/music/search?term=..&limit=..

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::{error, warn};
use vibesync_common::api::{MusicSearchResponse, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};

use super::{first_value, QueryPairs};
use crate::error::{ApiResult, ProxyError};
use crate::AppState;

/// Query parameters for music search
#[derive(Debug, Default)]
pub struct MusicSearchQuery {
    pub term: Option<String>,
    pub limit: Option<String>,
}

impl MusicSearchQuery {
    /// First `term` and `limit` values win
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            term: first_value(pairs, "term"),
            limit: first_value(pairs, "limit"),
        }
    }

    pub fn term(&self) -> Result<&str, ProxyError> {
        self.term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ProxyError::BadRequest("Search term is required"))
    }

    /// Blank or absent → default; otherwise an integer in 1..=MAX_SEARCH_LIMIT
    pub fn limit(&self) -> Result<u32, ProxyError> {
        match self.limit.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            None => Ok(DEFAULT_SEARCH_LIMIT),
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|l| (1..=MAX_SEARCH_LIMIT).contains(l))
                .ok_or(ProxyError::BadRequest("Invalid limit")),
        }
    }
}

/// GET /api/music/search
pub async fn search_music(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> ApiResult<Json<MusicSearchResponse>> {
    let Query(pairs) = query.map_err(|e| {
        warn!("Malformed music search query: {}", e);
        ProxyError::BadRequest("Search term is required")
    })?;
    let query = MusicSearchQuery::from_pairs(&pairs);
    let term = query.term()?;
    let limit = query.limit()?;

    let tracks = state.catalog.search_songs(term, limit).await.map_err(|e| {
        error!(error = %e, term = %term, "Error fetching music");
        ProxyError::Upstream("Failed to fetch music data")
    })?;

    Ok(Json(MusicSearchResponse::new(tracks)))
}
