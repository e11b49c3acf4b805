//! Wire contracts shared by the proxy and the client
//!
//! # Design Principle
//!
//! This module contains ONLY serde types and pure helpers. The proxy wraps
//! them in axum handlers, the client sends and receives them over reqwest.

pub mod types;

pub use types::{
    AnalyzeRequest, AnalyzeResponse, ErrorBody, MusicSearchResponse, TagSet, Track,
    WeatherSnapshot, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT,
};
