//! # VibeSync Common Library
//!
//! Shared code for the VibeSync proxy and client including:
//! - Wire contracts for the tagging, weather and music-search endpoints
//! - Configuration loading (TOML bootstrap file + environment)
//! - Common error type

pub mod api;
pub mod config;
pub mod error;

pub use api::types::{TagSet, Track, WeatherSnapshot};
pub use error::{Error, Result};
