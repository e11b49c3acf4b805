//! Service seams between the workflow and the proxy
//!
//! `ProxyClient` implements all three over HTTP; tests swap in fakes.

use async_trait::async_trait;
use vibesync_common::{TagSet, Track, WeatherSnapshot};

use crate::capture::CapturedImage;
use crate::error::Result;
use crate::weather::Coordinates;

/// Image → mood keywords
#[async_trait]
pub trait TaggingService: Send + Sync {
    async fn analyze(&self, image: &CapturedImage) -> Result<TagSet>;
}

/// Coordinates → current conditions
#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn lookup(&self, at: Coordinates) -> Result<WeatherSnapshot>;
}

/// Free-text phrase → matching tracks
#[async_trait]
pub trait MusicSearch: Send + Sync {
    async fn search(&self, phrase: &str, limit: u32) -> Result<Vec<Track>>;
}
