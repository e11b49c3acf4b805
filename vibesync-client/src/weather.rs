//! Weather Collector
//!
//! Runs once per session as a background task: locate, then look up the
//! weather. The snapshot is published on a watch channel and stays `None`
//! when location or lookup fails.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use vibesync_common::WeatherSnapshot;

use crate::backend::WeatherService;

/// Latitude/longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Device position source
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// `None` when permission is denied or no fix is available
    async fn current_position(&self) -> Option<Coordinates>;
}

/// Position given up front (command line, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinates>);

#[async_trait]
impl GeoLocator for FixedLocation {
    async fn current_position(&self) -> Option<Coordinates> {
        self.0
    }
}

/// Session-wide view of the weather lookup
#[derive(Debug, Clone)]
pub struct WeatherHandle {
    rx: watch::Receiver<Option<WeatherSnapshot>>,
}

impl WeatherHandle {
    /// Handle whose snapshot never arrives
    pub fn absent() -> Self {
        let (_tx, rx) = watch::channel(None);
        Self { rx }
    }

    pub fn current(&self) -> Option<WeatherSnapshot> {
        self.rx.borrow().clone()
    }

    /// Wait for the snapshot to change
    ///
    /// Returns `false` once the collector has finished without further
    /// updates.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

pub struct WeatherCollector;

impl WeatherCollector {
    /// Start the one-shot lookup
    pub fn spawn(
        locator: Arc<dyn GeoLocator>,
        service: Arc<dyn WeatherService>,
    ) -> (WeatherHandle, JoinHandle<()>) {
        let (tx, rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let Some(at) = locator.current_position().await else {
                info!("Location unavailable, continuing without weather");
                return;
            };

            match service.lookup(at).await {
                Ok(snapshot) => {
                    info!(
                        temp = snapshot.temp,
                        weather = %snapshot.weather,
                        description = %snapshot.description,
                        "Weather collected"
                    );
                    // No receivers left is fine: the session is gone
                    let _ = tx.send(Some(snapshot));
                }
                Err(e) => warn!(error = %e, lat = at.lat, lon = at.lon, "Weather lookup failed"),
            }
        });

        (WeatherHandle { rx }, task)
    }
}
