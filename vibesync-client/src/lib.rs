//! vibesync-client - capture → analyze → result workflow
//!
//! Drives the four VibeSync views against the proxy:
//! - `capture`: camera frames or uploaded files as data URIs
//! - `analysis`: tagging request for the captured image
//! - `weather`: one background weather lookup per session
//! - `result`: music search, tag chips, streaming links, preview playback
//!
//! `VibeSession` ties them together through the pure `ViewSequencer`.

pub mod analysis;
pub mod backend;
pub mod capture;
pub mod error;
pub mod proxy_client;
pub mod result;
pub mod sequencer;
pub mod session;
pub mod weather;

pub use analysis::AnalysisRequestor;
pub use backend::{MusicSearch, TaggingService, WeatherService};
pub use capture::{CaptureController, CapturedImage, FacingMode};
pub use error::{ClientError, Result};
pub use proxy_client::{ProxyClient, DEFAULT_PROXY_URL};
pub use result::{ResultComposer, ResultView};
pub use sequencer::{Effect, ViewEvent, ViewSequencer, ViewState};
pub use session::{AnalyzingProgress, VibeSession};
pub use weather::{Coordinates, FixedLocation, GeoLocator, WeatherCollector, WeatherHandle};
