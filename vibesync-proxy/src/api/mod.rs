//! HTTP API handlers for vibesync-proxy

pub mod analyze;
pub mod health;
pub mod music;
pub mod weather;

pub use analyze::analyze_image;
pub use health::health_routes;
pub use music::search_music;
pub use weather::current_weather;

/// Raw query string as ordered pairs; repeated keys are kept
pub type QueryPairs = Vec<(String, String)>;

/// First value of `key`; later repeats are ignored
pub(crate) fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}
