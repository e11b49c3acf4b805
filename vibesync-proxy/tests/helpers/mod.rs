//! Test helper modules for vibesync-proxy integration tests
//!
//! Provides reusable test infrastructure components:
//! - FakeUpstream: local stand-ins for Gemini, OpenWeatherMap and iTunes

pub mod fake_upstream;

pub use fake_upstream::{FakeReplies, FakeUpstream};
