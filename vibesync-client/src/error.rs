//! Error types for vibesync-client
//!
//! None of these reach the user as structured data. Each component catches
//! its own failures and degrades (empty tags, absent weather, empty track
//! list); the variants exist for logging and for tests.

use thiserror::Error;

use crate::sequencer::ViewState;

/// Main error type for the client workflow
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure talking to the proxy
    #[error("Network error: {0}")]
    Network(String),

    /// Proxy answered with a non-success status
    #[error("Proxy error {status}: {message}")]
    Proxy { status: u16, message: String },

    /// Proxy answered with an unexpected body
    #[error("Parse error: {0}")]
    Parse(String),

    /// Camera or upload could not produce an image
    #[error("Capture error: {0}")]
    Capture(String),

    /// Event not valid in the current view state
    #[error("Invalid transition: {event} while in {state}")]
    InvalidTransition {
        state: ViewState,
        event: &'static str,
    },

    /// Preview playback backend failure
    #[error("Playback error: {0}")]
    Playback(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;
