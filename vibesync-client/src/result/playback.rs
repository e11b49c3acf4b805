//! Preview playback
//!
//! `PlaybackSession` keeps at most one preview playing. Starting a preview
//! pauses the current one before the new one starts.

use tracing::{debug, info};
use vibesync_common::api::types::TrackId;
use vibesync_common::Track;

use crate::error::{ClientError, Result};

/// Audio output able to start a preview clip
pub trait PreviewPlayer: Send {
    fn play(&mut self, preview_url: &str) -> Result<Box<dyn PreviewHandle>>;
}

/// A started clip
pub trait PreviewHandle: Send {
    fn pause(&mut self);
}

struct Playing {
    track_id: TrackId,
    handle: Box<dyn PreviewHandle>,
}

/// Exclusive preview playback owned by the result view
pub struct PlaybackSession {
    player: Box<dyn PreviewPlayer>,
    current: Option<Playing>,
}

impl PlaybackSession {
    pub fn new(player: Box<dyn PreviewPlayer>) -> Self {
        Self {
            player,
            current: None,
        }
    }

    /// Track currently marked as playing
    pub fn playing(&self) -> Option<TrackId> {
        self.current.as_ref().map(|p| p.track_id)
    }

    pub fn is_playing(&self, track_id: TrackId) -> bool {
        self.playing() == Some(track_id)
    }

    /// Play/pause button for `track`
    ///
    /// Pauses it if it is the one playing. Otherwise pauses whatever is
    /// playing and starts `track`. Returns the track now playing.
    pub fn toggle(&mut self, track: &Track) -> Result<Option<TrackId>> {
        if self.is_playing(track.track_id) {
            self.stop();
            return Ok(None);
        }

        let preview_url = track.preview_url.as_deref().ok_or_else(|| {
            ClientError::Playback(format!("track {} has no preview", track.track_id))
        })?;

        self.stop();
        let handle = self.player.play(preview_url)?;
        info!(track_id = track.track_id, track = %track.track_name, "Preview started");

        self.current = Some(Playing {
            track_id: track.track_id,
            handle,
        });
        Ok(Some(track.track_id))
    }

    /// Clip reached its end
    ///
    /// Ignored unless `track_id` is still the one marked as playing.
    pub fn track_ended(&mut self, track_id: TrackId) {
        if self.is_playing(track_id) {
            debug!(track_id, "Preview ended");
            self.current = None;
        }
    }

    /// Pause the current preview, if any
    pub fn stop(&mut self) {
        if let Some(mut playing) = self.current.take() {
            playing.handle.pause();
            debug!(track_id = playing.track_id, "Preview paused");
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.stop();
    }
}
