//! Streaming service links for a track
//!
//! Apple Music uses the catalog's own page. The others are search pages for
//! "<track name> <artist name>". No link is checked for reachability.

use serde::Serialize;
use vibesync_common::Track;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamingLinks {
    pub apple_music: String,
    pub spotify: String,
    pub soundcloud: String,
    pub audiomack: String,
}

impl StreamingLinks {
    pub fn for_track(track: &Track) -> Self {
        let term = format!("{} {}", track.track_name, track.artist_name);
        let enc = urlencoding::encode(&term);

        Self {
            apple_music: track.track_view_url.clone(),
            spotify: format!("https://open.spotify.com/search/{}", enc),
            soundcloud: format!("https://soundcloud.com/search?q={}", enc),
            audiomack: format!("https://audiomack.com/search?q={}", enc),
        }
    }
}
