//! Result Composer
//!
//! Turns a `TagSet` plus optional weather into the result view: title, tag
//! chips, location line and the track list from the music-search proxy.
//!
//! Each search takes a new generation number. A response only lands in the
//! view if no newer search (or clear) started while it was in flight.

pub mod links;
pub mod playback;
pub mod tag_style;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use vibesync_common::api::DEFAULT_SEARCH_LIMIT;
use vibesync_common::{TagSet, Track, WeatherSnapshot};

use crate::backend::MusicSearch;
pub use links::StreamingLinks;
pub use playback::{PlaybackSession, PreviewHandle, PreviewPlayer};
pub use tag_style::{style_for, ChipColor, TagChip, TagIcon, TagStyle};

/// Tags shown as chips and used for the search phrase
const PHRASE_TERMS: usize = 3;

const DEFAULT_LOCATION_LABEL: &str = "Current Location";

/// Search phrase: first 3 of tags followed by the weather description
pub fn search_phrase(tags: &TagSet, weather: Option<&WeatherSnapshot>) -> String {
    tags.iter()
        .chain(weather.map(|w| w.description.as_str()))
        .take(PHRASE_TERMS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Heading for the result view, e.g. "Cozy Rainy neon rainy"
pub fn result_title(tags: &TagSet, weather: Option<&WeatherSnapshot>) -> String {
    let prefix = match weather.map(|w| w.weather.as_str()) {
        Some("Rain") => "Cozy Rainy",
        Some("Clear") => "Sunny",
        _ => "Atmospheric",
    };
    format!(
        "{} {} {}",
        prefix,
        tags.get(0).unwrap_or("Vibe"),
        tags.get(1).unwrap_or("Flow")
    )
}

/// One row of the track list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackCard {
    pub track: Track,
    pub links: StreamingLinks,
}

impl From<Track> for TrackCard {
    fn from(track: Track) -> Self {
        let links = StreamingLinks::for_track(&track);
        Self { track, links }
    }
}

/// Everything the result view renders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultView {
    pub title: String,
    pub chips: Vec<TagChip>,
    /// Only set when weather is known
    pub location_label: Option<String>,
    pub temperature: Option<i64>,
    pub tracks: Vec<TrackCard>,
    pub loading: bool,
    pub generation: u64,
}

pub struct ResultComposer {
    search: Arc<dyn MusicSearch>,
    latest: AtomicU64,
    view: RwLock<ResultView>,
}

impl ResultComposer {
    pub fn new(search: Arc<dyn MusicSearch>) -> Self {
        Self {
            search,
            latest: AtomicU64::new(0),
            view: RwLock::new(ResultView::default()),
        }
    }

    /// Render headings and run one music search
    ///
    /// Returns `false` when a newer compose or clear superseded this one
    /// and its tracks were discarded. A failed search shows no tracks.
    pub async fn compose(&self, tags: &TagSet, weather: Option<&WeatherSnapshot>) -> bool {
        let generation = {
            let mut view = self.view.write().await;
            let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *view = ResultView {
                title: result_title(tags, weather),
                chips: tags.iter().take(PHRASE_TERMS).map(TagChip::new).collect(),
                location_label: weather.map(|w| {
                    w.name
                        .clone()
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| DEFAULT_LOCATION_LABEL.to_string())
                }),
                temperature: weather.map(|w| w.temp),
                tracks: Vec::new(),
                loading: true,
                generation,
            };
            generation
        };

        let phrase = search_phrase(tags, weather);
        debug!(generation, phrase = %phrase, "Searching music");

        let tracks = match self.search.search(&phrase, DEFAULT_SEARCH_LIMIT).await {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(error = %e, phrase = %phrase, "Music search failed");
                Vec::new()
            }
        };

        let mut view = self.view.write().await;
        if self.latest.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding stale music results");
            return false;
        }

        info!(generation, count = tracks.len(), "Music results ready");
        view.tracks = tracks.into_iter().map(TrackCard::from).collect();
        view.loading = false;
        true
    }

    pub async fn view(&self) -> ResultView {
        self.view.read().await.clone()
    }

    /// Reset the view; in-flight searches become stale
    pub async fn clear(&self) {
        let mut view = self.view.write().await;
        self.latest.fetch_add(1, Ordering::SeqCst);
        *view = ResultView::default();
    }
}
