//! VibeSession - async driver for the view sequencer
//!
//! Feeds user actions and request outcomes into `ViewSequencer` and runs
//! the effects it returns against the analysis requestor and the result
//! composer. View changes are broadcast on a watch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use vibesync_common::api::types::TrackId;
use vibesync_common::WeatherSnapshot;

use crate::analysis::AnalysisRequestor;
use crate::capture::CapturedImage;
use crate::error::{ClientError, Result};
use crate::result::{PlaybackSession, PreviewPlayer, ResultComposer, ResultView};
use crate::sequencer::{Effect, ViewEvent, ViewSequencer, ViewState};
use crate::weather::WeatherHandle;

/// Pause between tags arriving and the result view appearing
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_secs(2);

/// Builds the preview player each time a result view opens
pub type PlayerFactory = Box<dyn Fn() -> Box<dyn PreviewPlayer> + Send + Sync>;

/// Analyzing view checklist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzingProgress {
    /// Tags came back from the tagging proxy
    pub scene_detected: bool,
    /// A weather snapshot is available
    pub weather_checked: bool,
}

pub struct VibeSession {
    sequencer: ViewSequencer,
    analysis: AnalysisRequestor,
    composer: Arc<ResultComposer>,
    weather: WeatherHandle,
    reveal_delay: Duration,
    state_tx: watch::Sender<ViewState>,
    progress_tx: watch::Sender<AnalyzingProgress>,
    /// Weather the current results were searched with
    composed_with: Option<WeatherSnapshot>,
    player_factory: Option<PlayerFactory>,
    playback: Option<PlaybackSession>,
}

impl VibeSession {
    pub fn new(
        analysis: AnalysisRequestor,
        composer: Arc<ResultComposer>,
        weather: WeatherHandle,
    ) -> Self {
        let (state_tx, _) = watch::channel(ViewState::default());
        let (progress_tx, _) = watch::channel(AnalyzingProgress::default());

        Self {
            sequencer: ViewSequencer::new(),
            analysis,
            composer,
            weather,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            state_tx,
            progress_tx,
            composed_with: None,
            player_factory: None,
            playback: None,
        }
    }

    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    /// Enable preview playback in the result view
    pub fn with_player(mut self, factory: PlayerFactory) -> Self {
        self.player_factory = Some(factory);
        self
    }

    pub fn state(&self) -> ViewState {
        self.sequencer.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state_tx.subscribe()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<AnalyzingProgress> {
        self.progress_tx.subscribe()
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.sequencer.image()
    }

    pub fn weather(&self) -> Option<WeatherSnapshot> {
        self.weather.current()
    }

    pub fn progress(&self) -> AnalyzingProgress {
        AnalyzingProgress {
            scene_detected: self.progress_tx.borrow().scene_detected,
            weather_checked: self.weather.current().is_some(),
        }
    }

    pub async fn result_view(&self) -> ResultView {
        self.composer.view().await
    }

    pub fn playback(&self) -> Option<&PlaybackSession> {
        self.playback.as_ref()
    }

    fn dispatch(&mut self, event: ViewEvent) -> Result<Option<Effect>> {
        let effect = self.sequencer.apply(event)?;
        self.state_tx.send_replace(self.sequencer.state());
        Ok(effect)
    }

    fn publish_progress(&self, scene_detected: bool) {
        self.progress_tx.send_replace(AnalyzingProgress {
            scene_detected,
            weather_checked: self.weather.current().is_some(),
        });
    }

    /// Execute one effect; returns the effect of any event it dispatched
    async fn run(&mut self, effect: Effect) -> Result<Option<Effect>> {
        match effect {
            Effect::RequestAnalysis(image) => {
                let tags = self.analysis.request(&image).await;
                if tags.is_empty() {
                    warn!("No scene tags, back to capture");
                    return self.dispatch(ViewEvent::AnalysisFailed);
                }

                self.publish_progress(true);
                debug!(delay_ms = self.reveal_delay.as_millis() as u64, "Holding analyzing view");
                tokio::time::sleep(self.reveal_delay).await;
                self.dispatch(ViewEvent::AnalysisSucceeded(tags))
            }
            Effect::ComposeResults(tags) => {
                let weather = self.weather.current();
                self.playback = self
                    .player_factory
                    .as_ref()
                    .map(|factory| PlaybackSession::new(factory()));
                self.composer.compose(&tags, weather.as_ref()).await;
                self.composed_with = weather;
                Ok(None)
            }
            Effect::ClearResults => {
                // Dropping the session pauses any preview
                self.playback = None;
                self.composed_with = None;
                self.composer.clear().await;
                Ok(None)
            }
        }
    }

    /// Run effects until the view settles
    async fn settle(&mut self, mut effect: Option<Effect>) -> Result<()> {
        while let Some(next) = effect {
            effect = self.run(next).await?;
        }
        Ok(())
    }

    /// Home "start" button
    pub fn start(&mut self) -> Result<()> {
        self.dispatch(ViewEvent::Start).map(drop)
    }

    /// Capture view "back" button
    pub fn back(&mut self) -> Result<()> {
        self.dispatch(ViewEvent::Back).map(drop)
    }

    /// Hand a captured image to the workflow
    ///
    /// Resolves once the view has settled: `Result` after a successful
    /// analysis and the reveal delay, `Capture` when analysis failed.
    pub async fn submit_image(&mut self, image: CapturedImage) -> Result<ViewState> {
        let effect = self.dispatch(ViewEvent::ImageProduced(image))?;
        self.publish_progress(false);
        self.settle(effect).await?;
        Ok(self.state())
    }

    /// Search again if weather arrived or changed since the last search
    ///
    /// Returns `true` when a new search ran.
    pub async fn refresh_on_weather_change(&mut self) -> bool {
        if self.state() != ViewState::Result {
            return false;
        }
        let weather = self.weather.current();
        if weather == self.composed_with {
            return false;
        }

        info!("Weather changed, refreshing results");
        let tags = self.sequencer.tags().clone();
        self.composer.compose(&tags, weather.as_ref()).await;
        self.composed_with = weather;
        true
    }

    /// Play or pause a track from the current result list
    pub fn toggle_preview(&mut self, track_id: TrackId, view: &ResultView) -> Result<Option<TrackId>> {
        let track = view
            .tracks
            .iter()
            .map(|card| &card.track)
            .find(|t| t.track_id == track_id)
            .ok_or_else(|| ClientError::Playback(format!("track {} not in results", track_id)))?;

        let playback = self
            .playback
            .as_mut()
            .ok_or_else(|| ClientError::Playback("no preview player".to_string()))?;
        playback.toggle(track)
    }

    /// Preview clip played to its end
    ///
    /// Clears the playing mark if `track_id` is still the current track.
    pub fn preview_ended(&mut self, track_id: TrackId) {
        if let Some(playback) = self.playback.as_mut() {
            playback.track_ended(track_id);
        }
    }

    /// Result view "start over" button
    pub async fn restart(&mut self) -> Result<()> {
        let effect = self.dispatch(ViewEvent::Restart)?;
        self.settle(effect).await?;
        self.publish_progress(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MusicSearch, TaggingService, WeatherService};
    use crate::result::PreviewHandle;
    use crate::weather::{Coordinates, FixedLocation, WeatherCollector};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use vibesync_common::{TagSet, Track};

    struct FakeTagging(Option<TagSet>);

    #[async_trait]
    impl TaggingService for FakeTagging {
        async fn analyze(&self, _image: &CapturedImage) -> Result<TagSet> {
            self.0.clone().ok_or(ClientError::Proxy {
                status: 500,
                message: "Missing API Key".to_string(),
            })
        }
    }

    struct FakeWeather;

    #[async_trait]
    impl WeatherService for FakeWeather {
        async fn lookup(&self, _at: Coordinates) -> Result<WeatherSnapshot> {
            Ok(WeatherSnapshot {
                temp: 14,
                weather: "Clear".to_string(),
                description: "clear sky".to_string(),
                name: None,
            })
        }
    }

    #[derive(Default)]
    struct RecordingSearch {
        phrases: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MusicSearch for RecordingSearch {
        async fn search(&self, phrase: &str, _limit: u32) -> Result<Vec<Track>> {
            self.phrases.lock().unwrap().push(phrase.to_string());
            Ok(vec![Track {
                track_id: 11,
                track_name: "Nightcall".to_string(),
                artist_name: "Kavinsky".to_string(),
                artwork_url100: None,
                preview_url: Some("https://audio.example/11.m4a".to_string()),
                track_view_url: "https://music.apple.com/11".to_string(),
            }])
        }
    }

    struct CountingPlayer(Arc<AtomicUsize>);
    struct SilentHandle(Arc<AtomicUsize>);

    impl PreviewPlayer for CountingPlayer {
        fn play(&mut self, _preview_url: &str) -> Result<Box<dyn PreviewHandle>> {
            Ok(Box::new(SilentHandle(self.0.clone())))
        }
    }

    impl PreviewHandle for SilentHandle {
        fn pause(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn image() -> CapturedImage {
        CapturedImage::from_data_uri("data:image/jpeg;base64,/9j/4AAQ").unwrap()
    }

    fn session(tags: Option<&[&str]>, weather: WeatherHandle) -> (VibeSession, Arc<RecordingSearch>) {
        let tagging = FakeTagging(tags.map(|t| t.iter().copied().collect()));
        let search = Arc::new(RecordingSearch::default());
        let session = VibeSession::new(
            AnalysisRequestor::new(Arc::new(tagging)),
            Arc::new(ResultComposer::new(search.clone())),
            weather,
        );
        (session, search)
    }

    #[tokio::test(start_paused = true)]
    async fn test_tags_to_results() {
        let (mut session, search) = session(Some(&["neon", "rainy", "moody"]), WeatherHandle::absent());

        session.start().unwrap();
        let started = tokio::time::Instant::now();
        let state = session.submit_image(image()).await.unwrap();

        assert_eq!(state, ViewState::Result);
        assert!(started.elapsed() >= DEFAULT_REVEAL_DELAY);
        assert_eq!(*search.phrases.lock().unwrap(), vec!["neon rainy moody"]);

        let view = session.result_view().await;
        assert_eq!(view.title, "Atmospheric neon rainy");
        assert_eq!(view.tracks.len(), 1);
        assert_eq!(view.location_label, None);
    }

    #[tokio::test]
    async fn test_missing_key_falls_back_to_capture() {
        let (mut session, search) = session(None, WeatherHandle::absent());
        let mut states = session.subscribe();

        session.start().unwrap();
        let state = session.submit_image(image()).await.unwrap();

        assert_eq!(state, ViewState::Capture);
        assert!(states.has_changed().unwrap());
        assert_eq!(*states.borrow_and_update(), ViewState::Capture);
        assert!(session.image().is_none());
        assert!(search.phrases.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_while_analyzing() {
        let (mut session, _search) = session(Some(&["cozy"]), WeatherHandle::absent());
        let mut progress = session.subscribe_progress();
        let states = session.subscribe();
        session.start().unwrap();

        let observe = async {
            let seen = *progress.wait_for(|p| p.scene_detected).await.unwrap();
            (seen, *states.borrow())
        };
        let (result, (seen, state_then)) = tokio::join!(session.submit_image(image()), observe);

        assert_eq!(result.unwrap(), ViewState::Result);
        assert_eq!(state_then, ViewState::Analyzing);
        assert_eq!(
            seen,
            AnalyzingProgress {
                scene_detected: true,
                weather_checked: false
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_weather_refreshes_results() {
        let locator = Arc::new(FixedLocation(Some(Coordinates::new(40.4, -3.7))));
        let (mut handle, task) = WeatherCollector::spawn(locator, Arc::new(FakeWeather));
        let (mut session, search) = session(Some(&["cafe"]), handle.clone());

        session.start().unwrap();
        session.submit_image(image()).await.unwrap();
        // Collector may have finished during the reveal delay
        if session.weather().is_none() {
            assert!(handle.changed().await);
        }
        task.await.unwrap();

        let refreshed = session.refresh_on_weather_change().await;
        let phrases = search.phrases.lock().unwrap().clone();
        assert_eq!(phrases.last().map(String::as_str), Some("cafe clear sky"));
        assert_eq!(refreshed, phrases.len() == 2);
        assert!(!session.refresh_on_weather_change().await);

        let view = session.result_view().await;
        assert_eq!(view.title, "Sunny cafe Flow");
        assert_eq!(view.location_label.as_deref(), Some("Current Location"));
        assert_eq!(view.temperature, Some(14));
        assert!(session.progress().weather_checked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_clears_results_and_stops_preview() {
        let pauses = Arc::new(AtomicUsize::new(0));
        let (session, _search) = session(Some(&["neon"]), WeatherHandle::absent());
        let factory_pauses = pauses.clone();
        let mut session =
            session.with_player(Box::new(move || -> Box<dyn PreviewPlayer> {
                Box::new(CountingPlayer(factory_pauses.clone()))
            }));

        session.start().unwrap();
        session.submit_image(image()).await.unwrap();

        let view = session.result_view().await;
        assert_eq!(session.toggle_preview(11, &view).unwrap(), Some(11));
        assert!(session.toggle_preview(99, &view).is_err());
        assert_eq!(session.playback().and_then(|p| p.playing()), Some(11));

        session.restart().await.unwrap();

        assert_eq!(session.state(), ViewState::Home);
        assert_eq!(pauses.load(Ordering::SeqCst), 1);
        assert!(session.playback().is_none());
        assert_eq!(session.result_view().await, ResultView::default());
        assert_eq!(session.progress(), AnalyzingProgress::default());
    }

    #[tokio::test]
    async fn test_preview_end_clears_playing_track() {
        let pauses = Arc::new(AtomicUsize::new(0));
        let (session, _search) = session(Some(&["neon"]), WeatherHandle::absent());
        let factory_pauses = pauses.clone();
        let mut session = session
            .with_reveal_delay(Duration::ZERO)
            .with_player(Box::new(move || -> Box<dyn PreviewPlayer> {
                Box::new(CountingPlayer(factory_pauses.clone()))
            }));

        session.start().unwrap();
        session.submit_image(image()).await.unwrap();
        let view = session.result_view().await;
        assert_eq!(session.toggle_preview(11, &view).unwrap(), Some(11));

        // A stale end report for another track changes nothing
        session.preview_ended(12);
        assert_eq!(session.playback().and_then(|p| p.playing()), Some(11));

        session.preview_ended(11);
        assert_eq!(session.playback().and_then(|p| p.playing()), None);

        // Next toggle starts the track again rather than pausing it
        assert_eq!(session.toggle_preview(11, &view).unwrap(), Some(11));
        assert_eq!(pauses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_action_keeps_state() {
        let (mut session, _search) = session(Some(&["neon"]), WeatherHandle::absent());

        assert!(matches!(
            session.submit_image(image()).await,
            Err(ClientError::InvalidTransition { .. })
        ));
        assert!(session.restart().await.is_err());
        assert_eq!(session.state(), ViewState::Home);
    }

    #[tokio::test]
    async fn test_preview_without_player() {
        let (mut session, _search) = session(Some(&["neon"]), WeatherHandle::absent());
        session = session.with_reveal_delay(Duration::ZERO);
        session.start().unwrap();
        session.submit_image(image()).await.unwrap();

        let view = session.result_view().await;
        assert!(matches!(
            session.toggle_preview(11, &view),
            Err(ClientError::Playback(_))
        ));
    }
}
