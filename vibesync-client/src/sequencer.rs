//! View Sequencer
//!
//! Four-state presentation state machine deciding which view is mounted.
//!
//! ```text
//!   home --start--> capture --imageProduced--> analyzing --analysisSucceeded--> result
//!    ^                |  ^                          |                              |
//!    +------back------+  +------analysisFailed------+                              |
//!    +------------------------------restart-------------------------------------+
//! ```
//!
//! The sequencer is pure: `apply` changes state and returns the side effect
//! the caller must run. `VibeSession` is the async driver that runs them.

use std::fmt;

use tracing::debug;
use vibesync_common::TagSet;

use crate::capture::CapturedImage;
use crate::error::{ClientError, Result};

/// Which view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Home,
    Capture,
    Analyzing,
    Result,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewState::Home => "home",
            ViewState::Capture => "capture",
            ViewState::Analyzing => "analyzing",
            ViewState::Result => "result",
        };
        f.write_str(name)
    }
}

/// User actions and request outcomes driving the view
#[derive(Debug, Clone)]
pub enum ViewEvent {
    Start,
    Back,
    ImageProduced(CapturedImage),
    AnalysisSucceeded(TagSet),
    AnalysisFailed,
    Restart,
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::Start => "start",
            ViewEvent::Back => "back",
            ViewEvent::ImageProduced(_) => "imageProduced",
            ViewEvent::AnalysisSucceeded(_) => "analysisSucceeded",
            ViewEvent::AnalysisFailed => "analysisFailed",
            ViewEvent::Restart => "restart",
        }
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Entered `analyzing`: send the image to the tagging proxy
    RequestAnalysis(CapturedImage),
    /// Entered `result`: search music for these tags
    ComposeResults(TagSet),
    /// Left `result`: drop tracks and stop playback
    ClearResults,
}

/// Owns the current view plus the image and tags of the current cycle
#[derive(Debug, Default)]
pub struct ViewSequencer {
    state: ViewState,
    image: Option<CapturedImage>,
    tags: TagSet,
}

impl ViewSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn image(&self) -> Option<&CapturedImage> {
        self.image.as_ref()
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Apply an event
    ///
    /// Events not valid in the current state are rejected with
    /// `InvalidTransition` and leave the state untouched. An analysis that
    /// produced no tags counts as a failure.
    pub fn apply(&mut self, event: ViewEvent) -> Result<Option<Effect>> {
        let from = self.state;
        let event_name = event.name();

        let effect = match (from, event) {
            (ViewState::Home, ViewEvent::Start) => {
                self.state = ViewState::Capture;
                None
            }
            (ViewState::Capture, ViewEvent::Back) => {
                self.state = ViewState::Home;
                None
            }
            (ViewState::Capture, ViewEvent::ImageProduced(image)) => {
                self.image = Some(image.clone());
                self.tags = TagSet::empty();
                self.state = ViewState::Analyzing;
                Some(Effect::RequestAnalysis(image))
            }
            (ViewState::Analyzing, ViewEvent::AnalysisSucceeded(tags)) if !tags.is_empty() => {
                self.tags = tags.clone();
                self.state = ViewState::Result;
                Some(Effect::ComposeResults(tags))
            }
            (ViewState::Analyzing, ViewEvent::AnalysisSucceeded(_))
            | (ViewState::Analyzing, ViewEvent::AnalysisFailed) => {
                self.image = None;
                self.tags = TagSet::empty();
                self.state = ViewState::Capture;
                None
            }
            (ViewState::Result, ViewEvent::Restart) => {
                self.image = None;
                self.tags = TagSet::empty();
                self.state = ViewState::Home;
                Some(Effect::ClearResults)
            }
            (state, _) => {
                return Err(ClientError::InvalidTransition {
                    state,
                    event: event_name,
                })
            }
        };

        debug!(from = %from, to = %self.state, event = event_name, "View transition");
        Ok(effect)
    }
}
