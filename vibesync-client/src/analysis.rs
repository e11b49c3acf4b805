//! Analysis Requestor
//!
//! One tagging request per captured image. Every failure collapses into an
//! empty `TagSet`, which the sequencer treats as a failed analysis.

use std::sync::Arc;

use tracing::{info, warn};
use vibesync_common::TagSet;

use crate::backend::TaggingService;
use crate::capture::CapturedImage;

#[derive(Clone)]
pub struct AnalysisRequestor {
    service: Arc<dyn TaggingService>,
}

impl AnalysisRequestor {
    pub fn new(service: Arc<dyn TaggingService>) -> Self {
        Self { service }
    }

    /// Send the image once, no retry
    pub async fn request(&self, image: &CapturedImage) -> TagSet {
        match self.service.analyze(image).await {
            Ok(tags) => {
                info!(count = tags.len(), tags = ?tags.as_slice(), "Scene analyzed");
                tags
            }
            Err(e) => {
                warn!(error = %e, "Image analysis failed");
                TagSet::empty()
            }
        }
    }
}
