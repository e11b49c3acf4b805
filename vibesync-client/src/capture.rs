//! Capture Controller
//!
//! Produces exactly one `CapturedImage` per user action, either from a
//! camera frame or from an uploaded file. Images travel as base64 data URIs.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info};

use crate::error::{ClientError, Result};

/// A single encoded photo, as a `data:<mime>;base64,<payload>` URI
///
/// Never empty: every constructor rejects an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    data_uri: String,
}

impl CapturedImage {
    /// Encode raw image bytes, sniffing the MIME type from the content
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ClientError::Capture("image is empty".to_string()));
        }
        let kind = infer::get(bytes)
            .filter(|k| k.matcher_type() == infer::MatcherType::Image)
            .ok_or_else(|| ClientError::Capture("file is not a recognized image".to_string()))?;

        Ok(Self {
            data_uri: format!("data:{};base64,{}", kind.mime_type(), STANDARD.encode(bytes)),
        })
    }

    /// Wrap an already-encoded data URI (e.g. a camera screenshot)
    pub fn from_data_uri(data_uri: impl Into<String>) -> Result<Self> {
        let data_uri = data_uri.into();
        let payload = data_uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload);

        match payload {
            Some(p) if !p.is_empty() => Ok(Self { data_uri }),
            _ => Err(ClientError::Capture("not a base64 data URI".to_string())),
        }
    }

    pub fn as_data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn mime_type(&self) -> &str {
        self.data_uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or_default()
    }

    /// Length of the data URI in bytes
    pub fn encoded_len(&self) -> usize {
        self.data_uri.len()
    }
}

/// Which camera the viewfinder uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    User,
    #[default]
    Environment,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }
}

/// A live camera surface
pub trait Camera: Send {
    /// Grab the current frame as encoded image bytes
    ///
    /// `None` when no frame is available yet.
    fn screenshot(&mut self, facing: FacingMode) -> Option<Vec<u8>>;
}

/// Camera/file-input surface
pub struct CaptureController {
    camera: Option<Box<dyn Camera>>,
    facing: FacingMode,
}

impl CaptureController {
    /// `camera: None` means media capture is unavailable; uploads still work
    pub fn new(camera: Option<Box<dyn Camera>>) -> Self {
        Self {
            camera,
            facing: FacingMode::default(),
        }
    }

    /// Upload-only controller
    pub fn uploads_only() -> Self {
        Self::new(None)
    }

    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn toggle_facing(&mut self) -> FacingMode {
        self.facing = self.facing.toggled();
        debug!(facing = ?self.facing, "Camera facing toggled");
        self.facing
    }

    /// Camera lost (permission revoked, device unplugged)
    pub fn camera_failed(&mut self) {
        if self.camera.take().is_some() {
            info!("Camera unavailable, falling back to uploads");
        }
    }

    /// Shutter press
    ///
    /// `Ok(None)` when the camera had no frame to give.
    pub fn capture(&mut self) -> Result<Option<CapturedImage>> {
        let facing = self.facing;
        let camera = self
            .camera
            .as_mut()
            .ok_or_else(|| ClientError::Capture("no camera available".to_string()))?;

        match camera.screenshot(facing) {
            Some(frame) => CapturedImage::from_bytes(&frame).map(Some),
            None => {
                debug!("Camera returned no frame");
                Ok(None)
            }
        }
    }

    /// Gallery/upload input
    pub fn upload_bytes(&self, bytes: &[u8]) -> Result<CapturedImage> {
        CapturedImage::from_bytes(bytes)
    }

    /// Upload from a file on disk
    pub async fn upload_file(&self, path: &Path) -> Result<CapturedImage> {
        let bytes = tokio::fs::read(path).await?;
        let image = CapturedImage::from_bytes(&bytes)?;
        info!(
            path = %path.display(),
            mime_type = %image.mime_type(),
            bytes = bytes.len(),
            "Image loaded"
        );
        Ok(image)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// PNG and JPEG signatures, enough for content sniffing
    pub(crate) const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    pub(crate) const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    /// Yields `frame` only while pointed the `facing` way
    struct FakeCamera {
        frame: Option<Vec<u8>>,
        facing: FacingMode,
    }

    impl Camera for FakeCamera {
        fn screenshot(&mut self, facing: FacingMode) -> Option<Vec<u8>> {
            if facing == self.facing {
                self.frame.clone()
            } else {
                None
            }
        }
    }

    #[test]
    fn test_png_bytes_become_data_uri() {
        let image = CapturedImage::from_bytes(PNG_BYTES).unwrap();
        assert!(image.as_data_uri().starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(image.mime_type(), "image/png");
    }

    #[test]
    fn test_text_file_rejected() {
        let err = CapturedImage::from_bytes(b"hello world").unwrap_err();
        assert!(matches!(err, ClientError::Capture(_)));
    }

    #[test]
    fn test_empty_bytes_rejected() {
        assert!(CapturedImage::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_data_uri_validation() {
        assert!(CapturedImage::from_data_uri("data:image/jpeg;base64,/9j/").is_ok());
        assert!(CapturedImage::from_data_uri("data:image/jpeg;base64,").is_err());
        assert!(CapturedImage::from_data_uri("/9j/4AAQ").is_err());
    }

    #[test]
    fn test_capture_uses_current_facing() {
        let mut controller = CaptureController::new(Some(Box::new(FakeCamera {
            frame: Some(JPEG_BYTES.to_vec()),
            facing: FacingMode::User,
        })));
        assert_eq!(controller.facing(), FacingMode::Environment);
        assert!(controller.capture().unwrap().is_none());

        assert_eq!(controller.toggle_facing(), FacingMode::User);

        let image = controller.capture().unwrap().unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_capture_without_frame_is_none() {
        let mut controller = CaptureController::new(Some(Box::new(FakeCamera {
            frame: None,
            facing: FacingMode::Environment,
        })));
        assert!(controller.capture().unwrap().is_none());
    }

    #[test]
    fn test_camera_failure_falls_back_to_uploads() {
        let mut controller = CaptureController::new(Some(Box::new(FakeCamera {
            frame: None,
            facing: FacingMode::Environment,
        })));
        controller.camera_failed();

        assert!(!controller.has_camera());
        assert!(controller.capture().is_err());
        assert!(controller.upload_bytes(PNG_BYTES).is_ok());
    }

    #[tokio::test]
    async fn test_upload_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, JPEG_BYTES).unwrap();

        let image = CaptureController::uploads_only().upload_file(&path).await.unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let err = CaptureController::uploads_only()
            .upload_file(Path::new("/definitely/not/here.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
