use thiserror::Error;

/// Errors surfaced by the capture completion pipeline.
///
/// The core estimators never produce these for expected outcomes: a missing
/// depth map is [`crate::depth::DepthVariability::Unavailable`] and an unknown
/// orientation code falls back to portrait.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Photo data unavailable: {0}")]
    MissingPhotoData(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid depth map: {0}")]
    InvalidDepthMap(String),
    #[error("Invalid sample set: {0}")]
    InvalidSampleSet(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Capture cancelled before completion")]
    Cancelled,
    #[error("Capture processing panicked: {0}")]
    ProcessingPanicked(String),
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::Decode(err.to_string())
    }
}
