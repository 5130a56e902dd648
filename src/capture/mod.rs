/// Capture completion pipeline
///
/// Takes a finished photo from the camera framework, writes it to storage
/// and shapes the result object returned to the application:
/// 1. Resolve dimensions and EXIF orientation
/// 2. Estimate depth variability when depth data is attached
/// 3. Persist the encoded photo under a unique file name
pub mod handle;
pub mod processor;

pub use handle::{CaptureCompletion, PendingCapture};
pub use processor::PhotoProcessor;

use crate::depth::DepthMap;
use crate::types::Metadata;
use bytes::Bytes;

/// A finished capture as delivered by the camera framework
pub trait CapturedPhoto {
    /// Encoded file representation of the photo, if the framework produced one
    fn file_data(&self) -> Option<Bytes>;

    fn metadata(&self) -> &Metadata;

    /// Single-channel float depth map attached to the capture
    fn depth_map(&self) -> Option<&DepthMap>;

    fn is_raw_photo(&self) -> bool;

    /// Pixel dimensions when the framework already knows them
    fn dimensions(&self) -> Option<(u32, u32)> {
        None
    }
}

/// Owned capture payload
#[derive(Debug, Clone, Default)]
pub struct CapturedPhotoData {
    pub data: Option<Bytes>,
    pub metadata: Metadata,
    pub depth: Option<DepthMap>,
    pub is_raw: bool,
    pub dimensions: Option<(u32, u32)>,
}

impl CapturedPhotoData {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_depth_map(mut self, depth: DepthMap) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    pub fn raw(mut self) -> Self {
        self.is_raw = true;
        self
    }
}

impl CapturedPhoto for CapturedPhotoData {
    fn file_data(&self) -> Option<Bytes> {
        self.data.clone()
    }

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn depth_map(&self) -> Option<&DepthMap> {
        self.depth.as_ref()
    }

    fn is_raw_photo(&self) -> bool {
        self.is_raw
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }
}
