use super::handle::{self, CaptureCompletion, PendingCapture};
use super::CapturedPhoto;
use crate::config::CrabShotConfig;
use crate::depth::estimate_variability;
use crate::errors::CaptureError;
use crate::orientation::{
    interpret, orientation_from_image_bytes, orientation_from_metadata, ExifOrientation,
};
use crate::types::PhotoCaptureResult;
use image::ImageReader;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

/// Turns finished captures into [`PhotoCaptureResult`]s
#[derive(Debug, Clone, Default)]
pub struct PhotoProcessor {
    config: CrabShotConfig,
}

impl PhotoProcessor {
    pub fn new(config: CrabShotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrabShotConfig {
        &self.config
    }

    /// Process a finished capture
    pub fn process<P: CapturedPhoto + ?Sized>(
        &self,
        photo: &P,
    ) -> Result<PhotoCaptureResult, CaptureError> {
        let data = photo.file_data().ok_or_else(|| {
            CaptureError::MissingPhotoData("capture produced no file representation".to_string())
        })?;

        // Resolve everything that can fail before touching storage, so a
        // rejected capture never leaves a file behind.
        let (width, height) = match photo.dimensions() {
            Some(dimensions) => dimensions,
            None => decode_dimensions(&data)?,
        };

        let metadata = photo.metadata().clone();
        let code = orientation_from_metadata(&metadata, &self.config.capture.orientation_key)
            .or_else(|| orientation_from_image_bytes(&data).map(|o| o.code()))
            .unwrap_or_else(|| ExifOrientation::default().code());
        let orientation = interpret(code);

        let depth_variance = if self.config.depth.enabled {
            estimate_variability(photo.depth_map()).value()
        } else {
            None
        };

        let is_raw = photo.is_raw_photo();
        let path = self.write_photo(&data, is_raw)?;

        log::info!(
            "Processed capture {:?}: {}x{}, {} mirrored={}, depth_variance={:?}",
            path,
            width,
            height,
            orientation.rotation,
            orientation.is_mirrored,
            depth_variance
        );

        Ok(PhotoCaptureResult {
            path,
            width,
            height,
            is_raw_photo: is_raw,
            metadata,
            orientation: orientation.rotation,
            is_mirrored: orientation.is_mirrored,
            depth_variance,
        })
    }

    /// Process on the blocking pool to keep file I/O off the async runtime
    pub async fn process_async<P>(
        self: Arc<Self>,
        photo: P,
    ) -> Result<PhotoCaptureResult, CaptureError>
    where
        P: CapturedPhoto + Send + 'static,
    {
        tokio::task::spawn_blocking(move || self.process(&photo))
            .await
            .map_err(|e| {
                log::error!("Capture processing task failed: {}", e);
                if e.is_cancelled() {
                    CaptureError::Cancelled
                } else {
                    CaptureError::ProcessingPanicked(e.to_string())
                }
            })?
    }

    /// Start tracking one capture.
    ///
    /// The completion half goes to the framework callback; the caller awaits
    /// the pending half. Dropping the completion unused cancels the capture.
    pub fn begin_capture(self: &Arc<Self>) -> (CaptureCompletion, PendingCapture) {
        handle::channel(Arc::clone(self))
    }

    fn write_photo(&self, data: &[u8], is_raw: bool) -> Result<PathBuf, CaptureError> {
        let capture = &self.config.capture;
        fs::create_dir_all(&capture.output_directory)?;

        let extension = if is_raw {
            &capture.raw_file_extension
        } else {
            &capture.file_extension
        };
        let file_name = format!("{}-{}.{}", capture.file_prefix, uuid::Uuid::new_v4(), extension);
        let path = capture.output_directory.join(file_name);

        fs::write(&path, data)?;
        log::debug!("Wrote {} bytes to {:?}", data.len(), path);
        Ok(path)
    }
}

fn decode_dimensions(data: &[u8]) -> Result<(u32, u32), CaptureError> {
    let dimensions = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(dimensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CapturedPhotoData;
    use crate::depth::DepthMap;
    use crate::testing::synthetic_jpeg;
    use serde_json::json;
    use tempfile::tempdir;

    fn processor_in(dir: &std::path::Path) -> PhotoProcessor {
        let mut config = CrabShotConfig::default();
        config.capture.output_directory = dir.to_path_buf();
        PhotoProcessor::new(config)
    }

    #[test]
    fn test_missing_file_data_is_an_error() {
        let dir = tempdir().unwrap();
        let err = processor_in(dir.path())
            .process(&CapturedPhotoData::default())
            .unwrap_err();
        assert!(matches!(err, CaptureError::MissingPhotoData(_)));
    }

    #[test]
    fn test_undecodable_photo_without_dimensions_fails() {
        let dir = tempdir().unwrap();
        let photo = CapturedPhotoData::new(&b"garbage"[..]);
        let err = processor_in(dir.path()).process(&photo).unwrap_err();
        assert!(matches!(err, CaptureError::Decode(_)));

        // Rejected captures leave storage untouched
        let written = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(written, 0);
    }

    struct PanickingPhoto;

    impl CapturedPhoto for PanickingPhoto {
        fn file_data(&self) -> Option<bytes::Bytes> {
            panic!("framework handed over a corrupt buffer");
        }

        fn metadata(&self) -> &crate::types::Metadata {
            unreachable!()
        }

        fn depth_map(&self) -> Option<&DepthMap> {
            None
        }

        fn is_raw_photo(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_process_async_reports_panic_separately_from_cancel() {
        let dir = tempdir().unwrap();
        let processor = Arc::new(processor_in(dir.path()));

        let err = processor.process_async(PanickingPhoto).await.unwrap_err();
        assert!(matches!(err, CaptureError::ProcessingPanicked(_)));
        assert!(!matches!(err, CaptureError::Cancelled));
    }

    #[test]
    fn test_raw_photo_uses_raw_extension() {
        let dir = tempdir().unwrap();
        let photo = CapturedPhotoData::new(&b"raw sensor bytes"[..])
            .with_dimensions(4032, 3024)
            .raw();
        let result = processor_in(dir.path()).process(&photo).unwrap();
        assert!(result.is_raw_photo);
        assert_eq!(result.path.extension().unwrap(), "dng");
        assert_eq!((result.width, result.height), (4032, 3024));
    }

    #[test]
    fn test_depth_disabled_omits_variance() {
        let dir = tempdir().unwrap();
        let mut processor = processor_in(dir.path());
        processor.config.depth.enabled = false;

        let photo = CapturedPhotoData::new(synthetic_jpeg(16, 16))
            .with_depth_map(DepthMap::filled(8, 8, 1.0));
        let result = processor.process(&photo).unwrap();
        assert_eq!(result.depth_variance, None);
    }

    #[test]
    fn test_metadata_orientation_wins() {
        let dir = tempdir().unwrap();
        let metadata = json!({ "Orientation": 7 }).as_object().unwrap().clone();
        let photo = CapturedPhotoData::new(synthetic_jpeg(16, 8)).with_metadata(metadata);
        let result = processor_in(dir.path()).process(&photo).unwrap();
        assert_eq!(result.orientation.as_str(), "landscape-right");
        assert!(result.is_mirrored);
        assert_eq!((result.width, result.height), (16, 8));
    }
}
