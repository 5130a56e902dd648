use crate::orientation::{OrientationInfo, RotationClass};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Capture metadata dictionary as delivered by the camera framework
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Result object handed back to the application layer for one capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCaptureResult {
    /// Location of the written photo file
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub is_raw_photo: bool,
    pub metadata: Metadata,
    pub orientation: RotationClass,
    pub is_mirrored: bool,
    /// Weighted depth standard deviation; omitted entirely when no
    /// statistic could be computed
    #[serde(
        rename = "depth_variance",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub depth_variance: Option<f32>,
}

impl PhotoCaptureResult {
    pub fn orientation_info(&self) -> OrientationInfo {
        OrientationInfo {
            rotation: self.orientation,
            is_mirrored: self.is_mirrored,
        }
    }

    /// Serialize into the JSON shape consumed by the application layer
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result(depth_variance: Option<f32>) -> PhotoCaptureResult {
        PhotoCaptureResult {
            path: PathBuf::from("/tmp/photo.jpg"),
            width: 640,
            height: 480,
            is_raw_photo: false,
            metadata: Metadata::new(),
            orientation: RotationClass::LandscapeRight,
            is_mirrored: true,
            depth_variance,
        }
    }

    #[test]
    fn test_depth_variance_key_omitted_when_absent() {
        let json = sample_result(None).to_json();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("depth_variance"));
        assert_eq!(object["orientation"], "landscape-right");
        assert_eq!(object["isMirrored"], true);
        assert_eq!(object["isRawPhoto"], false);
    }

    #[test]
    fn test_depth_variance_key_present_when_measured() {
        let json = sample_result(Some(0.0)).to_json();
        assert_eq!(json["depth_variance"], 0.0);
    }
}
