//! EXIF orientation normalization
//!
//! Maps the 8-value EXIF orientation tag to one of four display rotation
//! classes plus a mirroring flag. Unrecognized codes fall back to portrait,
//! unmirrored; interpretation never fails.

use crate::types::Metadata;
use image::metadata::Orientation;
use image::{ImageDecoder, ImageReader};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Cursor;

/// Metadata dictionary key carrying the orientation tag
pub const ORIENTATION_KEY: &str = "Orientation";

/// Nested dictionary some capture pipelines store TIFF tags under
pub const TIFF_DICTIONARY_KEY: &str = "{TIFF}";

/// Canonical EXIF orientation tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExifOrientation {
    Up,
    UpMirrored,
    Down,
    DownMirrored,
    LeftMirrored,
    Right,
    RightMirrored,
    Left,
}

impl ExifOrientation {
    pub const ALL: [ExifOrientation; 8] = [
        ExifOrientation::Up,
        ExifOrientation::UpMirrored,
        ExifOrientation::Down,
        ExifOrientation::DownMirrored,
        ExifOrientation::LeftMirrored,
        ExifOrientation::Right,
        ExifOrientation::RightMirrored,
        ExifOrientation::Left,
    ];

    /// Parse a raw tag value, `None` for anything outside 1-8
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(ExifOrientation::Up),
            2 => Some(ExifOrientation::UpMirrored),
            3 => Some(ExifOrientation::Down),
            4 => Some(ExifOrientation::DownMirrored),
            5 => Some(ExifOrientation::LeftMirrored),
            6 => Some(ExifOrientation::Right),
            7 => Some(ExifOrientation::RightMirrored),
            8 => Some(ExifOrientation::Left),
            _ => None,
        }
    }

    /// Raw EXIF tag value
    pub fn code(&self) -> i64 {
        match self {
            ExifOrientation::Up => 1,
            ExifOrientation::UpMirrored => 2,
            ExifOrientation::Down => 3,
            ExifOrientation::DownMirrored => 4,
            ExifOrientation::LeftMirrored => 5,
            ExifOrientation::Right => 6,
            ExifOrientation::RightMirrored => 7,
            ExifOrientation::Left => 8,
        }
    }

    pub fn rotation(&self) -> RotationClass {
        match self {
            ExifOrientation::Up | ExifOrientation::UpMirrored => RotationClass::Portrait,
            ExifOrientation::Down | ExifOrientation::DownMirrored => {
                RotationClass::PortraitUpsideDown
            }
            ExifOrientation::Left | ExifOrientation::LeftMirrored => RotationClass::LandscapeLeft,
            ExifOrientation::Right | ExifOrientation::RightMirrored => {
                RotationClass::LandscapeRight
            }
        }
    }

    pub fn is_mirrored(&self) -> bool {
        matches!(
            self,
            ExifOrientation::UpMirrored
                | ExifOrientation::DownMirrored
                | ExifOrientation::LeftMirrored
                | ExifOrientation::RightMirrored
        )
    }
}

impl Default for ExifOrientation {
    fn default() -> Self {
        ExifOrientation::Up
    }
}

impl From<Orientation> for ExifOrientation {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::NoTransforms => ExifOrientation::Up,
            Orientation::FlipHorizontal => ExifOrientation::UpMirrored,
            Orientation::Rotate180 => ExifOrientation::Down,
            Orientation::FlipVertical => ExifOrientation::DownMirrored,
            Orientation::Rotate90FlipH => ExifOrientation::LeftMirrored,
            Orientation::Rotate90 => ExifOrientation::Right,
            Orientation::Rotate270FlipH => ExifOrientation::RightMirrored,
            Orientation::Rotate270 => ExifOrientation::Left,
        }
    }
}

/// Display rotation of a captured photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationClass {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl RotationClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotationClass::Portrait => "portrait",
            RotationClass::PortraitUpsideDown => "portrait-upside-down",
            RotationClass::LandscapeLeft => "landscape-left",
            RotationClass::LandscapeRight => "landscape-right",
        }
    }
}

impl std::fmt::Display for RotationClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of interpreting an orientation tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationInfo {
    pub rotation: RotationClass,
    pub is_mirrored: bool,
}

impl From<ExifOrientation> for OrientationInfo {
    fn from(orientation: ExifOrientation) -> Self {
        Self {
            rotation: orientation.rotation(),
            is_mirrored: orientation.is_mirrored(),
        }
    }
}

impl Default for OrientationInfo {
    fn default() -> Self {
        ExifOrientation::default().into()
    }
}

/// Interpret a raw EXIF orientation code.
///
/// Total over all inputs: codes outside 1-8 yield `(Portrait, false)`.
pub fn interpret(code: i64) -> OrientationInfo {
    match ExifOrientation::from_code(code) {
        Some(orientation) => orientation.into(),
        None => {
            log::debug!("Unrecognized orientation code {}, defaulting to portrait", code);
            OrientationInfo::default()
        }
    }
}

/// Read the orientation tag from a capture metadata dictionary.
///
/// Looks at `key` at the top level first, then inside the `{TIFF}`
/// dictionary. Integer and numeric-string values are accepted.
pub fn orientation_from_metadata(metadata: &Metadata, key: &str) -> Option<i64> {
    if let Some(code) = metadata.get(key).and_then(numeric_value) {
        return Some(code);
    }

    metadata
        .get(TIFF_DICTIONARY_KEY)
        .and_then(Value::as_object)
        .and_then(|tiff| tiff.get(key))
        .and_then(numeric_value)
}

fn numeric_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read the EXIF orientation embedded in an encoded photo
pub fn orientation_from_image_bytes(bytes: &[u8]) -> Option<ExifOrientation> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;

    match reader.into_decoder() {
        Ok(mut decoder) => decoder.orientation().ok().map(ExifOrientation::from),
        Err(e) => {
            log::debug!("Could not open decoder for orientation lookup: {}", e);
            None
        }
    }
}
