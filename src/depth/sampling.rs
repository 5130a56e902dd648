//! Sample constellations for depth variability estimation
//!
//! Positions are expressed relative to the depth map extent so one
//! constellation works for every depth resolution.

use super::DepthSource;
use crate::assert_invariant;
use crate::errors::CaptureError;
use serde::{Deserialize, Serialize};

/// Weight of the center sample in the canonical constellation
pub const CENTER_WEIGHT: f32 = 3.0;

/// Weight of each quadrant midpoint in the canonical constellation
pub const QUADRANT_WEIGHT: f32 = 1.0;

const CANONICAL: [WeightedSample; 5] = [
    WeightedSample {
        relative_x: 0.5,
        relative_y: 0.5,
        weight: CENTER_WEIGHT,
    },
    WeightedSample {
        relative_x: 0.25,
        relative_y: 0.25,
        weight: QUADRANT_WEIGHT,
    },
    WeightedSample {
        relative_x: 0.75,
        relative_y: 0.25,
        weight: QUADRANT_WEIGHT,
    },
    WeightedSample {
        relative_x: 0.25,
        relative_y: 0.75,
        weight: QUADRANT_WEIGHT,
    },
    WeightedSample {
        relative_x: 0.75,
        relative_y: 0.75,
        weight: QUADRANT_WEIGHT,
    },
];

/// Where to sample, as a fraction of the map extent, and how much it counts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedSample {
    pub relative_x: f32,
    pub relative_y: f32,
    pub weight: f32,
}

impl WeightedSample {
    pub fn new(relative_x: f32, relative_y: f32, weight: f32) -> Result<Self, CaptureError> {
        let sample = Self {
            relative_x,
            relative_y,
            weight,
        };
        sample.validate()?;
        Ok(sample)
    }

    fn validate(&self) -> Result<(), CaptureError> {
        if !(0.0..=1.0).contains(&self.relative_x) || !(0.0..=1.0).contains(&self.relative_y) {
            return Err(CaptureError::InvalidSampleSet(format!(
                "relative position ({}, {}) must lie within [0, 1]",
                self.relative_x, self.relative_y
            )));
        }
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(CaptureError::InvalidSampleSet(format!(
                "weight must be finite and positive, got {}",
                self.weight
            )));
        }
        Ok(())
    }

    /// Resolve to a pixel coordinate inside a `width` x `height` map.
    ///
    /// The relative product is truncated toward zero, then clamped onto the
    /// last row/column. Requires a non-empty map.
    pub fn resolve(&self, width: u32, height: u32) -> (u32, u32) {
        let x = axis_coordinate(self.relative_x, width);
        let y = axis_coordinate(self.relative_y, height);

        assert_invariant!(
            x < width && y < height,
            "Resolved sample lies inside the depth map",
            "depth::sampling"
        );

        (x, y)
    }
}

fn axis_coordinate(relative: f32, extent: u32) -> u32 {
    let last = extent.saturating_sub(1);
    // Float-to-int `as` truncates toward zero and saturates.
    let raw = (relative * extent as f32) as u32;
    raw.min(last)
}

/// A depth value read at a resolved sample position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSample {
    pub x: u32,
    pub y: u32,
    pub depth: f32,
    pub weight: f32,
}

/// Validated, non-empty set of weighted samples
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSet {
    samples: Vec<WeightedSample>,
}

impl SampleSet {
    /// Center plus the four quadrant midpoints, center weighted 3:1
    pub fn canonical() -> Self {
        Self {
            samples: CANONICAL.to_vec(),
        }
    }

    pub fn new(samples: Vec<WeightedSample>) -> Result<Self, CaptureError> {
        if samples.is_empty() {
            return Err(CaptureError::InvalidSampleSet(
                "at least one sample is required".to_string(),
            ));
        }
        for sample in &samples {
            sample.validate()?;
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[WeightedSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn total_weight(&self) -> f32 {
        self.samples.iter().map(|s| s.weight).sum()
    }

    /// Nearest-pixel read of every sample; empty for zero-area maps
    pub fn sample<D: DepthSource + ?Sized>(&self, depth: &D) -> Vec<ResolvedSample> {
        if depth.is_empty() {
            return Vec::new();
        }

        let (width, height) = (depth.width(), depth.height());
        self.samples
            .iter()
            .map(|sample| {
                let (x, y) = sample.resolve(width, height);
                ResolvedSample {
                    x,
                    y,
                    depth: depth.depth_at(x, y),
                    weight: sample.weight,
                }
            })
            .collect()
    }
}

impl Default for SampleSet {
    fn default() -> Self {
        Self::canonical()
    }
}
