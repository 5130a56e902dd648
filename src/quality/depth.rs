use crate::config::DepthConfig;
use crate::depth::{estimate_variability, DepthSource, DepthVariability, UnavailableReason};
use serde::{Deserialize, Serialize};

/// Coarse classification of how much depth a scene has near the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneDepthLevel {
    /// Near-planar, e.g. a document or wall
    Flat,
    Moderate,
    /// Strong depth separation around the subject
    Deep,
    /// No statistic available
    Unknown,
}

impl SceneDepthLevel {
    pub fn from_variability(variability: f32, flat_threshold: f32, deep_threshold: f32) -> Self {
        if variability <= flat_threshold {
            SceneDepthLevel::Flat
        } else if variability >= deep_threshold {
            SceneDepthLevel::Deep
        } else {
            SceneDepthLevel::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneDepthLevel::Flat => "flat",
            SceneDepthLevel::Moderate => "moderate",
            SceneDepthLevel::Deep => "deep",
            SceneDepthLevel::Unknown => "unknown",
        }
    }
}

/// Depth quality assessment for one capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthQualityReport {
    pub level: SceneDepthLevel,
    pub variability: Option<f32>,
    pub unavailable_reason: Option<UnavailableReason>,
}

/// Classifies depth variability against configured thresholds
#[derive(Debug, Clone)]
pub struct DepthQualityAnalyzer {
    flat_threshold: f32,
    deep_threshold: f32,
}

impl DepthQualityAnalyzer {
    pub fn new(flat_threshold: f32, deep_threshold: f32) -> Self {
        Self {
            flat_threshold,
            deep_threshold,
        }
    }

    pub fn from_config(config: &DepthConfig) -> Self {
        Self::new(config.flat_scene_threshold, config.deep_scene_threshold)
    }

    pub fn classify(&self, variability: DepthVariability) -> DepthQualityReport {
        match variability {
            DepthVariability::Measured(value) => DepthQualityReport {
                level: SceneDepthLevel::from_variability(
                    value,
                    self.flat_threshold,
                    self.deep_threshold,
                ),
                variability: Some(value),
                unavailable_reason: None,
            },
            DepthVariability::Unavailable(reason) => DepthQualityReport {
                level: SceneDepthLevel::Unknown,
                variability: None,
                unavailable_reason: Some(reason),
            },
        }
    }

    /// Estimate variability with the canonical constellation and classify it
    pub fn analyze<D: DepthSource + ?Sized>(&self, depth: Option<&D>) -> DepthQualityReport {
        let report = self.classify(estimate_variability(depth));
        log::debug!(
            "Scene depth classified as {} ({:?})",
            report.level.as_str(),
            report.variability
        );
        report
    }
}

impl Default for DepthQualityAnalyzer {
    fn default() -> Self {
        Self::from_config(&DepthConfig::default())
    }
}
