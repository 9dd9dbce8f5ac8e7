//! Tunable thresholds for the classification rule table.
//!
//! The balanced defaults suit indoor walls at phone-camera exposure. The
//! strict and lenient presets trade placement latency against false
//! positives without changing the rules themselves.
use serde::{Deserialize, Serialize};

/// Weights of the five plane sub-scores. They are normalised to sum to one
/// before use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeights {
    pub uniformity: f32,
    pub cross_uniformity: f32,
    pub smoothness: f32,
    pub saturation: f32,
    pub brightness: f32,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            uniformity: 0.25,
            cross_uniformity: 0.2,
            smoothness: 0.25,
            saturation: 0.15,
            brightness: 0.15,
        }
    }
}

impl ConfidenceWeights {
    pub fn normalized(&self) -> Self {
        let sum = self.uniformity.max(0.0)
            + self.cross_uniformity.max(0.0)
            + self.smoothness.max(0.0)
            + self.saturation.max(0.0)
            + self.brightness.max(0.0);
        if sum <= f32::EPSILON {
            return Self {
                uniformity: 0.2,
                cross_uniformity: 0.2,
                smoothness: 0.2,
                saturation: 0.2,
                brightness: 0.2,
            };
        }
        Self {
            uniformity: self.uniformity.max(0.0) / sum,
            cross_uniformity: self.cross_uniformity.max(0.0) / sum,
            smoothness: self.smoothness.max(0.0) / sum,
            saturation: self.saturation.max(0.0) / sum,
            brightness: self.brightness.max(0.0) / sum,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPreset {
    Balanced,
    Strict,
    Lenient,
}

impl ThresholdPreset {
    pub fn thresholds(self) -> ClassifierThresholds {
        match self {
            Self::Balanced => ClassifierThresholds::balanced(),
            Self::Strict => ClassifierThresholds::strict(),
            Self::Lenient => ClassifierThresholds::lenient(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Overexposed pixel fraction that rejects the frame.
    pub overexposed_ratio: f32,
    /// Underexposed pixel fraction that rejects the frame.
    pub underexposed_ratio: f32,
    /// Brightest mean accepted as a surface (also the overexposure cut).
    pub max_brightness: f32,
    /// Darkest mean accepted as a surface (also the underexposure cut).
    pub min_brightness: f32,
    /// Confidence reported for exposure rejections.
    pub exposure_confidence: f32,
    /// `|orientation gradient|` that reads as floor or ceiling.
    pub orientation_threshold: f32,
    /// Let floor-like frames through to the plane test as `floor`.
    pub allow_floor_placement: bool,
    pub busy_strong_density: f32,
    pub busy_weak_density: f32,
    pub min_uniformity: f32,
    pub min_cross_uniformity: f32,
    pub min_smoothness: f32,
    pub max_saturation: f32,
    pub weights: ConfidenceWeights,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ClassifierThresholds {
    pub fn balanced() -> Self {
        Self {
            overexposed_ratio: 0.5,
            underexposed_ratio: 0.5,
            max_brightness: 240.0,
            min_brightness: 25.0,
            exposure_confidence: 0.05,
            orientation_threshold: 40.0,
            allow_floor_placement: false,
            busy_strong_density: 0.12,
            busy_weak_density: 0.35,
            min_uniformity: 0.6,
            min_cross_uniformity: 0.5,
            min_smoothness: 0.6,
            max_saturation: 0.35,
            weights: ConfidenceWeights::default(),
        }
    }

    /// Fewer false positives on textured or tinted surfaces.
    pub fn strict() -> Self {
        Self {
            overexposed_ratio: 0.35,
            underexposed_ratio: 0.35,
            max_brightness: 230.0,
            min_brightness: 35.0,
            orientation_threshold: 30.0,
            busy_strong_density: 0.08,
            busy_weak_density: 0.25,
            min_uniformity: 0.75,
            min_cross_uniformity: 0.65,
            min_smoothness: 0.75,
            max_saturation: 0.25,
            ..Self::balanced()
        }
    }

    /// Accepts dimmer, more textured surfaces such as painted brick.
    pub fn lenient() -> Self {
        Self {
            overexposed_ratio: 0.65,
            underexposed_ratio: 0.65,
            max_brightness: 245.0,
            min_brightness: 20.0,
            orientation_threshold: 55.0,
            busy_strong_density: 0.2,
            busy_weak_density: 0.5,
            min_uniformity: 0.45,
            min_cross_uniformity: 0.35,
            min_smoothness: 0.45,
            max_saturation: 0.5,
            ..Self::balanced()
        }
    }

    /// Centre and half-width of the accepted brightness band.
    pub(crate) fn brightness_band(&self) -> (f32, f32) {
        let mid = 0.5 * (self.min_brightness + self.max_brightness);
        let half = (0.5 * (self.max_brightness - self.min_brightness)).max(f32::EPSILON);
        (mid, half)
    }
}
