//! Rule-based surface classification.
//!
//! [`ClassificationEngine::classify`] walks a fixed rule table over
//! [`FrameMetrics`]; the first rule that matches decides the result:
//!
//! 0. metrics not ready → `uncertain`, confidence 0
//! 1. overexposed → `overexposed`
//! 2. underexposed → `underexposed`
//! 3. strong vertical brightness gradient → `ceiling` or `floor` (the floor
//!    case is skipped when floor placement is allowed)
//! 4. dense edges → `busy`
//! 5. plane test → `wall` / `floor` with a weighted confidence
//! 6. fallback → `uncertain`, "keep moving"
//!
//! Later rules rely on earlier ones not having fired: the plane test does
//! not re-check exposure, and the busy check assumes orientation is benign.

pub mod thresholds;
pub mod types;

pub use thresholds::{ClassifierThresholds, ConfidenceWeights, ThresholdPreset};
pub use types::{Classification, Reason, SurfaceType, MAX_CONFIDENCE};

use crate::analysis::FrameMetrics;
use log::debug;

const BUSY_CONFIDENCE: f32 = 0.1;
const CEILING_CONFIDENCE: f32 = 0.1;
const FLOOR_CONFIDENCE_BASE: f32 = 0.2;
const FLOOR_CONFIDENCE_SPAN: f32 = 0.3;
const UNCERTAIN_CONFIDENCE_CAP: f32 = 0.4;

/// Stateless classifier over [`FrameMetrics`].
#[derive(Clone, Debug)]
pub struct ClassificationEngine {
    thresholds: ClassifierThresholds,
    weights: ConfidenceWeights,
}

impl Default for ClassificationEngine {
    fn default() -> Self {
        Self::new(ClassifierThresholds::default())
    }
}

impl ClassificationEngine {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        let weights = thresholds.weights.normalized();
        Self {
            thresholds,
            weights,
        }
    }

    pub fn thresholds(&self) -> &ClassifierThresholds {
        &self.thresholds
    }

    pub fn classify(&self, m: &FrameMetrics) -> Classification {
        let t = &self.thresholds;

        if !m.ready {
            return Classification::not_ready();
        }

        if m.overexposed_ratio > t.overexposed_ratio || m.brightness > t.max_brightness {
            debug!(
                "classify: overexposed ratio={:.3} b={:.1}",
                m.overexposed_ratio, m.brightness
            );
            return Classification::new(
                SurfaceType::Overexposed,
                false,
                t.exposure_confidence,
                Reason::TooBright,
            );
        }

        if m.underexposed_ratio > t.underexposed_ratio || m.brightness < t.min_brightness {
            debug!(
                "classify: underexposed ratio={:.3} b={:.1}",
                m.underexposed_ratio, m.brightness
            );
            return Classification::new(
                SurfaceType::Underexposed,
                false,
                t.exposure_confidence,
                Reason::TooDark,
            );
        }

        let g = m.orientation_gradient;
        let floor_hint = g >= t.orientation_threshold;
        if g <= -t.orientation_threshold {
            debug!("classify: ceiling gradient={:.1}", g);
            return Classification::new(
                SurfaceType::Ceiling,
                false,
                CEILING_CONFIDENCE,
                Reason::CeilingDetected,
            );
        }
        if floor_hint && !t.allow_floor_placement {
            let excess = ((g - t.orientation_threshold) / t.orientation_threshold).min(1.0);
            debug!("classify: floor gradient={:.1}", g);
            return Classification::new(
                SurfaceType::Floor,
                false,
                FLOOR_CONFIDENCE_BASE + FLOOR_CONFIDENCE_SPAN * excess,
                Reason::FloorDetected,
            );
        }

        if m.strong_edge_density > t.busy_strong_density
            || m.weak_edge_density > t.busy_weak_density
        {
            debug!(
                "classify: busy edges={:.3}/{:.3}",
                m.strong_edge_density, m.weak_edge_density
            );
            return Classification::new(SurfaceType::Busy, false, BUSY_CONFIDENCE, Reason::TooBusy);
        }

        let score = self.plane_score(m);
        let orientation_ok = g.abs() < t.orientation_threshold || floor_hint;
        if m.uniformity >= t.min_uniformity
            && m.cross_uniformity >= t.min_cross_uniformity
            && m.smoothness >= t.min_smoothness
            && m.saturation <= t.max_saturation
            && m.brightness >= t.min_brightness
            && m.brightness <= t.max_brightness
            && orientation_ok
        {
            let surface = if floor_hint {
                SurfaceType::Floor
            } else {
                SurfaceType::Wall
            };
            debug!("classify: plane {} score={:.3}", surface, score);
            return Classification::new(surface, true, score, Reason::PlaneDetected);
        }

        debug!("classify: uncertain score={:.3}", score);
        Classification::new(
            SurfaceType::Uncertain,
            false,
            (0.5 * score).min(UNCERTAIN_CONFIDENCE_CAP),
            Reason::KeepMoving,
        )
    }

    /// Weighted sum of the five normalised plane sub-scores, capped at
    /// [`MAX_CONFIDENCE`].
    fn plane_score(&self, m: &FrameMetrics) -> f32 {
        let w = &self.weights;
        let (mid, half) = self.thresholds.brightness_band();
        let off = (m.brightness - mid) / half;
        let brightness_score = (1.0 - off * off).clamp(0.0, 1.0);
        let score = w.uniformity * m.uniformity.clamp(0.0, 1.0)
            + w.cross_uniformity * m.cross_uniformity.clamp(0.0, 1.0)
            + w.smoothness * m.smoothness.clamp(0.0, 1.0)
            + w.saturation * (1.0 - m.saturation).clamp(0.0, 1.0)
            + w.brightness * brightness_score;
        score.min(MAX_CONFIDENCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(uniformity: f32, cross: f32, smooth: f32, sat: f32, brightness: f32) -> FrameMetrics {
        FrameMetrics {
            ready: true,
            uniformity,
            cross_uniformity: cross,
            smoothness: smooth,
            saturation: sat,
            brightness,
            ..FrameMetrics::not_ready()
        }
    }

    #[test]
    fn plain_wall_scenario() {
        let engine = ClassificationEngine::default();
        let c = engine.classify(&metrics(0.9, 0.8, 0.9, 0.1, 150.0));
        assert!(c.is_plane());
        assert_eq!(c.surface_type(), SurfaceType::Wall);
        assert!(c.confidence() >= 0.85, "confidence {}", c.confidence());
        assert_eq!(c.reason(), Reason::PlaneDetected);
        assert!(!c.stable());
    }

    #[test]
    fn bright_frames_are_overexposed_regardless_of_other_scores() {
        let engine = ClassificationEngine::default();
        for m in [
            metrics(1.0, 1.0, 1.0, 0.0, 250.0),
            metrics(0.0, 0.0, 0.0, 0.9, 250.0),
        ] {
            let c = engine.classify(&m);
            assert!(!c.is_plane());
            assert_eq!(c.surface_type(), SurfaceType::Overexposed);
            assert!((c.confidence() - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn dark_ratio_is_underexposed() {
        let engine = ClassificationEngine::default();
        let m = FrameMetrics {
            underexposed_ratio: 0.8,
            ..metrics(1.0, 1.0, 1.0, 0.0, 60.0)
        };
        assert_eq!(engine.classify(&m).surface_type(), SurfaceType::Underexposed);
    }

    #[test]
    fn exposure_wins_over_orientation() {
        let engine = ClassificationEngine::default();
        let m = FrameMetrics {
            orientation_gradient: -120.0,
            ..metrics(1.0, 1.0, 1.0, 0.0, 245.0)
        };
        assert_eq!(engine.classify(&m).surface_type(), SurfaceType::Overexposed);
    }

    #[test]
    fn orientation_cues() {
        let engine = ClassificationEngine::default();
        let ceiling = FrameMetrics {
            orientation_gradient: -60.0,
            ..metrics(1.0, 1.0, 1.0, 0.0, 128.0)
        };
        let c = engine.classify(&ceiling);
        assert_eq!(c.surface_type(), SurfaceType::Ceiling);
        assert!(!c.is_plane());

        let floor = FrameMetrics {
            orientation_gradient: 60.0,
            ..metrics(1.0, 1.0, 1.0, 0.0, 128.0)
        };
        let c = engine.classify(&floor);
        assert_eq!(c.surface_type(), SurfaceType::Floor);
        assert!(!c.is_plane());
        assert!(c.confidence() >= 0.2 && c.confidence() <= 0.5);
    }

    #[test]
    fn floor_placement_passes_plane_test() {
        let engine = ClassificationEngine::new(ClassifierThresholds {
            allow_floor_placement: true,
            ..ClassifierThresholds::balanced()
        });
        let floor = FrameMetrics {
            orientation_gradient: 60.0,
            ..metrics(0.9, 0.8, 0.9, 0.1, 128.0)
        };
        let c = engine.classify(&floor);
        assert!(c.is_plane());
        assert_eq!(c.surface_type(), SurfaceType::Floor);
    }

    #[test]
    fn busy_before_plane() {
        let engine = ClassificationEngine::default();
        let m = FrameMetrics {
            strong_edge_density: 0.3,
            ..metrics(0.9, 0.8, 0.9, 0.1, 150.0)
        };
        let c = engine.classify(&m);
        assert_eq!(c.surface_type(), SurfaceType::Busy);
        assert!(!c.is_plane());
    }

    #[test]
    fn saturated_colour_keeps_moving() {
        let engine = ClassificationEngine::default();
        let c = engine.classify(&metrics(0.9, 0.8, 0.9, 0.8, 150.0));
        assert_eq!(c.surface_type(), SurfaceType::Uncertain);
        assert_eq!(c.reason(), Reason::KeepMoving);
        assert!(c.confidence() <= UNCERTAIN_CONFIDENCE_CAP);
        assert!(c.confidence() > 0.0);
    }

    #[test]
    fn not_ready_contributes_nothing() {
        let c = ClassificationEngine::default().classify(&FrameMetrics::not_ready());
        assert_eq!(c.reason(), Reason::NotReady);
        assert_eq!(c.confidence(), 0.0);
        assert!(!c.is_plane());
    }

    #[test]
    fn confidence_never_exceeds_cap() {
        let engine = ClassificationEngine::default();
        let c = engine.classify(&metrics(1.0, 1.0, 1.0, 0.0, 132.5));
        assert!(c.confidence() <= MAX_CONFIDENCE);
        assert!(c.confidence() > 0.95);
    }
}
