//! Knobs for the pixel-level surface analysis.
//!
//! Brightness is measured on the `[0, 255]` scale, so gradient and Laplacian
//! thresholds are in the same units.
use serde::{Deserialize, Serialize};

/// Parameters of the [`SurfaceAnalyzer`](super::SurfaceAnalyzer).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Upper bound on the analysis width; larger frames are downsampled.
    pub max_width: usize,
    /// Upper bound on the analysis height.
    pub max_height: usize,
    /// Number of region rows (>= 1). The top and bottom rows drive the
    /// orientation cue.
    pub grid_rows: usize,
    /// Number of region columns (>= 1).
    pub grid_cols: usize,
    /// `K₁`: intra-region brightness variance mapped to zero uniformity.
    pub variance_norm: f32,
    /// Variance of the per-region means mapped to zero cross uniformity.
    pub cross_variance_norm: f32,
    /// Spacing of the sparse gradient/Laplacian sample grid in pixels.
    pub sample_step: usize,
    /// Sobel magnitude counted as a strong edge.
    pub strong_edge_threshold: f32,
    /// Sobel magnitude counted as a weak edge.
    pub weak_edge_threshold: f32,
    /// `K₂`: mean Laplacian magnitude mapped to zero smoothness.
    pub texture_norm: f32,
    /// Pixels brighter than this count towards the overexposed ratio.
    pub overexposed_level: f32,
    /// Pixels darker than this count towards the underexposed ratio.
    pub underexposed_level: f32,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            max_width: 480,
            max_height: 360,
            grid_rows: 3,
            grid_cols: 3,
            variance_norm: 2500.0,
            cross_variance_norm: 1500.0,
            sample_step: 4,
            strong_edge_threshold: 120.0,
            weak_edge_threshold: 40.0,
            texture_norm: 40.0,
            overexposed_level: 240.0,
            underexposed_level: 20.0,
        }
    }
}

impl AnalyzerOptions {
    /// Clamp degenerate values (zero grid, zero step, non-positive norms).
    pub fn validated(mut self) -> Self {
        self.max_width = self.max_width.max(1);
        self.max_height = self.max_height.max(1);
        self.grid_rows = self.grid_rows.max(1);
        self.grid_cols = self.grid_cols.max(1);
        self.sample_step = self.sample_step.max(1);
        self.variance_norm = self.variance_norm.max(f32::EPSILON);
        self.cross_variance_norm = self.cross_variance_norm.max(f32::EPSILON);
        self.texture_norm = self.texture_norm.max(f32::EPSILON);
        if self.weak_edge_threshold > self.strong_edge_threshold {
            std::mem::swap(&mut self.weak_edge_threshold, &mut self.strong_edge_threshold);
        }
        self
    }
}
