//! Pixel-level surface analysis.
//!
//! Overview
//! - Reduces the incoming RGBA frame to brightness/saturation planes at a
//!   bounded analysis resolution (nearest-neighbour, never upsampled).
//! - Splits the planes into a `grid_rows × grid_cols` grid and measures mean
//!   brightness, saturation and brightness uniformity per cell.
//! - Derives a cross-cell uniformity from the spread of the cell means.
//! - Evaluates Sobel magnitude and a 4-neighbour Laplacian on a sparse sample
//!   grid for edge density and texture smoothness.
//! - Compares the bottom and top grid rows as an orientation cue and counts
//!   over/under-exposed pixels.
//!
//! The analyzer is stateless and never fails: a frame that is not ready yet
//! yields [`FrameMetrics::not_ready`].

mod gradients;
pub mod metrics;
pub mod options;
mod regions;

pub use metrics::{FrameMetrics, RegionMetrics};
pub use options::AnalyzerOptions;

use crate::image::{downsample_planes, AnalysisPlanes, RgbaImage};
use log::debug;

/// Turns raw frames into [`FrameMetrics`].
#[derive(Clone, Debug, Default)]
pub struct SurfaceAnalyzer {
    options: AnalyzerOptions,
}

impl SurfaceAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            options: options.validated(),
        }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Analyze one frame. Frames that fail [`RgbaImage::is_ready`] produce the
    /// not-ready sentinel.
    pub fn analyze(&self, frame: &RgbaImage<'_>) -> FrameMetrics {
        if !frame.is_ready() {
            debug!(
                "SurfaceAnalyzer::analyze frame not ready w={} h={} len={}",
                frame.w,
                frame.h,
                frame.data.len()
            );
            return FrameMetrics::not_ready();
        }
        let planes = downsample_planes(frame, self.options.max_width, self.options.max_height);
        self.analyze_planes(&planes)
    }

    /// Analyze planes that are already at analysis resolution.
    pub fn analyze_planes(&self, planes: &AnalysisPlanes) -> FrameMetrics {
        let opts = &self.options;
        let (w, h) = (planes.width(), planes.height());
        if w == 0 || h == 0 {
            return FrameMetrics::not_ready();
        }

        let pass = regions::region_pass(
            planes,
            opts.grid_rows,
            opts.grid_cols,
            opts.variance_norm,
            opts.overexposed_level,
            opts.underexposed_level,
        );
        let total_weight: usize = pass.weights.iter().sum();
        let weighted_mean = |value: fn(&RegionMetrics) -> f32| -> f32 {
            if total_weight == 0 {
                return 0.0;
            }
            pass.regions
                .iter()
                .zip(&pass.weights)
                .map(|(r, &n)| value(r) * n as f32)
                .sum::<f32>()
                / total_weight as f32
        };

        let brightness = weighted_mean(|r| r.brightness);
        let saturation = weighted_mean(|r| r.saturation);
        let uniformity = weighted_mean(|r| r.uniformity);
        let cross_uniformity = regions::cross_uniformity(&pass.regions, opts.cross_variance_norm);
        let orientation_gradient = regions::orientation_gradient(&pass, opts.grid_rows);

        let grads = gradients::sample_gradients(
            &planes.brightness,
            opts.sample_step,
            opts.strong_edge_threshold,
            opts.weak_edge_threshold,
        );
        let smoothness = (1.0 - grads.texture / opts.texture_norm).max(0.0);

        debug!(
            "SurfaceAnalyzer::analyze {}x{} regions={} b={:.1} s={:.3} u={:.3} cu={:.3} \
             edges={:.3}/{:.3} smooth={:.3} orient={:.1}",
            w,
            h,
            pass.regions.len(),
            brightness,
            saturation,
            uniformity,
            cross_uniformity,
            grads.strong_density,
            grads.weak_density,
            smoothness,
            orientation_gradient
        );

        FrameMetrics {
            ready: true,
            width: w,
            height: h,
            regions: pass.regions,
            brightness,
            saturation,
            uniformity,
            cross_uniformity,
            strong_edge_density: grads.strong_density,
            weak_edge_density: grads.weak_density,
            texture: grads.texture,
            smoothness,
            orientation_gradient,
            overexposed_ratio: pass.overexposed_ratio,
            underexposed_ratio: pass.underexposed_ratio,
        }
    }
}
