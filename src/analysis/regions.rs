//! Grid partition statistics: per-cell brightness, saturation and
//! uniformity plus the exposure counts gathered in the same pass.
use super::metrics::RegionMetrics;
use crate::image::{AnalysisPlanes, ImageView};

pub(crate) struct RegionPass {
    pub regions: Vec<RegionMetrics>,
    /// Pixel count per region, aligned with `regions`.
    pub weights: Vec<usize>,
    pub overexposed_ratio: f32,
    pub underexposed_ratio: f32,
}

/// Half-open pixel span `[start, end)` of cell `i` out of `n` along `len`.
#[inline]
pub(crate) fn cell_span(i: usize, n: usize, len: usize) -> (usize, usize) {
    (i * len / n, (i + 1) * len / n)
}

pub(crate) fn region_pass(
    planes: &AnalysisPlanes,
    rows: usize,
    cols: usize,
    variance_norm: f32,
    over_level: f32,
    under_level: f32,
) -> RegionPass {
    let (w, h) = (planes.width(), planes.height());
    let mut regions = Vec::with_capacity(rows * cols);
    let mut weights = Vec::with_capacity(rows * cols);
    let mut over = 0usize;
    let mut under = 0usize;
    let mut total = 0usize;

    for row in 0..rows {
        let (y0, y1) = cell_span(row, rows, h);
        for col in 0..cols {
            let (x0, x1) = cell_span(col, cols, w);
            let n = (x1 - x0) * (y1 - y0);
            if n == 0 {
                continue;
            }
            let mut sum = 0.0f64;
            let mut sum_sq = 0.0f64;
            let mut sat_sum = 0.0f64;
            for y in y0..y1 {
                let b_row = &planes.brightness.row(y)[x0..x1];
                let s_row = &planes.saturation.row(y)[x0..x1];
                for (&b, &s) in b_row.iter().zip(s_row) {
                    let b64 = b as f64;
                    sum += b64;
                    sum_sq += b64 * b64;
                    sat_sum += s as f64;
                    if b > over_level {
                        over += 1;
                    } else if b < under_level {
                        under += 1;
                    }
                }
            }
            total += n;
            let mean = sum / n as f64;
            let variance = (sum_sq / n as f64 - mean * mean).max(0.0) as f32;
            regions.push(RegionMetrics {
                row,
                col,
                brightness: mean as f32,
                saturation: (sat_sum / n as f64) as f32,
                uniformity: (1.0 - variance / variance_norm).max(0.0),
            });
            weights.push(n);
        }
    }

    let denom = total.max(1) as f32;
    RegionPass {
        regions,
        weights,
        overexposed_ratio: over as f32 / denom,
        underexposed_ratio: under as f32 / denom,
    }
}

/// `max(0, 1 - var(region means) / norm)`; 1 for fewer than two regions.
pub(crate) fn cross_uniformity(regions: &[RegionMetrics], norm: f32) -> f32 {
    if regions.len() < 2 {
        return 1.0;
    }
    let n = regions.len() as f32;
    let mean = regions.iter().map(|r| r.brightness).sum::<f32>() / n;
    let var = regions
        .iter()
        .map(|r| {
            let d = r.brightness - mean;
            d * d
        })
        .sum::<f32>()
        / n;
    (1.0 - var / norm).max(0.0)
}

/// Pixel-weighted mean brightness of the bottom grid row minus that of the
/// top grid row. Zero when the grid has a single row.
pub(crate) fn orientation_gradient(pass: &RegionPass, rows: usize) -> f32 {
    if rows < 2 {
        return 0.0;
    }
    let row_mean = |target: usize| -> Option<f32> {
        let mut sum = 0.0f32;
        let mut weight = 0usize;
        for (r, &n) in pass.regions.iter().zip(&pass.weights) {
            if r.row == target {
                sum += r.brightness * n as f32;
                weight += n;
            }
        }
        (weight > 0).then(|| sum / weight as f32)
    };
    match (row_mean(rows - 1), row_mean(0)) {
        (Some(bottom), Some(top)) => bottom - top,
        _ => 0.0,
    }
}
