//! Sparse Sobel edge density and Laplacian texture estimates.
//!
//! Both operators are evaluated only on a regular grid of interior sample
//! points (every `step` pixels, one-pixel border excluded) to keep the cost
//! independent of the fine image content.
use crate::image::ImageF32;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct SampledGradients {
    pub samples: usize,
    pub strong_density: f32,
    pub weak_density: f32,
    /// Mean `|4·c - l - r - u - d|` over the samples.
    pub texture: f32,
}

#[inline]
fn sobel_at(img: &ImageF32, x: usize, y: usize) -> f32 {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for (ky, yy) in (y - 1..=y + 1).enumerate() {
        for (kx, xx) in (x - 1..=x + 1).enumerate() {
            let v = img.get(xx, yy);
            sum_x += v * SOBEL_KERNEL_X[ky][kx];
            sum_y += v * SOBEL_KERNEL_Y[ky][kx];
        }
    }
    (sum_x * sum_x + sum_y * sum_y).sqrt()
}

#[inline]
fn laplacian_at(img: &ImageF32, x: usize, y: usize) -> f32 {
    let c = img.get(x, y);
    (img.get(x - 1, y) + img.get(x + 1, y) + img.get(x, y - 1) + img.get(x, y + 1) - 4.0 * c).abs()
}

pub(crate) fn sample_gradients(
    brightness: &ImageF32,
    step: usize,
    strong_threshold: f32,
    weak_threshold: f32,
) -> SampledGradients {
    let (w, h) = (brightness.w, brightness.h);
    if w < 3 || h < 3 {
        return SampledGradients::default();
    }
    let step = step.max(1);
    let mut samples = 0usize;
    let mut strong = 0usize;
    let mut weak = 0usize;
    let mut lap_sum = 0.0f64;

    for y in (1..h - 1).step_by(step) {
        for x in (1..w - 1).step_by(step) {
            let mag = sobel_at(brightness, x, y);
            if mag > strong_threshold {
                strong += 1;
            }
            if mag > weak_threshold {
                weak += 1;
            }
            lap_sum += laplacian_at(brightness, x, y) as f64;
            samples += 1;
        }
    }

    let n = samples.max(1) as f32;
    SampledGradients {
        samples,
        strong_density: strong as f32 / n,
        weak_density: weak as f32 / n,
        texture: (lap_sum / samples.max(1) as f64) as f32,
    }
}
