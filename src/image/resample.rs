//! Nearest-neighbour reduction of an RGBA frame to the analysis resolution.
//!
//! The analyzer never touches more than `max_w × max_h` pixels regardless of
//! the camera resolution. Frames already within bounds are converted 1:1.
use super::rgba::{brightness, saturation};
use super::{ImageF32, ImageViewMut, RgbaImage};

/// Brightness and saturation planes at analysis resolution.
#[derive(Clone, Debug)]
pub struct AnalysisPlanes {
    /// Mean channel brightness per pixel, `[0, 255]`.
    pub brightness: ImageF32,
    /// `(max - min) / max` per pixel, `[0, 1]`.
    pub saturation: ImageF32,
}

impl AnalysisPlanes {
    pub fn width(&self) -> usize {
        self.brightness.w
    }

    pub fn height(&self) -> usize {
        self.brightness.h
    }
}

/// Output size for a `w × h` frame bounded by `max_w × max_h`, keeping the
/// aspect ratio. Never upsamples.
pub fn analysis_size(w: usize, h: usize, max_w: usize, max_h: usize) -> (usize, usize) {
    if w == 0 || h == 0 {
        return (0, 0);
    }
    let max_w = max_w.max(1);
    let max_h = max_h.max(1);
    let scale = (w as f32 / max_w as f32)
        .max(h as f32 / max_h as f32)
        .max(1.0);
    let out_w = ((w as f32 / scale).round() as usize).clamp(1, w);
    let out_h = ((h as f32 / scale).round() as usize).clamp(1, h);
    (out_w, out_h)
}

/// Sample `frame` into brightness/saturation planes no larger than
/// `max_w × max_h`. The caller guarantees `frame.is_ready()`.
pub fn downsample_planes(frame: &RgbaImage<'_>, max_w: usize, max_h: usize) -> AnalysisPlanes {
    let (out_w, out_h) = analysis_size(frame.w, frame.h, max_w, max_h);
    let mut bright = ImageF32::new(out_w, out_h);
    let mut sat = ImageF32::new(out_w, out_h);
    if out_w == 0 || out_h == 0 {
        return AnalysisPlanes {
            brightness: bright,
            saturation: sat,
        };
    }

    let x_map: Vec<usize> = (0..out_w)
        .map(|x| (((x as f32 + 0.5) * frame.w as f32 / out_w as f32) as usize).min(frame.w - 1))
        .collect();

    for y in 0..out_h {
        let sy = (((y as f32 + 0.5) * frame.h as f32 / out_h as f32) as usize).min(frame.h - 1);
        let src = frame.row_bytes(sy);
        let b_row = bright.row_mut(y);
        for (x, &sx) in x_map.iter().enumerate() {
            let i = sx * 4;
            let px = [src[i], src[i + 1], src[i + 2], src[i + 3]];
            b_row[x] = brightness(px);
        }
        let s_row = sat.row_mut(y);
        for (x, &sx) in x_map.iter().enumerate() {
            let i = sx * 4;
            let px = [src[i], src[i + 1], src[i + 2], src[i + 3]];
            s_row[x] = saturation(px);
        }
    }

    AnalysisPlanes {
        brightness: bright,
        saturation: sat,
    }
}
