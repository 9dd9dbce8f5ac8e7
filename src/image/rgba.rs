//! Borrowed RGBA8 frame as handed over by the video source.
//!
//! Rows are `stride` bytes apart and hold `w` interleaved `[r, g, b, a]`
//! pixels. Alpha is ignored by the analysis.

/// Read-only view over an interleaved RGBA8 buffer.
#[derive(Clone, Copy, Debug)]
pub struct RgbaImage<'a> {
    pub w: usize,
    pub h: usize,
    /// Bytes between the starts of consecutive rows (>= `4 * w`).
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> RgbaImage<'a> {
    /// Tightly packed view (`stride == 4 * w`).
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w * 4,
            data,
        }
    }

    /// True when the view describes a non-empty frame whose buffer covers
    /// every addressed row. A frame source that has not produced data yet
    /// fails this check.
    pub fn is_ready(&self) -> bool {
        if self.w == 0 || self.h == 0 || self.stride < self.w * 4 {
            return false;
        }
        let needed = (self.h - 1) * self.stride + self.w * 4;
        self.data.len() >= needed
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = y * self.stride + x * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Interleaved bytes of row `y` (length `4 * w`).
    #[inline]
    pub fn row_bytes(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * 4]
    }
}

/// Mean channel brightness `(r + g + b) / 3` in `[0, 255]`.
#[inline]
pub fn brightness(px: [u8; 4]) -> f32 {
    (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0
}

/// HSV-style saturation `(max - min) / max`, zero for black.
#[inline]
pub fn saturation(px: [u8; 4]) -> f32 {
    let max = px[0].max(px[1]).max(px[2]);
    if max == 0 {
        return 0.0;
    }
    let min = px[0].min(px[1]).min(px[2]);
    (max - min) as f32 / max as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_requires_full_rows() {
        let data = vec![0u8; 4 * 4 * 3];
        assert!(RgbaImage::packed(4, 3, &data).is_ready());
        assert!(!RgbaImage::packed(4, 4, &data).is_ready());
        assert!(!RgbaImage::packed(0, 3, &data).is_ready());
        let bad_stride = RgbaImage {
            w: 4,
            h: 3,
            stride: 8,
            data: &data,
        };
        assert!(!bad_stride.is_ready());
    }

    #[test]
    fn padded_stride_addresses_rows() {
        // 2x2 image with 4 bytes of padding per row.
        let mut data = vec![0u8; 12 * 2];
        data[12..16].copy_from_slice(&[10, 20, 30, 255]);
        let img = RgbaImage {
            w: 2,
            h: 2,
            stride: 12,
            data: &data,
        };
        assert!(img.is_ready());
        assert_eq!(img.pixel(0, 1), [10, 20, 30, 255]);
        assert_eq!(img.row_bytes(1).len(), 8);
    }

    #[test]
    fn colour_channels() {
        assert_eq!(brightness([30, 60, 90, 0]), 60.0);
        assert_eq!(saturation([0, 0, 0, 255]), 0.0);
        assert_eq!(saturation([200, 200, 200, 255]), 0.0);
        assert!((saturation([200, 100, 100, 255]) - 0.5).abs() < 1e-6);
    }
}
