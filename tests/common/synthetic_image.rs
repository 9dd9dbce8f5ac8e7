/// Tightly packed RGBA frame filled with one colour.
pub fn solid_rgba(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        img.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    img
}

/// Generates a simple high-contrast grey checkerboard.
pub fn checkerboard_rgba(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = vec![0u8; width * height * 4];
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            let val = if sum & 1 == 0 { 32u8 } else { 220u8 };
            let i = (y * width + x) * 4;
            img[i..i + 4].copy_from_slice(&[val, val, val, 255]);
        }
    }
    img
}

/// Grey ramp running from `top` on the first row to `bottom` on the last.
pub fn vertical_ramp_rgba(width: usize, height: usize, top: u8, bottom: u8) -> Vec<u8> {
    assert!(width > 0 && height > 1, "ramp needs at least two rows");
    let mut img = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let t = y as f32 / (height - 1) as f32;
        let val = (top as f32 + (bottom as f32 - top as f32) * t).round() as u8;
        for _ in 0..width {
            img.extend_from_slice(&[val, val, val, 255]);
        }
    }
    img
}
