//! I/O helpers used by the demo tooling.
//!
//! - `load_rgba_image`: decode a PNG/JPEG/etc. into an owned RGBA8 buffer.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::RgbaImage;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned, tightly packed RGBA8 buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct OwnedRgbaImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl OwnedRgbaImage {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only frame view.
    pub fn as_view(&self) -> RgbaImage<'_> {
        RgbaImage::packed(self.width, self.height, &self.data)
    }
}

/// Load an image from disk and convert to RGBA8.
pub fn load_rgba_image(path: &Path) -> Result<OwnedRgbaImage> {
    let img = image::open(path)
        .map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(OwnedRgbaImage::new(width, height, img.into_raw()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| Error::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| Error::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
