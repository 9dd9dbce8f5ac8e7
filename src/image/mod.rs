//! Pixel buffers consumed by the surface analyzer.
//!
//! - [`RgbaImage`] borrows a raw RGBA8 frame as delivered by the video source.
//! - [`ImageF32`] is an owned single-channel plane used for the analysis work.
//! - [`resample`] turns a frame into bounded-size brightness/saturation planes.
pub mod f32;
pub mod io;
pub mod resample;
pub mod rgba;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::resample::{downsample_planes, AnalysisPlanes};
pub use self::rgba::RgbaImage;
pub use self::traits::{ImageView, ImageViewMut};
