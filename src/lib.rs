//! Surface classification and world anchoring for camera-based placement.
//!
//! Frames flow through [`SurfaceAnalyzer`] (pixel metrics),
//! [`ClassificationEngine`] (per-frame verdict) and [`TemporalStabilizer`]
//! (debounced verdict). Once a surface is confirmed, [`RayPlaneHitTester`]
//! finds the placement point, [`WorldAnchor`] keeps the object fixed in the
//! world while the camera moves, and [`GestureController`] turns pointer
//! input into drag, pinch-scale and twist-rotate edits.
//!
//! [`ScanSession`] wires all of this together for a single scan/place cycle.

// Public modules
pub mod analysis;
pub mod anchor;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gesture;
pub mod hit_test;
pub mod image;
pub mod platform;
pub mod session;
pub mod stabilize;
pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::analysis::{AnalyzerOptions, FrameMetrics, SurfaceAnalyzer};
pub use crate::anchor::{AnchorOptions, WorldAnchor};
pub use crate::classify::{
    Classification, ClassificationEngine, ClassifierThresholds, Reason, SurfaceType,
    ThresholdPreset,
};
pub use crate::config::SessionConfig;
pub use crate::error::{Error, Result};
pub use crate::gesture::{GestureController, GestureMode, GestureOptions, PointerEvent};
pub use crate::hit_test::{HitResult, HitSource, HitTestProvider, RayPlaneHitTester};
pub use crate::session::{ScanSession, SessionPhase};
pub use crate::stabilize::{StabilizerOptions, TemporalStabilizer};
pub use crate::types::{CameraPose, ObjectPose, PoseUpdate};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use surface_anchor::prelude::*;
///
/// # fn main() {
/// let (w, h) = (640usize, 480usize);
/// let rgba = vec![128u8; w * h * 4];
/// let frame = RgbaImage::packed(w, h, &rgba);
///
/// let mut session = ScanSession::new(SessionConfig::default());
/// if let Some(c) = session.submit_frame(Some(&frame)) {
///     println!("{} stable={} {}", c.surface_type(), c.stable(), c.reason());
/// }
/// let camera = CameraPose::identity();
/// if session.can_place() {
///     let pose = session.place(Some(&camera));
///     println!("placed={:?}", pose.map(|p| p.position));
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::image::RgbaImage;
    pub use crate::{
        CameraPose, Classification, ObjectPose, PointerEvent, ScanSession, SessionConfig,
        SurfaceType,
    };
}
