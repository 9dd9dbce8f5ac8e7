use serde::Serialize;
use std::fmt;

/// Upper bound on any reported confidence.
pub const MAX_CONFIDENCE: f32 = 0.98;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceType {
    Wall,
    Floor,
    Ceiling,
    Overexposed,
    Underexposed,
    Busy,
    Uncertain,
}

impl SurfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
            Self::Overexposed => "overexposed",
            Self::Underexposed => "underexposed",
            Self::Busy => "busy",
            Self::Uncertain => "uncertain",
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a classification came out the way it did. `Display` renders the
/// guidance text shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "camelCase")]
pub enum Reason {
    NotReady,
    TooBright,
    TooDark,
    FloorDetected,
    CeilingDetected,
    TooBusy,
    PlaneDetected,
    KeepMoving,
    Confirmed { positives: usize, window: usize },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => f.write_str("camera starting"),
            Self::TooBright => f.write_str("too bright, avoid direct light"),
            Self::TooDark => f.write_str("too dark, add more light"),
            Self::FloorDetected => f.write_str("looks like the floor, aim at a wall"),
            Self::CeilingDetected => f.write_str("looks like the ceiling, aim lower"),
            Self::TooBusy => f.write_str("too much detail, find a plain area"),
            Self::PlaneDetected => f.write_str("flat surface detected"),
            Self::KeepMoving => f.write_str("keep moving"),
            Self::Confirmed { positives, window } => {
                write!(f, "surface confirmed ({positives}/{window} frames)")
            }
        }
    }
}

/// Surface verdict for one frame, or the debounced verdict of a window.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    surface_type: SurfaceType,
    confidence: f32,
    reason: Reason,
    is_plane: bool,
    stable: bool,
}

impl Classification {
    /// Unstable per-frame classification; `confidence` is clamped to
    /// `[0, MAX_CONFIDENCE]` (NaN maps to 0).
    pub fn new(surface_type: SurfaceType, is_plane: bool, confidence: f32, reason: Reason) -> Self {
        Self {
            surface_type,
            confidence: clamp_confidence(confidence),
            reason,
            is_plane,
            stable: false,
        }
    }

    pub fn not_ready() -> Self {
        Self::new(SurfaceType::Uncertain, false, 0.0, Reason::NotReady)
    }

    pub(crate) fn into_stable(mut self) -> Self {
        self.stable = true;
        self
    }

    pub fn surface_type(&self) -> SurfaceType {
        self.surface_type
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn reason(&self) -> Reason {
        self.reason
    }

    pub fn is_plane(&self) -> bool {
        self.is_plane
    }

    pub fn stable(&self) -> bool {
        self.stable
    }
}

#[inline]
pub(crate) fn clamp_confidence(c: f32) -> f32 {
    if c.is_nan() {
        0.0
    } else {
        c.clamp(0.0, MAX_CONFIDENCE)
    }
}
