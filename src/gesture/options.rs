use serde::{Deserialize, Serialize};

/// Sensitivity constants for translating pointer motion into pose edits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureOptions {
    /// World metres per screen pixel along the camera's right axis.
    pub drag_sensitivity_x: f32,
    /// World metres per screen pixel along the camera's up axis. Screen y
    /// grows downward, hence the negative default.
    pub drag_sensitivity_y: f32,
    /// Multiplier on the two-finger twist angle.
    pub rotation_sensitivity: f32,
    /// Pinches starting closer than this (pixels) do not scale.
    pub min_pinch_distance: f32,
}

impl Default for GestureOptions {
    fn default() -> Self {
        Self {
            drag_sensitivity_x: 0.002,
            drag_sensitivity_y: -0.002,
            rotation_sensitivity: 1.0,
            min_pinch_distance: 10.0,
        }
    }
}
