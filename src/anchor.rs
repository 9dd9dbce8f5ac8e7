//! Dead-reckoned world anchor for the placed object.
//!
//! The anchor stores the object pose together with the camera pose at the
//! moment of placement. Each frame the renderer asks for the pose relative to
//! the live camera: with `delta = current · reference⁻¹` the object is drawn
//! at `delta⁻¹ · world_position`, which keeps it visually fixed while the
//! camera moves. Swapping the composition order makes the object follow the
//! camera instead.
//!
//! Nothing here observes the environment. Camera poses from noisy sensors
//! accumulate drift over long sessions or fast motion and that drift is not
//! corrected.
use crate::types::{CameraPose, ObjectPose, PoseUpdate};
use log::{debug, info};
use nalgebra::{Point3, UnitQuaternion};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorOptions {
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 5.0,
        }
    }
}

impl AnchorOptions {
    pub fn validated(mut self) -> Self {
        if self.min_scale > self.max_scale {
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        self.min_scale = self.min_scale.max(f32::EPSILON);
        self.max_scale = self.max_scale.max(self.min_scale);
        self
    }

    #[inline]
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return 1.0f32.clamp(self.min_scale, self.max_scale);
        }
        scale.clamp(self.min_scale, self.max_scale)
    }
}

#[derive(Clone, Debug)]
struct AnchorState {
    world_position: Point3<f32>,
    world_rotation: UnitQuaternion<f32>,
    scale: f32,
    reference_camera_pose: CameraPose,
}

/// Holds at most one placed object pose.
#[derive(Clone, Debug, Default)]
pub struct WorldAnchor {
    options: AnchorOptions,
    state: Option<AnchorState>,
}

impl WorldAnchor {
    pub fn new(options: AnchorOptions) -> Self {
        Self {
            options: options.validated(),
            state: None,
        }
    }

    pub fn options(&self) -> &AnchorOptions {
        &self.options
    }

    /// Place the object at `point` with `rotation`, remembering `camera_pose`
    /// as the reference. Replaces any previous placement.
    pub fn place(&mut self, camera_pose: &CameraPose, point: Point3<f32>, rotation: UnitQuaternion<f32>) {
        info!(
            "WorldAnchor::place at ({:.3}, {:.3}, {:.3})",
            point.x, point.y, point.z
        );
        self.state = Some(AnchorState {
            world_position: point,
            world_rotation: rotation,
            scale: self.options.clamp_scale(1.0),
            reference_camera_pose: *camera_pose,
        });
    }

    pub fn is_placed(&self) -> bool {
        self.state.is_some()
    }

    /// Snapshot of the stored pose (world frame).
    pub fn pose(&self) -> Option<ObjectPose> {
        self.state.as_ref().map(|s| ObjectPose {
            position: s.world_position,
            rotation: s.world_rotation,
            scale: s.scale,
        })
    }

    pub fn reference_camera_pose(&self) -> Option<&CameraPose> {
        self.state.as_ref().map(|s| &s.reference_camera_pose)
    }

    /// Pose to render under `current_camera_pose`; `None` before placement,
    /// in which case nothing should be drawn.
    pub fn render_pose(&self, current_camera_pose: &CameraPose) -> Option<ObjectPose> {
        let s = self.state.as_ref()?;
        let delta = current_camera_pose * s.reference_camera_pose.inverse();
        Some(ObjectPose {
            position: delta.inverse_transform_point(&s.world_position),
            rotation: s.world_rotation,
            scale: s.scale,
        })
    }

    /// Apply a partial edit in place. Returns false (and does nothing) when
    /// no object is placed.
    pub fn update(&mut self, update: &PoseUpdate) -> bool {
        let Some(s) = self.state.as_mut() else {
            debug!("WorldAnchor::update ignored: no anchor");
            return false;
        };
        if let Some(p) = update.position {
            s.world_position = p;
        }
        if let Some(r) = update.rotation {
            s.world_rotation = r;
        }
        if let Some(scale) = update.scale {
            s.scale = self.options.clamp_scale(scale);
        }
        true
    }

    pub fn reset(&mut self) {
        if self.state.take().is_some() {
            info!("WorldAnchor::reset");
        }
    }
}
