use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};
use serde::Serialize;

/// Camera-to-world transform supplied by the pose source each frame.
pub type CameraPose = Isometry3<f32>;

/// Position, orientation and uniform scale of the placed object.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPose {
    pub position: Point3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: f32,
}

/// Partial pose edit; `None` fields are left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point3<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<UnitQuaternion<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

/// Camera axes in world space. The camera looks down its local −Z with +Y
/// up and +X to the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraAxes {
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
    pub forward: Vector3<f32>,
}

impl CameraAxes {
    pub fn of(camera: &CameraPose) -> Self {
        let r = &camera.rotation;
        Self {
            right: r * Vector3::x(),
            up: r * Vector3::y(),
            forward: r * -Vector3::z(),
        }
    }
}
