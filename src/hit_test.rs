//! Approximate hit testing against virtual reference planes.
//!
//! There is no depth sensing here. The forward ray from the screen centre is
//! intersected with a fixed set of axis-aligned planes (front, back, left,
//! right walls at a few canonical depths, plus a floor and a ceiling) laid
//! out around the camera position. The nearest intersection inside the
//! distance window wins. The result is *a* plausible point in front of the
//! camera, not a verified point on a real surface.
//!
//! A platform hit-test service can be plugged in through
//! [`HitTestProvider`]; its answers go through the same distance window and
//! a miss falls back to the reference planes.
use crate::types::{CameraAxes, CameraPose};
use log::debug;
use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

const PARALLEL_EPS: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaneKind {
    Front,
    Back,
    Left,
    Right,
    Floor,
    Ceiling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "plane", rename_all = "camelCase")]
pub enum HitSource {
    ReferencePlane(PlaneKind),
    /// No plane qualified; the point sits at the fallback distance.
    Fallback,
    /// Answered by an external hit-test provider.
    Platform,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitResult {
    pub point: Point3<f32>,
    /// Unit normal facing back towards the camera.
    pub normal: Vector3<f32>,
    pub distance: f32,
    pub source: HitSource,
}

impl HitResult {
    /// Rotation taking the object's +Z (its front) onto the hit normal.
    pub fn facing_rotation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::rotation_between(&Vector3::z(), &self.normal).unwrap_or_else(|| {
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::PI)
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    /// Ray through the screen centre of `camera`.
    pub fn from_camera(camera: &CameraPose) -> Self {
        Self {
            origin: Point3::from(camera.translation.vector),
            direction: Unit::new_normalize(CameraAxes::of(camera).forward),
        }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction.into_inner() * t
    }
}

/// External hit-test collaborator (e.g. a platform AR service).
pub trait HitTestProvider {
    fn hit_test(&mut self, camera: &CameraPose, ray: &Ray) -> Option<HitResult>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestOptions {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Canonical wall depths around the camera in metres.
    pub wall_depths: Vec<f32>,
    /// Assumed camera height above the floor.
    pub floor_height: f32,
    /// Assumed distance from the camera up to the ceiling.
    pub ceiling_height: f32,
    /// Distance along the ray used when no plane qualifies; `None` disables
    /// the fallback.
    pub fallback_distance: Option<f32>,
}

impl Default for HitTestOptions {
    fn default() -> Self {
        Self {
            min_distance: 0.3,
            max_distance: 6.0,
            wall_depths: vec![1.0, 2.0, 3.0],
            floor_height: 1.4,
            ceiling_height: 1.2,
            fallback_distance: Some(1.5),
        }
    }
}

impl HitTestOptions {
    pub fn validated(mut self) -> Self {
        self.min_distance = self.min_distance.max(0.0);
        if self.min_distance > self.max_distance {
            std::mem::swap(&mut self.min_distance, &mut self.max_distance);
        }
        self.wall_depths.retain(|d| d.is_finite() && *d > 0.0);
        self
    }

    pub fn in_range(&self, distance: f32) -> bool {
        distance >= self.min_distance && distance <= self.max_distance
    }
}

/// Camera-relative plane: `offset` locates a point on it from the camera
/// position, `normal` faces the room interior.
#[derive(Clone, Copy, Debug)]
struct ReferencePlane {
    kind: PlaneKind,
    offset: Vector3<f32>,
    normal: Vector3<f32>,
}

#[derive(Clone, Debug)]
pub struct RayPlaneHitTester {
    options: HitTestOptions,
    planes: Vec<ReferencePlane>,
}

impl Default for RayPlaneHitTester {
    fn default() -> Self {
        Self::new(HitTestOptions::default())
    }
}

impl RayPlaneHitTester {
    pub fn new(options: HitTestOptions) -> Self {
        let options = options.validated();
        let mut planes = Vec::with_capacity(options.wall_depths.len() * 4 + 2);
        for &d in &options.wall_depths {
            planes.push(ReferencePlane {
                kind: PlaneKind::Front,
                offset: Vector3::new(0.0, 0.0, -d),
                normal: Vector3::z(),
            });
            planes.push(ReferencePlane {
                kind: PlaneKind::Back,
                offset: Vector3::new(0.0, 0.0, d),
                normal: -Vector3::z(),
            });
            planes.push(ReferencePlane {
                kind: PlaneKind::Left,
                offset: Vector3::new(-d, 0.0, 0.0),
                normal: Vector3::x(),
            });
            planes.push(ReferencePlane {
                kind: PlaneKind::Right,
                offset: Vector3::new(d, 0.0, 0.0),
                normal: -Vector3::x(),
            });
        }
        planes.push(ReferencePlane {
            kind: PlaneKind::Floor,
            offset: Vector3::new(0.0, -options.floor_height, 0.0),
            normal: Vector3::y(),
        });
        planes.push(ReferencePlane {
            kind: PlaneKind::Ceiling,
            offset: Vector3::new(0.0, options.ceiling_height, 0.0),
            normal: -Vector3::y(),
        });
        Self { options, planes }
    }

    pub fn options(&self) -> &HitTestOptions {
        &self.options
    }

    /// Nearest reference-plane hit inside the distance window, or the
    /// fallback point when enabled.
    pub fn hit_test(&self, camera: &CameraPose) -> Option<HitResult> {
        let ray = Ray::from_camera(camera);
        self.intersect_planes(&ray).or_else(|| self.fallback(&ray))
    }

    /// Ask `provider` first and fall back to the reference planes when it
    /// misses or answers outside the distance window.
    pub fn hit_test_with<P: HitTestProvider + ?Sized>(
        &self,
        camera: &CameraPose,
        provider: Option<&mut P>,
    ) -> Option<HitResult> {
        if let Some(provider) = provider {
            let ray = Ray::from_camera(camera);
            match provider.hit_test(camera, &ray) {
                Some(hit) if self.options.in_range(hit.distance) => {
                    return Some(HitResult {
                        source: HitSource::Platform,
                        ..hit
                    })
                }
                Some(hit) => debug!(
                    "hit_test: provider distance {:.2} outside window, using planes",
                    hit.distance
                ),
                None => debug!("hit_test: provider miss, using planes"),
            }
        }
        self.hit_test(camera)
    }

    /// Nearest qualifying intersection with the reference planes.
    pub fn intersect_planes(&self, ray: &Ray) -> Option<HitResult> {
        let dir = ray.direction.into_inner();
        let mut best: Option<HitResult> = None;
        for plane in &self.planes {
            let denom = plane.normal.dot(&dir);
            // Only planes facing the ray.
            if denom > -PARALLEL_EPS {
                continue;
            }
            let t = plane.normal.dot(&plane.offset) / denom;
            if !self.options.in_range(t) {
                continue;
            }
            if best.as_ref().map_or(true, |b| t < b.distance) {
                best = Some(HitResult {
                    point: ray.at(t),
                    normal: plane.normal,
                    distance: t,
                    source: HitSource::ReferencePlane(plane.kind),
                });
            }
        }
        best
    }

    fn fallback(&self, ray: &Ray) -> Option<HitResult> {
        let d = self
            .options
            .fallback_distance?
            .clamp(self.options.min_distance, self.options.max_distance);
        Some(HitResult {
            point: ray.at(d),
            normal: -ray.direction.into_inner(),
            distance: d,
            source: HitSource::Fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, Translation3};

    #[test]
    fn level_camera_hits_nearest_front_wall() {
        let tester = RayPlaneHitTester::default();
        let camera = Isometry3::translation(0.5, 1.0, 2.0);
        let hit = tester.hit_test(&camera).unwrap();
        assert_eq!(hit.source, HitSource::ReferencePlane(PlaneKind::Front));
        assert_relative_eq!(hit.distance, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.point, Point3::new(0.5, 1.0, 1.0), epsilon = 1e-5);
        assert_relative_eq!(hit.normal, Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn downward_camera_hits_floor() {
        let tester = RayPlaneHitTester::default();
        let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -60f32.to_radians());
        let camera = Isometry3::from_parts(Translation3::identity(), pitch);
        let hit = tester.hit_test(&camera).unwrap();
        assert_eq!(hit.source, HitSource::ReferencePlane(PlaneKind::Floor));
        assert_relative_eq!(hit.point.y, -1.4, epsilon = 1e-4);
        assert!(hit.distance < 2.0);
    }

    #[test]
    fn distances_stay_in_window() {
        let tester = RayPlaneHitTester::new(HitTestOptions {
            min_distance: 1.5,
            max_distance: 2.5,
            fallback_distance: None,
            ..HitTestOptions::default()
        });
        let hit = tester.hit_test(&Isometry3::identity()).unwrap();
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-5);

        let narrow = RayPlaneHitTester::new(HitTestOptions {
            min_distance: 3.5,
            max_distance: 4.0,
            fallback_distance: None,
            ..HitTestOptions::default()
        });
        assert!(narrow.hit_test(&Isometry3::identity()).is_none());
    }

    #[test]
    fn fallback_point_faces_camera() {
        let tester = RayPlaneHitTester::new(HitTestOptions {
            wall_depths: vec![],
            ..HitTestOptions::default()
        });
        let hit = tester.hit_test(&Isometry3::identity()).unwrap();
        assert_eq!(hit.source, HitSource::Fallback);
        assert_relative_eq!(hit.point, Point3::new(0.0, 0.0, -1.5), epsilon = 1e-6);
        assert_relative_eq!(hit.normal, Vector3::z(), epsilon = 1e-6);
    }

    struct FixedProvider(Option<HitResult>);

    impl HitTestProvider for FixedProvider {
        fn hit_test(&mut self, _camera: &CameraPose, _ray: &Ray) -> Option<HitResult> {
            self.0
        }
    }

    #[test]
    fn provider_answers_are_windowed() {
        let tester = RayPlaneHitTester::default();
        let camera = Isometry3::identity();
        let near = HitResult {
            point: Point3::new(0.0, 0.0, -0.8),
            normal: Vector3::z(),
            distance: 0.8,
            source: HitSource::Fallback,
        };
        let mut provider = FixedProvider(Some(near));
        let hit = tester.hit_test_with(&camera, Some(&mut provider)).unwrap();
        assert_eq!(hit.source, HitSource::Platform);
        assert_eq!(hit.distance, 0.8);

        let mut far = FixedProvider(Some(HitResult {
            distance: 40.0,
            ..near
        }));
        let hit = tester.hit_test_with(&camera, Some(&mut far)).unwrap();
        assert_eq!(hit.source, HitSource::ReferencePlane(PlaneKind::Front));
    }

    #[test]
    fn facing_rotation_turns_front_onto_normal() {
        let hit = HitResult {
            point: Point3::origin(),
            normal: Vector3::y(),
            distance: 1.0,
            source: HitSource::Fallback,
        };
        let r = hit.facing_rotation();
        assert_relative_eq!(r * Vector3::z(), Vector3::y(), epsilon = 1e-5);
        let back = HitResult {
            normal: -Vector3::z(),
            ..hit
        };
        assert_relative_eq!(back.facing_rotation() * Vector3::z(), -Vector3::z(), epsilon = 1e-5);
    }
}
