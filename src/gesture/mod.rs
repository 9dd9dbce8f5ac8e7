//! Multi-touch gesture state machine editing the anchored object.
//!
//! States: `Idle`, `Drag` (one pointer) and `Pinch` (two pointers). Every
//! gesture snapshots the anchor pose when it starts and computes each move
//! from that snapshot and the original pointer positions, so a long stream
//! of small moves lands exactly where one large move would.
//!
//! Transitions
//! - first pointer down with an anchor placed → `Drag`
//! - second pointer down → `Pinch`
//! - a participating pointer lifts: re-snapshot into whatever the remaining
//!   pointers support (`Pinch` → `Drag` when one is left)
//! - no pointers left → `Idle`
//! - move/up/cancel for an unknown pointer, or a repeated down → ignored and
//!   forced back to `Idle`
pub mod options;

pub use options::GestureOptions;

use crate::anchor::WorldAnchor;
use crate::types::{CameraAxes, CameraPose, ObjectPose, PoseUpdate};
use log::{debug, warn};
use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub pointer_id: u64,
    pub x: f32,
    pub y: f32,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn down(pointer_id: u64, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            x,
            y,
            phase: PointerPhase::Down,
        }
    }

    pub fn moved(pointer_id: u64, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            x,
            y,
            phase: PointerPhase::Move,
        }
    }

    pub fn up(pointer_id: u64, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            x,
            y,
            phase: PointerPhase::Up,
        }
    }

    pub fn cancel(pointer_id: u64) -> Self {
        Self {
            pointer_id,
            x: 0.0,
            y: 0.0,
            phase: PointerPhase::Cancel,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureMode {
    Idle,
    Drag,
    Pinch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pointer {
    id: u64,
    x: f32,
    y: f32,
}

#[derive(Clone, Debug)]
struct DragState {
    pointer_id: u64,
    origin: (f32, f32),
    base: ObjectPose,
    right: Vector3<f32>,
    up: Vector3<f32>,
}

#[derive(Clone, Debug)]
struct PinchState {
    ids: [u64; 2],
    initial_distance: f32,
    initial_angle: f32,
    base: ObjectPose,
    /// Camera backward axis in the object's local frame at gesture start.
    twist_axis: Unit<Vector3<f32>>,
}

#[derive(Clone, Debug)]
enum GestureState {
    Idle,
    Drag(DragState),
    Pinch(PinchState),
}

/// Turns pointer events into [`PoseUpdate`]s applied to a [`WorldAnchor`].
#[derive(Clone, Debug)]
pub struct GestureController {
    options: GestureOptions,
    state: GestureState,
    pointers: Vec<Pointer>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(GestureOptions::default())
    }
}

impl GestureController {
    pub fn new(options: GestureOptions) -> Self {
        Self {
            options,
            state: GestureState::Idle,
            pointers: Vec::new(),
        }
    }

    pub fn mode(&self) -> GestureMode {
        match self.state {
            GestureState::Idle => GestureMode::Idle,
            GestureState::Drag(_) => GestureMode::Drag,
            GestureState::Pinch(_) => GestureMode::Pinch,
        }
    }

    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// Drop all pointers and any gesture in progress.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.state = GestureState::Idle;
    }

    /// Feed one pointer event. Move events that change the pose return the
    /// update after it has been applied to `anchor`.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        anchor: &mut WorldAnchor,
        camera: &CameraPose,
    ) -> Option<PoseUpdate> {
        match event.phase {
            PointerPhase::Down => {
                self.on_down(event, anchor, camera);
                None
            }
            PointerPhase::Move => self.on_move(event, anchor),
            PointerPhase::Up | PointerPhase::Cancel => {
                self.on_release(event, anchor, camera);
                None
            }
        }
    }

    fn on_down(&mut self, event: &PointerEvent, anchor: &WorldAnchor, camera: &CameraPose) {
        if self.pointer_index(event.pointer_id).is_some() {
            self.invalid("repeated down", event);
            return;
        }
        self.pointers.push(Pointer {
            id: event.pointer_id,
            x: event.x,
            y: event.y,
        });
        if self.pointers.len() <= 2 {
            self.restart(anchor, camera);
        }
    }

    fn on_move(&mut self, event: &PointerEvent, anchor: &mut WorldAnchor) -> Option<PoseUpdate> {
        let Some(i) = self.pointer_index(event.pointer_id) else {
            self.invalid("move without down", event);
            return None;
        };
        self.pointers[i].x = event.x;
        self.pointers[i].y = event.y;

        let update = match &self.state {
            GestureState::Idle => return None,
            GestureState::Drag(drag) if drag.pointer_id == event.pointer_id => {
                self.drag_update(drag, event.x, event.y)
            }
            GestureState::Pinch(pinch) if pinch.ids.contains(&event.pointer_id) => {
                let a = self.pointers[self.pointer_index(pinch.ids[0])?];
                let b = self.pointers[self.pointer_index(pinch.ids[1])?];
                self.pinch_update(pinch, a, b, anchor)
            }
            _ => return None,
        };
        anchor.update(&update);
        Some(update)
    }

    fn on_release(&mut self, event: &PointerEvent, anchor: &WorldAnchor, camera: &CameraPose) {
        let Some(i) = self.pointer_index(event.pointer_id) else {
            self.invalid("release without down", event);
            return;
        };
        self.pointers.remove(i);
        let participating = match &self.state {
            GestureState::Idle => false,
            GestureState::Drag(drag) => drag.pointer_id == event.pointer_id,
            GestureState::Pinch(pinch) => pinch.ids.contains(&event.pointer_id),
        };
        if self.pointers.is_empty() || participating {
            self.restart(anchor, camera);
        }
    }

    /// Re-snapshot the gesture from the current pointers and anchor pose.
    fn restart(&mut self, anchor: &WorldAnchor, camera: &CameraPose) {
        let previous = self.mode();
        self.state = match (anchor.pose(), self.pointers.as_slice()) {
            (None, _) | (_, []) => GestureState::Idle,
            (Some(base), [p]) => {
                let axes = CameraAxes::of(camera);
                GestureState::Drag(DragState {
                    pointer_id: p.id,
                    origin: (p.x, p.y),
                    base,
                    right: axes.right,
                    up: axes.up,
                })
            }
            (Some(base), [a, b, ..]) => {
                let backward = -CameraAxes::of(camera).forward;
                GestureState::Pinch(PinchState {
                    ids: [a.id, b.id],
                    initial_distance: distance(a, b),
                    initial_angle: angle(a, b),
                    base,
                    twist_axis: Unit::new_normalize(base.rotation.inverse() * backward),
                })
            }
        };
        let mode = self.mode();
        if mode != previous {
            debug!(
                "GestureController {:?} -> {:?} pointers={}",
                previous,
                mode,
                self.pointers.len()
            );
        }
    }

    fn drag_update(&self, drag: &DragState, x: f32, y: f32) -> PoseUpdate {
        let dx = x - drag.origin.0;
        let dy = y - drag.origin.1;
        let offset = drag.right * (self.options.drag_sensitivity_x * dx)
            + drag.up * (self.options.drag_sensitivity_y * dy);
        PoseUpdate {
            position: Some(Point3::from(drag.base.position.coords + offset)),
            ..PoseUpdate::default()
        }
    }

    fn pinch_update(
        &self,
        pinch: &PinchState,
        a: Pointer,
        b: Pointer,
        anchor: &WorldAnchor,
    ) -> PoseUpdate {
        let ratio = if pinch.initial_distance >= self.options.min_pinch_distance {
            distance(&a, &b) / pinch.initial_distance
        } else {
            1.0
        };
        let scale = anchor.options().clamp_scale(pinch.base.scale * ratio);
        // Screen angles grow clockwise; the twist axis points at the viewer.
        let twist = -wrap_angle(angle(&a, &b) - pinch.initial_angle) * self.options.rotation_sensitivity;
        let rotation = pinch.base.rotation * UnitQuaternion::from_axis_angle(&pinch.twist_axis, twist);
        PoseUpdate {
            position: None,
            rotation: Some(rotation),
            scale: Some(scale),
        }
    }

    fn pointer_index(&self, id: u64) -> Option<usize> {
        self.pointers.iter().position(|p| p.id == id)
    }

    fn invalid(&mut self, what: &str, event: &PointerEvent) {
        warn!(
            "GestureController: {} for pointer {}, resetting to idle",
            what, event.pointer_id
        );
        self.reset();
    }
}

fn distance(a: &Pointer, b: &Pointer) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

fn angle(a: &Pointer, b: &Pointer) -> f32 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Wrap into `(-π, π]`.
fn wrap_angle(a: f32) -> f32 {
    let w = (a + PI).rem_euclid(2.0 * PI) - PI;
    if w <= -PI {
        w + 2.0 * PI
    } else {
        w
    }
}
