//! One scanning-and-placement session.
//!
//! [`ScanSession`] owns the analyzer, classifier, stabilizer, hit tester,
//! anchor and gesture controller and sequences them frame by frame:
//!
//! - `Scanning`: frames go through analysis (every `analyze_every`th frame),
//!   classification and stabilisation; the reticle follows the hit tester.
//! - `Placed`: after [`ScanSession::place`], frames no longer produce
//!   classifications; pointer events edit the anchor and the renderer asks
//!   for [`ScanSession::render_pose`].
//!
//! Analysis may also run off the frame loop: [`ScanSession::begin_analysis`]
//! hands out a ticket tagged with the current epoch and
//! [`ScanSession::complete_analysis`] drops results whose epoch is stale
//! (placement or reset happened in between).
//!
//! The hit-test source is fixed when the session is created: a platform
//! provider is used for the whole session only if it is already `Ready`.
use crate::analysis::{FrameMetrics, SurfaceAnalyzer};
use crate::anchor::WorldAnchor;
use crate::classify::{Classification, ClassificationEngine};
use crate::config::SessionConfig;
use crate::diagnostics::{FrameReport, TimingBreakdown};
use crate::gesture::{GestureController, GestureMode, PointerEvent};
use crate::hit_test::{HitResult, HitSource, HitTestProvider, RayPlaneHitTester};
use crate::image::RgbaImage;
use crate::platform::OptionalService;
use crate::stabilize::TemporalStabilizer;
use crate::types::{CameraPose, ObjectPose, PoseUpdate};
use log::{debug, info};
use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Scanning,
    Placed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PoseSourceKind {
    /// Virtual reference planes around the camera.
    ReferencePlanes,
    /// Platform hit-test provider, reference planes on a miss.
    Platform,
}

/// Handle for an analysis dispatched outside the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisTicket {
    epoch: u64,
    frame_index: u64,
}

impl AnalysisTicket {
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

/// Placement reticle for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reticle {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
    /// Surface confirmed and the point comes from a real intersection.
    pub is_good: bool,
    pub source: HitSource,
}

pub struct ScanSession {
    config: SessionConfig,
    analyzer: SurfaceAnalyzer,
    engine: ClassificationEngine,
    stabilizer: TemporalStabilizer,
    hit_tester: RayPlaneHitTester,
    anchor: WorldAnchor,
    gestures: GestureController,
    provider: Option<Box<dyn HitTestProvider>>,
    phase: SessionPhase,
    epoch: u64,
    frame_index: u64,
    latest: Option<Classification>,
}

impl ScanSession {
    /// Session using the reference-plane hit tester only.
    pub fn new(config: SessionConfig) -> Self {
        let config = config.validated();
        info!(
            "ScanSession::new analyze_every={} window={}/{}",
            config.analyze_every, config.stabilizer.confirm, config.stabilizer.window
        );
        Self {
            analyzer: SurfaceAnalyzer::new(config.analyzer.clone()),
            engine: ClassificationEngine::new(config.thresholds.clone()),
            stabilizer: TemporalStabilizer::new(config.stabilizer.clone()),
            hit_tester: RayPlaneHitTester::new(config.hit_test.clone()),
            anchor: WorldAnchor::new(config.anchor.clone()),
            gestures: GestureController::new(config.gesture.clone()),
            provider: None,
            phase: SessionPhase::Scanning,
            epoch: 0,
            frame_index: 0,
            latest: None,
            config,
        }
    }

    /// Session that uses `platform` for hit testing if, and only if, it is
    /// ready right now. The choice holds for the session's lifetime.
    pub fn with_platform(
        config: SessionConfig,
        platform: &mut OptionalService<Box<dyn HitTestProvider>>,
    ) -> Self {
        let mut session = Self::new(config);
        let status = platform.status();
        session.provider = platform.take_ready();
        match session.pose_source() {
            PoseSourceKind::Platform => info!("ScanSession: using {} for hit testing", platform.name()),
            PoseSourceKind::ReferencePlanes => info!(
                "ScanSession: {} is {:?}, using reference planes",
                platform.name(),
                status
            ),
        }
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn pose_source(&self) -> PoseSourceKind {
        if self.provider.is_some() {
            PoseSourceKind::Platform
        } else {
            PoseSourceKind::ReferencePlanes
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn analyzer(&self) -> &SurfaceAnalyzer {
        &self.analyzer
    }

    pub fn stabilizer(&self) -> &TemporalStabilizer {
        &self.stabilizer
    }

    pub fn anchor(&self) -> &WorldAnchor {
        &self.anchor
    }

    pub fn gesture_mode(&self) -> GestureMode {
        self.gestures.mode()
    }

    /// Latest stabilised classification of the current scanning phase;
    /// `None` once the object is placed.
    pub fn classification(&self) -> Option<&Classification> {
        self.latest.as_ref()
    }

    /// True while scanning with a confirmed surface.
    pub fn can_place(&self) -> bool {
        self.phase == SessionPhase::Scanning && self.stabilizer.is_confirmed()
    }

    /// Submit one video frame (`None` when the source has nothing yet).
    /// Returns `None` outside the scanning phase.
    pub fn submit_frame(&mut self, frame: Option<&RgbaImage<'_>>) -> Option<Classification> {
        self.process_frame(frame).map(|report| report.stabilized)
    }

    /// Like [`submit_frame`](Self::submit_frame) with full diagnostics.
    pub fn process_frame(&mut self, frame: Option<&RgbaImage<'_>>) -> Option<FrameReport> {
        let ticket = self.next_ticket()?;
        let mut timings = TimingBreakdown::default();
        if !self.is_due(ticket.frame_index) {
            return Some(FrameReport {
                frame_index: ticket.frame_index,
                analyzed: false,
                metrics: None,
                raw: None,
                stabilized: self.latest.clone().unwrap_or_else(Classification::not_ready),
                timings,
            });
        }

        let analyzer = &self.analyzer;
        let metrics = timings.time("analyze", || match frame {
            Some(frame) => analyzer.analyze(frame),
            None => FrameMetrics::not_ready(),
        });
        let (raw, stabilized) = self.apply_metrics(&metrics, &mut timings);
        timings.finish();
        Some(FrameReport {
            frame_index: ticket.frame_index,
            analyzed: true,
            metrics: Some(metrics),
            raw: Some(raw),
            stabilized,
            timings,
        })
    }

    /// Reserve the next frame for deferred analysis. `None` when not
    /// scanning or when the throttle skips this frame.
    pub fn begin_analysis(&mut self) -> Option<AnalysisTicket> {
        let ticket = self.next_ticket()?;
        self.is_due(ticket.frame_index).then_some(ticket)
    }

    /// Apply metrics computed for `ticket`. Results from an earlier epoch or
    /// arriving after scanning ended are discarded.
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        metrics: &FrameMetrics,
    ) -> Option<Classification> {
        if ticket.epoch != self.epoch || self.phase != SessionPhase::Scanning {
            info!(
                "ScanSession: discarding stale analysis of frame {} (epoch {} != {} or {:?})",
                ticket.frame_index, ticket.epoch, self.epoch, self.phase
            );
            return None;
        }
        let mut timings = TimingBreakdown::default();
        let (_, stabilized) = self.apply_metrics(metrics, &mut timings);
        Some(stabilized)
    }

    /// Reticle for the current camera pose while scanning.
    pub fn reticle(&mut self, camera: Option<&CameraPose>) -> Option<Reticle> {
        if self.phase != SessionPhase::Scanning {
            return None;
        }
        let hit = self.hit_test(camera?)?;
        Some(Reticle {
            point: hit.point,
            normal: hit.normal,
            is_good: self.can_place() && hit.source != HitSource::Fallback,
            source: hit.source,
        })
    }

    /// Place the object where the centre ray meets the hit tester, facing
    /// back along the hit normal. Placement does not wait for confirmation;
    /// check [`can_place`](Self::can_place) first to gate it.
    pub fn place(&mut self, camera: Option<&CameraPose>) -> Option<ObjectPose> {
        let camera = camera?;
        if self.phase != SessionPhase::Scanning {
            return None;
        }
        let hit = self.hit_test(camera)?;
        self.place_at(camera, hit.point, hit.facing_rotation())
    }

    /// Place the object at an explicit point and rotation.
    pub fn place_at(
        &mut self,
        camera: &CameraPose,
        point: Point3<f32>,
        rotation: UnitQuaternion<f32>,
    ) -> Option<ObjectPose> {
        if self.phase != SessionPhase::Scanning {
            return None;
        }
        self.anchor.place(camera, point, rotation);
        self.gestures.reset();
        self.stabilizer.reset();
        self.latest = None;
        self.phase = SessionPhase::Placed;
        self.epoch += 1;
        self.anchor.pose()
    }

    /// Route a pointer event to the gesture controller. The camera at the
    /// time of the event defines the drag axes; without one the placement
    /// camera is used.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        camera: Option<&CameraPose>,
    ) -> Option<PoseUpdate> {
        let camera = camera
            .or(self.anchor.reference_camera_pose())
            .copied()
            .unwrap_or_else(CameraPose::identity);
        self.gestures.handle(event, &mut self.anchor, &camera)
    }

    /// Pose to draw the object with; `None` before placement or without a
    /// camera pose.
    pub fn render_pose(&self, camera: Option<&CameraPose>) -> Option<ObjectPose> {
        self.anchor.render_pose(camera?)
    }

    /// Back to an empty scanning phase. The pose source is kept.
    pub fn reset(&mut self) {
        self.stabilizer.reset();
        self.anchor.reset();
        self.gestures.reset();
        self.phase = SessionPhase::Scanning;
        self.epoch += 1;
        self.frame_index = 0;
        self.latest = None;
        info!("ScanSession::reset epoch={}", self.epoch);
    }

    fn next_ticket(&mut self) -> Option<AnalysisTicket> {
        if self.phase != SessionPhase::Scanning {
            return None;
        }
        self.frame_index += 1;
        Some(AnalysisTicket {
            epoch: self.epoch,
            frame_index: self.frame_index,
        })
    }

    fn is_due(&self, frame_index: u64) -> bool {
        (frame_index - 1) % self.config.analyze_every as u64 == 0
    }

    fn apply_metrics(
        &mut self,
        metrics: &FrameMetrics,
        timings: &mut TimingBreakdown,
    ) -> (Classification, Classification) {
        let engine = &self.engine;
        let raw = timings.time("classify", || engine.classify(metrics));
        if !metrics.ready {
            // Retry on the next frame; the window keeps its votes.
            debug!("ScanSession frame={} not ready", self.frame_index);
            let current = self.latest.clone().unwrap_or_else(Classification::not_ready);
            return (raw, current);
        }
        let stabilizer = &mut self.stabilizer;
        let stabilized = timings.time("stabilize", || stabilizer.push(raw.clone()));
        debug!(
            "ScanSession frame={} raw={}({:.2}) stable={} {}",
            self.frame_index,
            raw.surface_type(),
            raw.confidence(),
            stabilized.stable(),
            stabilized.reason()
        );
        self.latest = Some(stabilized.clone());
        (raw, stabilized)
    }

    fn hit_test(&mut self, camera: &CameraPose) -> Option<HitResult> {
        self.hit_tester
            .hit_test_with(camera, self.provider.as_deref_mut())
    }
}
