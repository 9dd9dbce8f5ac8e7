use nalgebra::{Point3, Translation3, Vector3};
use serde::Serialize;
use std::env;
use std::path::Path;
use surface_anchor::config::scan_tool::load_config;
use surface_anchor::diagnostics::FrameReport;
use surface_anchor::image::io::{load_rgba_image, write_json_file};
use surface_anchor::session::{Reticle, ScanSession};
use surface_anchor::{CameraPose, Classification, ObjectPose};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;
    let image = load_rgba_image(&config.input).map_err(|e| e.to_string())?;
    let frame = image.as_view();

    let mut session = ScanSession::new(config.session);
    let mut camera = CameraPose::identity();
    let mut frames = Vec::with_capacity(config.simulation.scan_frames);
    let mut confirmed_at = None;
    for _ in 0..config.simulation.scan_frames {
        let Some(report) = session.process_frame(Some(&frame)) else {
            break;
        };
        let confirmed = session.can_place();
        frames.push(report);
        if confirmed {
            confirmed_at = frames.last().map(|r| r.frame_index);
            break;
        }
    }

    let final_classification = session.classification().cloned();
    let reticle = session.reticle(Some(&camera));
    let placed = if confirmed_at.is_some() {
        session.place(Some(&camera))
    } else {
        None
    };

    let step = Vector3::from(config.simulation.camera_step);
    let mut track = Vec::new();
    if placed.is_some() {
        for i in 0..config.simulation.placed_frames {
            camera = Translation3::from(step) * camera;
            if let Some(pose) = session.render_pose(Some(&camera)) {
                track.push(TrackSample {
                    frame: i + 1,
                    camera_position: Point3::from(camera.translation.vector),
                    object: pose,
                });
            }
        }
    }

    let summary = ScanSummary {
        input: config.input.display().to_string(),
        width: image.width(),
        height: image.height(),
        frames_submitted: frames.len(),
        confirmed_at,
        final_classification,
        reticle,
        placed,
        track,
        frames,
    };

    match &config.output.report_json {
        Some(path) => {
            write_json_file(path, &summary).map_err(|e| e.to_string())?;
            println!("Saved scan report to {}", path.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
            println!("{json}");
        }
    }

    match (&summary.final_classification, confirmed_at) {
        (Some(c), Some(frame)) => eprintln!(
            "Confirmed {} at frame {} (confidence {:.2})",
            c.surface_type(),
            frame,
            c.confidence()
        ),
        (Some(c), None) => eprintln!(
            "Not confirmed after {} frames: {} ({})",
            summary.frames_submitted,
            c.surface_type(),
            c.reason()
        ),
        (None, _) => eprintln!("No frames analysed"),
    }

    Ok(())
}

fn usage() -> String {
    "Usage: surface_scan <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackSample {
    frame: usize,
    camera_position: Point3<f32>,
    object: ObjectPose,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanSummary {
    input: String,
    width: usize,
    height: usize,
    frames_submitted: usize,
    confirmed_at: Option<u64>,
    final_classification: Option<Classification>,
    reticle: Option<Reticle>,
    placed: Option<ObjectPose>,
    track: Vec<TrackSample>,
    frames: Vec<FrameReport>,
}
