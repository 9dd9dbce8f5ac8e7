//! Configuration of the `surface_scan` demo: one still image is replayed as
//! a camera feed, the anchor is placed once the surface is confirmed, and
//! the camera then drifts by a fixed step per frame.
use super::{load_json, SessionConfig};
use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ScanToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub output: ScanOutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Frames submitted while scanning.
    pub scan_frames: usize,
    /// Frames rendered after placement.
    pub placed_frames: usize,
    /// Camera translation per placed frame, metres.
    pub camera_step: [f32; 3],
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scan_frames: 30,
            placed_frames: 10,
            camera_step: [0.01, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanOutputConfig {
    /// Where to write the JSON run report; printed to stdout when absent.
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<ScanToolConfig> {
    load_json(path)
}
