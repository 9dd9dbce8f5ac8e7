//! JSON-backed configuration.
//!
//! - [`SessionConfig`]: every tunable of the scanning/placement core.
//! - [`scan_tool`]: configuration of the `surface_scan` demo binary.
pub mod scan_tool;

use crate::analysis::AnalyzerOptions;
use crate::anchor::AnchorOptions;
use crate::classify::{ClassifierThresholds, ThresholdPreset};
use crate::error::{Error, Result};
use crate::gesture::GestureOptions;
use crate::hit_test::HitTestOptions;
use crate::stabilize::StabilizerOptions;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub analyzer: AnalyzerOptions,
    /// When set, replaces `thresholds` with the named preset.
    pub preset: Option<ThresholdPreset>,
    pub thresholds: ClassifierThresholds,
    pub stabilizer: StabilizerOptions,
    pub hit_test: HitTestOptions,
    pub gesture: GestureOptions,
    pub anchor: AnchorOptions,
    /// Analyze every Kth submitted frame (>= 1).
    pub analyze_every: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerOptions::default(),
            preset: None,
            thresholds: ClassifierThresholds::default(),
            stabilizer: StabilizerOptions::default(),
            hit_test: HitTestOptions::default(),
            gesture: GestureOptions::default(),
            anchor: AnchorOptions::default(),
            analyze_every: 2,
        }
    }
}

impl SessionConfig {
    /// Resolve the preset and normalise out-of-range values.
    pub fn validated(mut self) -> Self {
        if let Some(preset) = self.preset.take() {
            self.thresholds = preset.thresholds();
        }
        self.analyzer = self.analyzer.validated();
        self.stabilizer = self.stabilizer.validated();
        self.hit_test = self.hit_test.validated();
        self.anchor = self.anchor.validated();
        self.analyze_every = self.analyze_every.max(1);
        self
    }
}

/// Load a [`SessionConfig`] from a JSON file. Missing fields take defaults.
pub fn load_config(path: &Path) -> Result<SessionConfig> {
    load_json(path)
}

pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| Error::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}
