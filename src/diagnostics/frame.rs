use super::TimingBreakdown;
use crate::analysis::FrameMetrics;
use crate::classify::Classification;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    /// 1-based index of the frame within the scanning phase.
    pub frame_index: u64,
    /// False when the frame was skipped by the analysis throttle.
    pub analyzed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<FrameMetrics>,
    /// Per-frame verdict before stabilisation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Classification>,
    pub stabilized: Classification,
    pub timings: TimingBreakdown,
}
