//! Serializable per-frame diagnostics for tooling and logs.
//!
//! `FrameReport` is what [`ScanSession::process_frame`](crate::ScanSession)
//! returns: the stabilised classification plus, for analysed frames, the raw
//! metrics, the per-frame verdict and stage timings.
pub mod frame;
pub mod timing;

pub use frame::FrameReport;
pub use timing::{StageTiming, TimingBreakdown};
