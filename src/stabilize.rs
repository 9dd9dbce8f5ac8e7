//! Temporal debouncing of per-frame classifications.
//!
//! A fixed-capacity window keeps the last N classifications. The surface
//! counts as confirmed once at least M of them were planes; until then the
//! latest raw classification is passed through unchanged. The price is
//! roughly `N / fps` seconds of latency before placement is offered.
use crate::classify::{Classification, Reason};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerOptions {
    /// History capacity N.
    pub window: usize,
    /// Plane votes M required for confirmation (`1..=window`).
    pub confirm: usize,
}

impl Default for StabilizerOptions {
    fn default() -> Self {
        Self {
            window: 12,
            confirm: 8,
        }
    }
}

impl StabilizerOptions {
    pub fn validated(mut self) -> Self {
        self.window = self.window.max(1);
        self.confirm = self.confirm.clamp(1, self.window);
        self
    }
}

/// Sliding-window majority filter over [`Classification`]s.
#[derive(Clone, Debug)]
pub struct TemporalStabilizer {
    options: StabilizerOptions,
    history: VecDeque<Classification>,
}

impl Default for TemporalStabilizer {
    fn default() -> Self {
        Self::new(StabilizerOptions::default())
    }
}

impl TemporalStabilizer {
    pub fn new(options: StabilizerOptions) -> Self {
        let options = options.validated();
        Self {
            history: VecDeque::with_capacity(options.window),
            options,
        }
    }

    pub fn options(&self) -> &StabilizerOptions {
        &self.options
    }

    /// Record `classification` (evicting the oldest entry at capacity) and
    /// return the debounced view of the window.
    pub fn push(&mut self, classification: Classification) -> Classification {
        if self.history.len() == self.options.window {
            self.history.pop_front();
        }
        self.history.push_back(classification);
        self.current()
            .unwrap_or_else(Classification::not_ready)
    }

    /// Debounced view of the current window, `None` when empty.
    pub fn current(&self) -> Option<Classification> {
        let latest = self.history.back()?;
        let positives = self.positives();
        if positives < self.options.confirm {
            return Some(latest.clone());
        }

        let mut sum = 0.0f32;
        let mut last_positive = None;
        for c in self.history.iter().filter(|c| c.is_plane()) {
            sum += c.confidence();
            last_positive = Some(c);
        }
        let last_positive = last_positive?;
        let reason = Reason::Confirmed {
            positives,
            window: self.history.len(),
        };
        debug!(
            "TemporalStabilizer confirmed {}/{} type={}",
            positives,
            self.history.len(),
            last_positive.surface_type()
        );
        Some(
            Classification::new(
                last_positive.surface_type(),
                true,
                sum / positives as f32,
                reason,
            )
            .into_stable(),
        )
    }

    pub fn is_confirmed(&self) -> bool {
        self.positives() >= self.options.confirm
    }

    /// Number of plane entries in the window.
    pub fn positives(&self) -> usize {
        self.history.iter().filter(|c| c.is_plane()).count()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}
