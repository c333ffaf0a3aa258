//! Wall-clock bookkeeping for deblend stages.
//!
//! Stage labels used by the deblender: `median` (only when the pre-filter
//! runs), `templates` (all peaks, including the parallel fan-out) and
//! `apportion`.

use serde::Serialize;
use std::time::Instant;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: &'static str,
    pub elapsed_ms: f64,
}

/// Stage timings in execution order plus the end-to-end total.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Append a finished stage. `total_ms` is set separately once the whole
    /// call returns, so it also covers work between stages.
    pub fn push(&mut self, label: &'static str, elapsed_ms: f64) {
        self.stages.push(StageTiming { label, elapsed_ms });
    }

    /// Sum of the recorded stages, at most `total_ms`.
    pub fn staged_ms(&self) -> f64 {
        self.stages.iter().map(|s| s.elapsed_ms).sum()
    }
}

pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
