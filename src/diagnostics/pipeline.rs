use crate::apportion::ApportionStats;
use crate::diagnostics::{PeakTrace, TimingBreakdown};
use crate::types::BBox;
use serde::Serialize;

/// End-to-end trace describing one deblend call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<MedianStage>,
    pub peaks: Vec<PeakTrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apportion: Option<ApportionStage>,
}

impl PipelineTrace {
    pub fn deblended_count(&self) -> usize {
        self.peaks.iter().filter(|p| p.is_deblended()).count()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub image: BBox,
    pub footprint: BBox,
    pub footprint_area: usize,
    pub peaks: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedianStage {
    pub halfsize: usize,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApportionStage {
    pub elapsed_ms: f64,
    pub templates: usize,
    #[serde(flatten)]
    pub stats: ApportionStats,
}
