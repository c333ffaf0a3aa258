use crate::monotonic::MonotonicStats;
use crate::template::TemplateStats;
use crate::types::Peak;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PeakStatus {
    Deblended,
    Skipped { reason: String },
}

/// What happened to one peak on its way to a template.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakTrace {
    pub peak: Peak,
    pub status: PeakStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monotonic: Option<MonotonicStats>,
    /// Area of the template footprint after trimming zero-valued span ends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipped_area: Option<usize>,
    /// Template still carries significant flux on the parent footprint edge.
    pub edge_flux: bool,
    pub elapsed_ms: f64,
}

impl PeakTrace {
    pub fn skipped(peak: Peak, reason: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            peak,
            status: PeakStatus::Skipped {
                reason: reason.into(),
            },
            template: None,
            monotonic: None,
            clipped_area: None,
            edge_flux: false,
            elapsed_ms,
        }
    }

    pub fn is_deblended(&self) -> bool {
        self.status == PeakStatus::Deblended
    }
}
