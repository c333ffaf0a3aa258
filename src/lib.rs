#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod deblender;
pub mod diagnostics;
pub mod error;
pub mod footprint;
pub mod image;
pub mod types;

// Individual stages, usable on their own.
pub mod apportion;
pub mod filters;
pub mod monotonic;
pub mod template;

// Demo configuration.
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::deblender::{DeblendParams, DeblendReport, Deblender, PeakResult};
pub use crate::error::DeblendError;
pub use crate::footprint::{Footprint, Span};
pub use crate::types::{BBox, Peak};

pub use crate::diagnostics::PipelineTrace;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use footprint_deblend::prelude::*;
///
/// let bbox = BBox::new(0, 0, 4, 0);
/// let mut image = MaskedImage::<f32>::new(bbox);
/// for (x, v) in [1.0, 3.0, 9.0, 3.0, 1.0].into_iter().enumerate() {
///     image.set(x as i32, 0, v);
/// }
/// let footprint = Footprint::from_bbox(&bbox);
/// let report = Deblender::new(DeblendParams::default())
///     .deblend(&image, &footprint, &[Peak::new(2, 0)], &MaskPlanes::with_deblend_planes())
///     .expect("valid inputs");
/// assert_eq!(report.trace.deblended_count(), 1);
/// ```
pub mod prelude {
    pub use crate::image::{MaskPlanes, MaskedImage};
    pub use crate::{BBox, DeblendError, DeblendParams, DeblendReport, Deblender, Footprint, Peak, Span};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    // Stage runners / builders.
    pub use crate::apportion::{apportion, ApportionStats, Apportionment};
    pub use crate::diagnostics::builders::{run_peak_stage, PeakStageOutput};
    pub use crate::filters::median_filter;
    pub use crate::footprint::symmetrize;
    pub use crate::monotonic::{enforce_monotonic, MonotonicOptions, MonotonicStats};
    pub use crate::template::{
        build_symmetric_template, has_significant_flux_at_edge, significant_edge_pixels,
        SymmetricTemplate, TemplateStats,
    };

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        ApportionStage, InputDescriptor, MedianStage, PeakStatus, PeakTrace, StageTiming,
        TimingBreakdown,
    };
}
