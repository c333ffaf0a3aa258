//! Diagnostics data model returned by the deblender and the demo binary.
//!
//! `DeblendReport` (see [`crate::deblender`]) bundles the per-peak images with
//! a serializable [`PipelineTrace`] describing every stage that ran. Nothing
//! in the pipeline reads these records back; they exist for callers and tools.

pub mod builders;
pub mod peak;
pub mod pipeline;
pub mod timing;

pub use peak::{PeakStatus, PeakTrace};
pub use pipeline::{ApportionStage, InputDescriptor, MedianStage, PipelineTrace};
pub use timing::{StageTiming, TimingBreakdown};
