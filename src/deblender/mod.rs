//! Deblender orchestrating the per-peak template pipeline.
//!
//! Overview
//! - Optionally median-filters the image before any template is built.
//! - For every peak: symmetrizes the footprint about the peak, builds the
//!   symmetric template, enforces outward monotonicity and (optionally) trims
//!   zero-valued span ends. Peaks are independent and run in parallel with
//!   the `parallel` feature.
//! - Once all templates exist, splits the original (unfiltered) image flux
//!   among them so the per-peak images sum back to the input.
//!
//! Modules
//! - [`params`] – configuration types used by the deblender and demo.
//! - `pipeline` – the [`Deblender`] implementation.

pub mod params;
mod pipeline;

pub use params::DeblendParams;
pub use pipeline::{DeblendReport, Deblender, PeakResult};
