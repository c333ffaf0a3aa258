//! Per-peak flux templates.
//!
//! - [`build_symmetric_template`] – pixel-wise minimum of each pixel and its
//!   point reflection over the symmetrized footprint.
//! - [`significant_edge_pixels`] / [`has_significant_flux_at_edge`] – detect
//!   templates that run into the footprint boundary with real flux.

mod edge;
mod symmetric;

pub use edge::{has_significant_flux_at_edge, significant_edge_pixels};
pub use symmetric::{build_symmetric_template, SymmetricTemplate, TemplateStats};
