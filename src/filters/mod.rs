//! Image smoothing applied before template construction.

mod median;

pub use median::median_filter;
