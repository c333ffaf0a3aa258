//! Parameter types configuring the deblender stages.
//!
//! Defaults assume images normalised so the background noise is of order one;
//! set `sigma1` to the measured background sigma for real data.

use crate::monotonic::MonotonicOptions;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeblendParams {
    /// Half-size of the median pre-filter; `None` disables it.
    pub median_halfsize: Option<usize>,
    /// Background noise sigma used for the symmetry mask bits and edge check.
    pub sigma1: f64,
    /// Floor template pixels at zero.
    pub min_zero: bool,
    /// Run the monotonic enforcer on each template.
    pub enforce_monotonic: bool,
    pub monotonic: MonotonicOptions,
    /// Trim zero-valued pixels from the ends of template footprint spans.
    pub clip_to_nonzero: bool,
    /// Edge flux is significant at `edge_threshold_sigma · sigma1`.
    pub edge_threshold_sigma: f64,
}

impl Default for DeblendParams {
    fn default() -> Self {
        Self {
            median_halfsize: None,
            sigma1: 1.0,
            min_zero: true,
            enforce_monotonic: true,
            monotonic: MonotonicOptions::default(),
            clip_to_nonzero: false,
            edge_threshold_sigma: 3.0,
        }
    }
}
