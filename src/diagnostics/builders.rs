//! Stage runners shared by the deblender and standalone tools.
//!
//! Each runner performs one stage and returns both its product and the
//! diagnostics record the pipeline would have produced for it.

use crate::deblender::DeblendParams;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{PeakStatus, PeakTrace};
use crate::error::DeblendError;
use crate::footprint::Footprint;
use crate::image::{MaskedImage, PixelValue, SymmetryMaskBits};
use crate::monotonic::enforce_monotonic;
use crate::template::{build_symmetric_template, has_significant_flux_at_edge, SymmetricTemplate};
use crate::types::Peak;
use log::warn;
use std::time::Instant;

/// Template of one peak plus its trace; `template` is `None` for skipped peaks.
pub struct PeakStageOutput<T> {
    pub template: Option<SymmetricTemplate<T>>,
    pub trace: PeakTrace,
}

/// Build, enforce, and optionally clip the template of `peak`.
///
/// A peak outside `footprint` is skipped with a warning; every other error is
/// returned.
pub fn run_peak_stage<T: PixelValue>(
    image: &MaskedImage<T>,
    footprint: &Footprint,
    peak: Peak,
    params: &DeblendParams,
    bits: SymmetryMaskBits,
) -> Result<PeakStageOutput<T>, DeblendError> {
    let start = Instant::now();
    let sigma1 = cast::<T>(params.sigma1);
    let mut template =
        match build_symmetric_template(image, footprint, peak, sigma1, params.min_zero, bits) {
            Ok(t) => t,
            Err(err) if err.is_soft() => {
                warn!("skipping peak ({}, {}): {err}", peak.ix, peak.iy);
                return Ok(PeakStageOutput {
                    template: None,
                    trace: PeakTrace::skipped(peak, err.to_string(), elapsed_ms(start)),
                });
            }
            Err(err) => return Err(err),
        };

    let monotonic = params.enforce_monotonic.then(|| {
        enforce_monotonic(
            &mut template.image,
            &template.footprint,
            peak,
            &params.monotonic,
        )
    });

    let clipped_area = if params.clip_to_nonzero {
        template.footprint = template.footprint.clip_to_nonzero(&template.image);
        Some(template.footprint.area())
    } else {
        None
    };

    let threshold = cast::<T>(params.edge_threshold_sigma * params.sigma1);
    let edge_flux = has_significant_flux_at_edge(&template.image, footprint, threshold);

    let trace = PeakTrace {
        peak,
        status: PeakStatus::Deblended,
        template: Some(template.stats),
        monotonic,
        clipped_area,
        edge_flux,
        elapsed_ms: elapsed_ms(start),
    };
    Ok(PeakStageOutput {
        template: Some(template),
        trace,
    })
}

fn cast<T: PixelValue>(v: f64) -> T {
    num_traits::cast(v).unwrap_or_else(T::nan)
}
