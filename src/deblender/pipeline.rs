//! Deblender pipeline splitting one blended footprint into per-peak images.
//!
//! Typical usage:
//! ```no_run
//! use footprint_deblend::prelude::*;
//!
//! # fn example(image: MaskedImage<f32>, footprint: Footprint) {
//! let deblender = Deblender::new(DeblendParams::default());
//! let planes = MaskPlanes::with_deblend_planes();
//! let peaks = [Peak::new(10, 12), Peak::new(18, 12)];
//! let report = deblender
//!     .deblend(&image, &footprint, &peaks, &planes)
//!     .expect("valid inputs");
//! for child in report.peaks.iter().flatten() {
//!     println!("peak {:?}: {} px", child.peak, child.footprint.area());
//! }
//! # }
//! ```

use super::params::DeblendParams;
use crate::apportion::apportion;
use crate::diagnostics::builders::{run_peak_stage, PeakStageOutput};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{
    ApportionStage, InputDescriptor, MedianStage, PipelineTrace, TimingBreakdown,
};
use crate::error::DeblendError;
use crate::filters::median_filter;
use crate::footprint::Footprint;
use crate::image::{MaskBitLookup, MaskedImage, PixelValue, SymmetryMaskBits};
use crate::monotonic::MonotonicOptions;
use crate::types::Peak;
use log::debug;
use std::borrow::Cow;
use std::time::Instant;

/// Deblended child of one peak.
#[derive(Clone, Debug)]
pub struct PeakResult<T> {
    pub peak: Peak,
    /// Footprint the template was built over.
    pub footprint: Footprint,
    /// Symmetric, monotonic template before apportionment.
    pub template: MaskedImage<T>,
    /// Share of the image flux assigned to this peak.
    pub flux: MaskedImage<T>,
}

/// Result of [`Deblender::deblend`]: one slot per input peak (`None` when the
/// peak was skipped) plus the trace.
#[derive(Clone, Debug)]
pub struct DeblendReport<T> {
    pub peaks: Vec<Option<PeakResult<T>>>,
    pub trace: PipelineTrace,
}

pub struct Deblender {
    params: DeblendParams,
}

impl Deblender {
    /// Create a deblender with the supplied parameters.
    pub fn new(params: DeblendParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &DeblendParams {
        &self.params
    }

    /// Run the full pipeline over `footprint` of `image`.
    ///
    /// `masks` supplies the bits for the symmetry mask planes. Fails when the
    /// footprint is empty or leaves the image, or a mask plane is missing.
    pub fn deblend<T: PixelValue>(
        &self,
        image: &MaskedImage<T>,
        footprint: &Footprint,
        peaks: &[Peak],
        masks: &dyn MaskBitLookup,
    ) -> Result<DeblendReport<T>, DeblendError> {
        let total_start = Instant::now();
        let bits = SymmetryMaskBits::resolve(masks)?;
        let Some(fbb) = footprint.bbox() else {
            return Err(DeblendError::EmptyFootprint);
        };
        if !image.bbox().contains_box(&fbb) {
            return Err(DeblendError::FootprintOutsideImage {
                footprint: fbb,
                image: image.bbox(),
            });
        }
        let mut timings = TimingBreakdown::default();

        let (smoothed, median) = match self.params.median_halfsize {
            Some(halfsize) => {
                let start = Instant::now();
                let filtered = median_filter(image, halfsize);
                let stage = MedianStage {
                    halfsize,
                    elapsed_ms: elapsed_ms(start),
                };
                timings.push("median", stage.elapsed_ms);
                (Cow::Owned(filtered), Some(stage))
            }
            None => (Cow::Borrowed(image), None),
        };

        let templates_start = Instant::now();
        let outputs = self.run_peaks(&smoothed, footprint, peaks, bits)?;
        timings.push("templates", elapsed_ms(templates_start));

        let mut traces = Vec::with_capacity(outputs.len());
        let mut built = Vec::with_capacity(outputs.len());
        for PeakStageOutput { template, trace } in outputs {
            traces.push(trace);
            built.push(template);
        }

        let apportion_start = Instant::now();
        let images: Vec<MaskedImage<T>> = built
            .iter()
            .flatten()
            .map(|t| t.image.clone())
            .collect();
        let split = apportion(image, footprint, &images);
        let apportion_stage = ApportionStage {
            elapsed_ms: elapsed_ms(apportion_start),
            templates: images.len(),
            stats: split.stats,
        };
        timings.push("apportion", apportion_stage.elapsed_ms);

        let mut portions = split.portions.into_iter();
        let children: Vec<Option<PeakResult<T>>> = built
            .into_iter()
            .zip(peaks)
            .map(|(template, &peak)| {
                let template = template?;
                let flux = portions.next()?;
                Some(PeakResult {
                    peak,
                    footprint: template.footprint,
                    template: template.image,
                    flux,
                })
            })
            .collect();

        timings.total_ms = elapsed_ms(total_start);
        let trace = PipelineTrace {
            input: InputDescriptor {
                image: image.bbox(),
                footprint: fbb,
                footprint_area: footprint.area(),
                peaks: peaks.len(),
            },
            timings,
            median,
            peaks: traces,
            apportion: Some(apportion_stage),
        };
        debug!(
            "deblend: peaks={} deblended={} total_ms={:.3} staged_ms={:.3}",
            peaks.len(),
            trace.deblended_count(),
            trace.timings.total_ms,
            trace.timings.staged_ms()
        );

        Ok(DeblendReport {
            peaks: children,
            trace,
        })
    }

    #[cfg(feature = "parallel")]
    fn run_peaks<T: PixelValue>(
        &self,
        image: &MaskedImage<T>,
        footprint: &Footprint,
        peaks: &[Peak],
        bits: SymmetryMaskBits,
    ) -> Result<Vec<PeakStageOutput<T>>, DeblendError> {
        use rayon::prelude::*;

        peaks
            .par_iter()
            .map(|&peak| run_peak_stage(image, footprint, peak, &self.params, bits))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run_peaks<T: PixelValue>(
        &self,
        image: &MaskedImage<T>,
        footprint: &Footprint,
        peaks: &[Peak],
        bits: SymmetryMaskBits,
    ) -> Result<Vec<PeakStageOutput<T>>, DeblendError> {
        peaks
            .iter()
            .map(|&peak| run_peak_stage(image, footprint, peak, &self.params, bits))
            .collect()
    }

    /// Update the background sigma.
    pub fn set_sigma1(&mut self, sigma1: f64) {
        self.params.sigma1 = sigma1;
    }

    /// Update the median pre-filter half-size (`None` disables it).
    pub fn set_median_halfsize(&mut self, halfsize: Option<usize>) {
        self.params.median_halfsize = halfsize;
    }

    /// Update the shadow-cast tuning of the monotonic enforcer.
    pub fn set_monotonic_options(&mut self, options: MonotonicOptions) {
        self.params.monotonic = options;
    }
}
