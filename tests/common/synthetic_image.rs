#![allow(dead_code)]

use footprint_deblend::footprint::{Footprint, Span};
use footprint_deblend::image::MaskedImage;
use footprint_deblend::types::BBox;

/// Circular Gaussian source.
#[derive(Clone, Copy, Debug)]
pub struct Source {
    pub x: f32,
    pub y: f32,
    pub amplitude: f32,
    pub sigma: f32,
}

impl Source {
    pub fn new(x: f32, y: f32, amplitude: f32, sigma: f32) -> Self {
        Self {
            x,
            y,
            amplitude,
            sigma,
        }
    }

    fn value(&self, x: i32, y: i32) -> f32 {
        let r2 = (x as f32 - self.x).powi(2) + (y as f32 - self.y).powi(2);
        self.amplitude * (-0.5 * r2 / (self.sigma * self.sigma)).exp()
    }
}

/// Renders `sources` over `bbox` with unit variance and a clear mask.
pub fn gaussian_blend(bbox: BBox, sources: &[Source]) -> MaskedImage<f32> {
    let mut img = MaskedImage::new(bbox);
    img.variance_mut().fill(1.0);
    for y in bbox.y0..=bbox.y1 {
        for x in bbox.x0..=bbox.x1 {
            let v = sources.iter().map(|s| s.value(x, y)).sum();
            img.set(x, y, v);
        }
    }
    img
}

/// Adds uniform noise in `[-amplitude, amplitude)` to every pixel.
pub fn add_noise(img: &mut MaskedImage<f32>, rng: &mut Lcg, amplitude: f32) {
    for v in img.image_mut().data.iter_mut() {
        *v += amplitude * (2.0 * rng.next_f32() - 1.0);
    }
}

/// Small deterministic generator so test inputs are reproducible.
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u32
    }

    /// Uniform integer in `[lo, hi]`.
    pub fn range(&mut self, lo: i32, hi: i32) -> i32 {
        assert!(lo <= hi);
        lo + (self.next_u32() % (hi - lo + 1) as u32) as i32
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Random footprint inside `bbox`: every row gets up to three spans.
/// Spans may overlap; the footprint normalizes them.
pub fn random_footprint(rng: &mut Lcg, bbox: BBox) -> Footprint {
    let mut spans = Vec::new();
    for y in bbox.y0..=bbox.y1 {
        for _ in 0..rng.range(0, 3) {
            let a = rng.range(bbox.x0, bbox.x1);
            let b = rng.range(bbox.x0, bbox.x1);
            spans.push(Span::new(y, a.min(b), a.max(b)));
        }
    }
    Footprint::from_spans(spans)
}
