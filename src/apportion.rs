//! Flux apportionment across sibling templates.
//!
//! Every image pixel is split among the templates in proportion to their
//! non-negative values there, so the portions of a pixel sum back to the
//! image value. Pixels where all templates are zero (or negative) receive
//! nothing; their flux is reported as unassigned.

use crate::footprint::Footprint;
use crate::image::{MaskedImage, PixelValue, Plane};
use crate::types::BBox;
use log::debug;
use serde::Serialize;

#[derive(Clone, Debug)]
pub struct Apportionment<T> {
    /// One portion per template, sharing the template's bounding box.
    pub portions: Vec<MaskedImage<T>>,
    pub stats: ApportionStats,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApportionStats {
    /// Footprint pixels where every template is zero.
    pub unassigned_pixels: usize,
    pub unassigned_flux: f64,
}

/// Scratch sum of clipped template values over the union of template boxes.
struct SumRaster<T> {
    bbox: BBox,
    plane: Plane<T>,
}

impl<T: PixelValue> SumRaster<T> {
    fn accumulate(templates: &[MaskedImage<T>]) -> Option<Self> {
        let bbox = templates
            .iter()
            .map(MaskedImage::bbox)
            .reduce(|acc, b| acc.union(&b))?;
        let mut plane = Plane::filled(bbox.width(), bbox.height(), T::zero());
        for tmpl in templates {
            let ox = (tmpl.x0() - bbox.x0) as usize;
            let oy = (tmpl.y0() - bbox.y0) as usize;
            for ty in 0..tmpl.height() {
                for tx in 0..tmpl.width() {
                    let v = tmpl.image().get(tx, ty).max(T::zero());
                    let i = plane.idx(ox + tx, oy + ty);
                    plane.data[i] = plane.data[i] + v;
                }
            }
        }
        Some(Self { bbox, plane })
    }

    #[inline]
    fn get(&self, x: i32, y: i32) -> T {
        if !self.bbox.contains(x, y) {
            return T::zero();
        }
        self.plane
            .get((x - self.bbox.x0) as usize, (y - self.bbox.y0) as usize)
    }
}

/// Split `image` among `templates`.
///
/// Output `i` covers the bounding box of `templates[i]`; its mask and
/// variance are copied from `image`. Template pixels outside `image` stay zero.
pub fn apportion<T: PixelValue>(
    image: &MaskedImage<T>,
    footprint: &Footprint,
    templates: &[MaskedImage<T>],
) -> Apportionment<T> {
    let Some(sum) = SumRaster::accumulate(templates) else {
        return Apportionment {
            portions: Vec::new(),
            stats: unassigned(image, footprint, |_, _| true),
        };
    };

    let portions: Vec<MaskedImage<T>> = templates
        .iter()
        .map(|tmpl| {
            let mut out = MaskedImage::new(tmpl.bbox());
            for ty in 0..tmpl.height() {
                let y = tmpl.y0() + ty as i32;
                for tx in 0..tmpl.width() {
                    let x = tmpl.x0() + tx as i32;
                    let Some((ix, iy)) = image.local(x, y) else {
                        continue;
                    };
                    out.mask_mut().set(tx, ty, image.mask().get(ix, iy));
                    out.variance_mut().set(tx, ty, image.variance().get(ix, iy));
                    let s = sum.get(x, y);
                    if s == T::zero() {
                        continue;
                    }
                    let t = tmpl.image().get(tx, ty).max(T::zero());
                    out.image_mut().set(tx, ty, image.image().get(ix, iy) * t / s);
                }
            }
            out
        })
        .collect();

    let stats = unassigned(image, footprint, |x, y| sum.get(x, y) == T::zero());
    debug!(
        "apportion: templates={} union={} unassigned_pixels={} unassigned_flux={:.3}",
        templates.len(),
        sum.bbox,
        stats.unassigned_pixels,
        stats.unassigned_flux
    );
    Apportionment { portions, stats }
}

fn unassigned<T: PixelValue>(
    image: &MaskedImage<T>,
    footprint: &Footprint,
    zero_sum: impl Fn(i32, i32) -> bool,
) -> ApportionStats {
    let mut stats = ApportionStats::default();
    for (x, y) in footprint.pixels() {
        if !zero_sum(x, y) {
            continue;
        }
        stats.unassigned_pixels += 1;
        if let Some(v) = image.get(x, y) {
            stats.unassigned_flux += v.to_f64().unwrap_or(0.0);
        }
    }
    stats
}
