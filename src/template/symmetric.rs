use crate::error::DeblendError;
use crate::footprint::{symmetrize, Footprint};
use crate::image::{MaskPixel, MaskedImage, PixelValue, SymmetryMaskBits};
use crate::types::Peak;
use log::debug;
use serde::Serialize;

/// Counts gathered while building one template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStats {
    pub symmetric_area: usize,
    /// Pixels lowered by at least `sigma1`.
    pub clipped_1sig: usize,
    /// Pixels lowered by at least `3 · sigma1`.
    pub clipped_3sig: usize,
}

#[derive(Clone, Debug)]
pub struct SymmetricTemplate<T> {
    /// Template cropped to the bounding box of `footprint`.
    pub image: MaskedImage<T>,
    /// Point-symmetric subset of the parent footprint.
    pub footprint: Footprint,
    pub stats: TemplateStats,
}

/// Build the symmetric template of `peak` inside `footprint`.
///
/// Each pixel of the symmetric footprint and its reflection both receive the
/// smaller of the two image values (floored at zero when `min_zero`). Pixels
/// lowered by at least 1σ / 3σ get the corresponding bit of `bits` in the
/// template mask; the variance plane is copied from `image`.
///
/// The returned template is an owned copy cropped to the symmetric footprint's
/// bounding box. Fails softly with [`DeblendError::PeakNotInFootprint`], and
/// with [`DeblendError::FootprintOutsideImage`] when `image` does not cover
/// the footprint.
pub fn build_symmetric_template<T: PixelValue>(
    image: &MaskedImage<T>,
    footprint: &Footprint,
    peak: Peak,
    sigma1: T,
    min_zero: bool,
    bits: SymmetryMaskBits,
) -> Result<SymmetricTemplate<T>, DeblendError> {
    let (cx, cy) = (peak.ix, peak.iy);
    let sym = symmetrize(footprint, cx, cy)?;
    let (Some(fbb), Some(sbb)) = (footprint.bbox(), sym.bbox()) else {
        return Err(DeblendError::PeakNotInFootprint { x: cx, y: cy });
    };
    if !image.bbox().contains_box(&fbb) {
        return Err(DeblendError::FootprintOutsideImage {
            footprint: fbb,
            image: image.bbox(),
        });
    }

    // Sized to the parent footprint so later clipping stays addressable.
    let mut tmpl = MaskedImage::new(fbb);
    let one = sigma1;
    let three = sigma1 + sigma1 + sigma1;
    let mut stats = TemplateStats {
        symmetric_area: sym.area(),
        ..TemplateStats::default()
    };

    let mut flag = |tmpl: &mut MaskedImage<T>, x: i32, y: i32, orig: T, val: T| {
        // Only the pixel actually lowered is flagged, even for sigma1 == 0.
        if orig <= val {
            return;
        }
        let mut set: MaskPixel = 0;
        if orig >= val + three {
            set |= bits.one_sigma | bits.three_sigma;
            stats.clipped_3sig += 1;
        }
        if orig >= val + one {
            set |= bits.one_sigma;
            stats.clipped_1sig += 1;
        }
        tmpl.or_mask(x, y, set);
    };

    let spans = sym.spans();
    let mut f = 0usize;
    let mut b = spans.len();
    // The k-th span from the front mirrors the k-th span from the back.
    while f < b {
        b -= 1;
        let fs = spans[f];
        let bs = spans[b];
        debug_assert_eq!(bs.y, 2 * cy - fs.y);
        debug_assert_eq!((bs.x0, bs.x1), (2 * cx - fs.x1, 2 * cx - fs.x0));
        // A self-mirrored span is walked up to its centre only.
        let x_end = if f == b { cx } else { fs.x1 };
        for fx in fs.x0..=x_end {
            let bx = 2 * cx - fx;
            let (Some(pf), Some(pb)) = (image.get(fx, fs.y), image.get(bx, bs.y)) else {
                continue;
            };
            let mut val = pf.min(pb);
            if min_zero {
                val = val.max(T::zero());
            }
            tmpl.set(fx, fs.y, val);
            tmpl.set(bx, bs.y, val);
            copy_variance(image, &mut tmpl, fx, fs.y);
            copy_variance(image, &mut tmpl, bx, bs.y);
            flag(&mut tmpl, fx, fs.y, pf, val);
            if (fx, fs.y) != (bx, bs.y) {
                flag(&mut tmpl, bx, bs.y, pb, val);
            }
        }
        f += 1;
    }

    let image = tmpl.crop(&sbb)?;
    debug!(
        "symmetric template: peak=({cx}, {cy}) area={} clipped1={} clipped3={}",
        stats.symmetric_area, stats.clipped_1sig, stats.clipped_3sig
    );
    Ok(SymmetricTemplate {
        image,
        footprint: sym,
        stats,
    })
}

fn copy_variance<T: PixelValue>(src: &MaskedImage<T>, dst: &mut MaskedImage<T>, x: i32, y: i32) {
    if let (Some((sx, sy)), Some((dx, dy))) = (src.local(x, y), dst.local(x, y)) {
        let v = src.variance().get(sx, sy);
        dst.variance_mut().set(dx, dy, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::Span;
    use crate::image::{MaskPlanes, Plane, SymmetryMaskBits};
    use crate::types::BBox;

    fn bits() -> SymmetryMaskBits {
        SymmetryMaskBits::resolve(&MaskPlanes::with_deblend_planes()).expect("registered")
    }

    fn image_from_rows(rows: &[&[f32]]) -> MaskedImage<f32> {
        let w = rows[0].len();
        let data: Vec<f32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        let plane = Plane::from_vec(w, rows.len(), data).expect("shape");
        MaskedImage::from_image(0, 0, plane, 0.25).expect("valid planes")
    }

    #[test]
    fn template_takes_pairwise_minimum() {
        let img = image_from_rows(&[
            &[1.0, 2.0, 3.0, 2.0, 9.0],
            &[1.0, 4.0, 10.0, 4.0, 1.0],
            &[5.0, 2.0, 3.0, 2.0, 1.0],
        ]);
        let fp = Footprint::from_bbox(&BBox::new(0, 0, 4, 2));
        let t = build_symmetric_template(&img, &fp, Peak::new(2, 1), 1.0, false, bits())
            .expect("peak inside");

        assert_eq!(t.footprint, fp);
        assert_eq!(t.image.bbox(), BBox::new(0, 0, 4, 2));
        // (4, 0) = 9 pairs with (0, 2) = 5.
        assert_eq!(t.image.get(4, 0), Some(5.0));
        assert_eq!(t.image.get(0, 2), Some(5.0));
        // (0, 0) = 1 pairs with (4, 2) = 1.
        assert_eq!(t.image.get(0, 0), Some(1.0));
        assert_eq!(t.image.get(2, 1), Some(10.0));
        assert_eq!(t.image.get(1, 1), Some(4.0));
        assert_eq!(t.image.variance().get(3, 2), 0.25);

        let b = bits();
        assert_eq!(t.image.mask().get(4, 0), b.one_sigma | b.three_sigma);
        assert_eq!(t.image.mask().get(0, 2), 0);
        assert_eq!(t.stats.clipped_1sig, 1);
        assert_eq!(t.stats.clipped_3sig, 1);
        assert_eq!(t.stats.symmetric_area, 15);
    }

    #[test]
    fn zero_sigma_flags_only_lowered_pixels() {
        let img = image_from_rows(&[&[1.0, 5.0, 3.0]]);
        let fp = Footprint::from_bbox(&BBox::new(0, 0, 2, 0));
        let t = build_symmetric_template(&img, &fp, Peak::new(1, 0), 0.0, false, bits())
            .expect("peak inside");
        let b = bits();
        assert_eq!(t.image.mask().get(0, 0), 0);
        assert_eq!(t.image.mask().get(1, 0), 0);
        assert_eq!(t.image.mask().get(2, 0), b.one_sigma | b.three_sigma);
        assert_eq!(t.stats.clipped_1sig, 1);
        assert_eq!(t.stats.clipped_3sig, 1);
    }

    #[test]
    fn mirror_pixels_carry_equal_values() {
        let img = image_from_rows(&[
            &[0.5, 2.0, 3.0, 1.5, 0.2, 0.1],
            &[1.0, 4.0, 8.0, 6.0, 2.0, 0.3],
            &[0.7, 3.0, 7.0, 5.0, 1.0, 0.4],
            &[0.2, 1.0, 2.0, 1.0, 0.6, 0.9],
        ]);
        let fp = Footprint::from_spans([
            Span::new(0, 1, 4),
            Span::new(1, 0, 5),
            Span::new(2, 0, 4),
            Span::new(3, 2, 3),
        ]);
        let t = build_symmetric_template(&img, &fp, Peak::new(2, 1), 0.5, false, bits())
            .expect("peak inside");
        for (x, y) in t.footprint.pixels() {
            let v = t.image.get(x, y).expect("inside template");
            let m = t.image.get(4 - x, 2 - y).expect("mirror inside template");
            assert_eq!(v, m, "pixel ({x}, {y}) differs from its mirror");
            assert!(v <= img.get(x, y).expect("inside image"));
        }
    }

    #[test]
    fn min_zero_floors_negative_pairs() {
        let img = image_from_rows(&[&[-2.0, 5.0, -1.0]]);
        let fp = Footprint::from_bbox(&BBox::new(0, 0, 2, 0));
        let signed = build_symmetric_template(&img, &fp, Peak::new(1, 0), 1.0, false, bits())
            .expect("peak inside");
        assert_eq!(signed.image.get(0, 0), Some(-2.0));
        let floored = build_symmetric_template(&img, &fp, Peak::new(1, 0), 1.0, true, bits())
            .expect("peak inside");
        assert_eq!(floored.image.get(0, 0), Some(0.0));
        assert_eq!(floored.image.get(2, 0), Some(0.0));
        assert_eq!(floored.image.get(1, 0), Some(5.0));
    }

    #[test]
    fn template_is_cropped_to_symmetric_box() {
        let img = image_from_rows(&[
            &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        ]);
        let fp = Footprint::from_bbox(&BBox::new(0, 0, 5, 1));
        let t = build_symmetric_template(&img, &fp, Peak::new(1, 0), 1.0, false, bits())
            .expect("peak inside");
        assert_eq!(t.footprint.spans(), &[Span::new(0, 0, 2)]);
        assert_eq!(t.image.bbox(), BBox::new(0, 0, 2, 0));
    }

    #[test]
    fn soft_failure_for_peak_outside() {
        let img = image_from_rows(&[&[1.0, 1.0, 1.0]]);
        let fp = Footprint::from_spans([Span::new(0, 0, 0)]);
        let err = build_symmetric_template(&img, &fp, Peak::new(2, 0), 1.0, false, bits())
            .unwrap_err();
        assert!(err.is_soft());
    }

    #[test]
    fn footprint_must_lie_inside_image() {
        let img = image_from_rows(&[&[1.0, 1.0, 1.0]]);
        let fp = Footprint::from_spans([Span::new(0, 0, 3)]);
        let err = build_symmetric_template(&img, &fp, Peak::new(1, 0), 1.0, false, bits())
            .unwrap_err();
        assert!(matches!(err, DeblendError::FootprintOutsideImage { .. }));
    }
}
