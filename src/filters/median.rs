use crate::image::{ImageView, MaskedImage, PixelValue};
use log::debug;
use std::cmp::Ordering;

/// Square `(2·halfsize + 1)²` median filter.
///
/// Only pixels at least `halfsize` away from every edge are filtered; the
/// border band (corners included) is copied verbatim. Mask and variance
/// planes are copied unchanged.
pub fn median_filter<T: PixelValue>(image: &MaskedImage<T>, halfsize: usize) -> MaskedImage<T> {
    let mut out = image.clone();
    let (w, h) = (image.width(), image.height());
    let side = 2 * halfsize + 1;
    if halfsize == 0 || side > w || side > h {
        return out;
    }

    let src = image.image();
    let mut window = Vec::with_capacity(side * side);
    let mid = side * side / 2;
    for y in halfsize..h - halfsize {
        for x in halfsize..w - halfsize {
            window.clear();
            for yy in y - halfsize..=y + halfsize {
                window.extend_from_slice(&src.row(yy)[x - halfsize..=x + halfsize]);
            }
            let (_, median, _) = window
                .select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            out.image_mut().set(x, y, *median);
        }
    }
    debug!(
        "median filter: {}x{} halfsize={} filtered={}",
        w,
        h,
        halfsize,
        (w - 2 * halfsize) * (h - 2 * halfsize)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Plane;

    fn image(w: usize, h: usize, data: Vec<f32>) -> MaskedImage<f32> {
        let plane = Plane::from_vec(w, h, data).expect("shape");
        MaskedImage::from_image(3, 4, plane, 2.0).expect("valid planes")
    }

    #[test]
    fn three_identical_rows_behave_like_a_1d_window() {
        let row = [5.0, 1.0, 9.0, 2.0, 8.0];
        let data: Vec<f32> = row.iter().cycle().take(15).copied().collect();
        let out = median_filter(&image(5, 3, data), 1);
        assert_eq!(out.image().row(1), &[5.0, 5.0, 2.0, 8.0, 8.0]);
        assert_eq!(out.image().row(0), &row);
        assert_eq!(out.image().row(2), &row);
    }

    #[test]
    fn border_band_is_copied_verbatim() {
        let data: Vec<f32> = (0..49).map(|v| ((v * 37) % 17) as f32).collect();
        let input = image(7, 7, data);
        let out = median_filter(&input, 2);
        for y in 0..7 {
            for x in 0..7 {
                let interior = (2..5).contains(&x) && (2..5).contains(&y);
                if !interior {
                    assert_eq!(out.image().get(x, y), input.image().get(x, y), "({x}, {y})");
                }
            }
        }
        assert_eq!(out.variance(), input.variance());
        assert_eq!(out.mask(), input.mask());
        assert_eq!((out.x0(), out.y0()), (3, 4));
    }

    #[test]
    fn constant_image_is_unchanged() {
        let input = image(6, 5, vec![4.5; 30]);
        assert_eq!(median_filter(&input, 1), input);
        assert_eq!(median_filter(&input, 2), input);
    }

    #[test]
    fn oversized_window_copies_everything() {
        let input = image(3, 3, (0..9).map(|v| v as f32).collect());
        assert_eq!(median_filter(&input, 2), input);
    }

    #[test]
    fn tall_image_matches_direct_window_median() {
        let (w, h) = (4, 40);
        let data: Vec<f32> = (0..w * h).map(|v| ((v * 53) % 29) as f32).collect();
        let input = image(w, h, data);
        let out = median_filter(&input, 1);
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let mut window: Vec<f32> = (y - 1..=y + 1)
                    .flat_map(|yy| (x - 1..=x + 1).map(move |xx| (xx, yy)))
                    .map(|(xx, yy)| input.image().get(xx, yy))
                    .collect();
                window.sort_by(|a, b| a.partial_cmp(b).expect("finite"));
                assert_eq!(out.image().get(x, y), window[4], "({x}, {y})");
            }
        }
    }

    #[test]
    fn isolated_spike_is_removed() {
        let mut data = vec![1.0; 25];
        data[12] = 100.0;
        let out = median_filter(&image(5, 5, data), 1);
        assert_eq!(out.image().get(2, 2), 1.0);
    }
}
