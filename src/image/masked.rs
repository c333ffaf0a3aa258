//! Pixel, mask, and variance planes sharing one shape and one origin.
//!
//! All accessors taking `i32` coordinates work in parent (region) coordinates;
//! the origin `(x0, y0)` maps them onto buffer-local indices.
use super::plane::Plane;
use crate::error::DeblendError;
use crate::types::BBox;
use num_traits::Float;
use std::fmt::Debug;

/// Mask bits are stored as an opaque integer per pixel.
pub type MaskPixel = u32;

/// Scalar pixel type accepted by the deblending primitives.
pub trait PixelValue: Float + Default + Debug + Send + Sync + 'static {}

impl<T: Float + Default + Debug + Send + Sync + 'static> PixelValue for T {}

#[derive(Clone, Debug, PartialEq)]
pub struct MaskedImage<T> {
    x0: i32,
    y0: i32,
    image: Plane<T>,
    mask: Plane<MaskPixel>,
    variance: Plane<T>,
}

impl<T: PixelValue> MaskedImage<T> {
    /// Zero-filled planes covering `bbox`.
    pub fn new(bbox: BBox) -> Self {
        let (w, h) = (bbox.width(), bbox.height());
        Self {
            x0: bbox.x0,
            y0: bbox.y0,
            image: Plane::new(w, h),
            mask: Plane::new(w, h),
            variance: Plane::new(w, h),
        }
    }

    /// Assemble from planes, rejecting mask/variance planes whose shape
    /// differs from the pixel plane.
    pub fn from_planes(
        x0: i32,
        y0: i32,
        image: Plane<T>,
        mask: Plane<MaskPixel>,
        variance: Plane<T>,
    ) -> Result<Self, DeblendError> {
        let expected = (image.w, image.h);
        if expected.0 == 0 || expected.1 == 0 {
            return Err(DeblendError::EmptyImage {
                width: expected.0,
                height: expected.1,
            });
        }
        if (mask.w, mask.h) != expected {
            return Err(DeblendError::SizeMismatch {
                plane: "mask",
                expected,
                actual: (mask.w, mask.h),
            });
        }
        if (variance.w, variance.h) != expected {
            return Err(DeblendError::SizeMismatch {
                plane: "variance",
                expected,
                actual: (variance.w, variance.h),
            });
        }
        Ok(Self {
            x0,
            y0,
            image,
            mask,
            variance,
        })
    }

    /// Pixel plane only; mask cleared and variance set to `variance`.
    pub fn from_image(x0: i32, y0: i32, image: Plane<T>, variance: T) -> Result<Self, DeblendError> {
        let (w, h) = (image.w, image.h);
        Self::from_planes(x0, y0, image, Plane::new(w, h), Plane::filled(w, h, variance))
    }

    pub fn x0(&self) -> i32 {
        self.x0
    }

    pub fn y0(&self) -> i32 {
        self.y0
    }

    pub fn width(&self) -> usize {
        self.image.w
    }

    pub fn height(&self) -> usize {
        self.image.h
    }

    pub fn bbox(&self) -> BBox {
        BBox {
            x0: self.x0,
            y0: self.y0,
            x1: self.x0 + self.image.w as i32 - 1,
            y1: self.y0 + self.image.h as i32 - 1,
        }
    }

    pub fn image(&self) -> &Plane<T> {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut Plane<T> {
        &mut self.image
    }

    pub fn mask(&self) -> &Plane<MaskPixel> {
        &self.mask
    }

    pub fn mask_mut(&mut self) -> &mut Plane<MaskPixel> {
        &mut self.mask
    }

    pub fn variance(&self) -> &Plane<T> {
        &self.variance
    }

    pub fn variance_mut(&mut self) -> &mut Plane<T> {
        &mut self.variance
    }

    #[inline]
    /// Map parent coordinates onto buffer-local indices.
    pub fn local(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let lx = x - self.x0;
        let ly = y - self.y0;
        if lx < 0 || ly < 0 || lx as usize >= self.image.w || ly as usize >= self.image.h {
            return None;
        }
        Some((lx as usize, ly as usize))
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.local(x, y).map(|(lx, ly)| self.image.get(lx, ly))
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, v: T) -> bool {
        match self.local(x, y) {
            Some((lx, ly)) => {
                self.image.set(lx, ly, v);
                true
            }
            None => false,
        }
    }

    /// OR `bits` into the mask at parent `(x, y)`; no-op outside the image.
    pub fn or_mask(&mut self, x: i32, y: i32, bits: MaskPixel) {
        if let Some((lx, ly)) = self.local(x, y) {
            let i = self.mask.idx(lx, ly);
            self.mask.data[i] |= bits;
        }
    }

    /// Owned copy of the three planes restricted to `bbox`.
    pub fn crop(&self, bbox: &BBox) -> Result<Self, DeblendError> {
        let own = self.bbox();
        if !own.contains_box(bbox) {
            return Err(DeblendError::OutOfBounds {
                bbox: *bbox,
                image: own,
            });
        }
        let lx = (bbox.x0 - self.x0) as usize;
        let ly = (bbox.y0 - self.y0) as usize;
        let (w, h) = (bbox.width(), bbox.height());
        Ok(Self {
            x0: bbox.x0,
            y0: bbox.y0,
            image: self.image.window(lx, ly, w, h),
            mask: self.mask.window(lx, ly, w, h),
            variance: self.variance.window(lx, ly, w, h),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: usize, h: usize) -> Plane<f32> {
        Plane::from_vec(w, h, (0..w * h).map(|v| v as f32).collect()).expect("shape")
    }

    #[test]
    fn parent_coordinates_respect_origin() {
        let img = MaskedImage::from_image(10, 20, ramp(4, 3), 1.0).expect("valid planes");
        assert_eq!(img.get(10, 20), Some(0.0));
        assert_eq!(img.get(13, 22), Some(11.0));
        assert_eq!(img.get(9, 20), None);
        assert_eq!(img.get(14, 20), None);
        assert_eq!(img.bbox(), BBox::new(10, 20, 13, 22));
    }

    #[test]
    fn crop_returns_owned_window() {
        let mut img = MaskedImage::from_image(-2, -1, ramp(5, 4), 0.5).expect("valid planes");
        img.or_mask(0, 0, 0b10);
        let sub = img.crop(&BBox::new(-1, 0, 1, 1)).expect("inside");
        assert_eq!(sub.width(), 3);
        assert_eq!(sub.height(), 2);
        assert_eq!(sub.get(-1, 0), Some(6.0));
        assert_eq!(sub.get(1, 1), Some(13.0));
        assert_eq!(sub.mask().get(1, 0), 0b10);
        assert_eq!(sub.variance().get(2, 1), 0.5);

        img.set(-1, 0, 100.0);
        assert_eq!(sub.get(-1, 0), Some(6.0), "crop must not alias its parent");
    }

    #[test]
    fn crop_outside_is_rejected() {
        let img = MaskedImage::from_image(0, 0, ramp(3, 3), 0.0).expect("valid planes");
        let err = img.crop(&BBox::new(1, 1, 3, 2)).unwrap_err();
        assert!(matches!(err, DeblendError::OutOfBounds { .. }));
    }

    #[test]
    fn mismatched_variance_names_the_plane() {
        let err = MaskedImage::from_planes(0, 0, ramp(3, 2), Plane::new(3, 2), ramp(2, 3))
            .unwrap_err();
        assert_eq!(
            err,
            DeblendError::SizeMismatch {
                plane: "variance",
                expected: (3, 2),
                actual: (2, 3),
            }
        );
    }
}
