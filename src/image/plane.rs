//! Owned single-channel plane in row-major layout (stride == width).
//!
//! `Plane<T>` is the storage behind every channel of a [`MaskedImage`]
//! (pixel values, mask bits, variance). Indices are buffer-local; the origin
//! offset lives on the owning masked image.
//!
//! [`MaskedImage`]: super::MaskedImage
use super::traits::ImageView;

#[derive(Clone, Debug, PartialEq)]
pub struct Plane<T> {
    /// Plane width in pixels
    pub w: usize,
    /// Plane height in pixels
    pub h: usize,
    /// Number of elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<T>,
}

impl<T: Copy + Default> Plane<T> {
    /// Construct a default-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, T::default())
    }
}

impl<T: Copy> Plane<T> {
    pub fn filled(w: usize, h: usize, value: T) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Wrap an existing buffer; `None` when `data.len() != w * h`.
    pub fn from_vec(w: usize, h: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Copy a `w × h` window starting at buffer-local `(x, y)`.
    ///
    /// The caller guarantees the window lies inside the plane.
    pub(crate) fn window(&self, x: usize, y: usize, w: usize, h: usize) -> Self {
        let mut data = Vec::with_capacity(w * h);
        for row in y..y + h {
            let start = self.idx(x, row);
            data.extend_from_slice(&self.data[start..start + w]);
        }
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }
}

impl<T: Copy> ImageView for Plane<T> {
    type Pixel = T;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[T] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
