//! Footprints: sets of pixels stored as sorted, merged horizontal spans.
//!
//! A [`Footprint`] always holds its spans ordered by `(y, x0)` with no two
//! spans on one row overlapping or touching. [`Footprint::from_spans`]
//! establishes that invariant from arbitrary input; [`Footprint::from_normalized`]
//! only checks it.

mod span;
mod symmetrize;

pub use span::Span;
pub use symmetrize::symmetrize;

use crate::error::DeblendError;
use crate::image::{MaskedImage, PixelValue};
use crate::types::BBox;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Span>", into = "Vec<Span>")]
pub struct Footprint {
    spans: Vec<Span>,
}

impl Footprint {
    /// Sort and merge arbitrary spans into a normalized footprint.
    ///
    /// Spans with their start past their end (only constructible through the
    /// public fields) cover no pixels and are dropped.
    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        let mut spans: Vec<Span> = spans.into_iter().filter(Span::is_valid).collect();
        spans.sort_unstable();
        let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
        for span in spans {
            match merged.last_mut() {
                Some(last) if last.y == span.y && span.x0 <= last.x1 + 1 => {
                    last.x1 = last.x1.max(span.x1);
                }
                _ => merged.push(span),
            }
        }
        Self { spans: merged }
    }

    /// Accept spans that are already normalized, naming the first span that
    /// is inverted, breaks the ordering or overlaps its predecessor.
    pub fn from_normalized(spans: Vec<Span>) -> Result<Self, DeblendError> {
        if let Some(index) = spans.iter().position(|s| !s.is_valid()) {
            return Err(DeblendError::NotNormalized { index });
        }
        for (index, pair) in spans.windows(2).enumerate() {
            let (prev, cur) = (pair[0], pair[1]);
            let ordered = cur.y > prev.y || (cur.y == prev.y && cur.x0 > prev.x1 + 1);
            if !ordered {
                return Err(DeblendError::NotNormalized { index: index + 1 });
            }
        }
        Ok(Self { spans })
    }

    /// Single rectangle covering `bbox`.
    pub fn from_bbox(bbox: &BBox) -> Self {
        Self {
            spans: (bbox.y0..=bbox.y1)
                .map(|y| Span::new(y, bbox.x0, bbox.x1))
                .collect(),
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.spans.iter().map(Span::len).sum()
    }

    pub fn bbox(&self) -> Option<BBox> {
        let first = self.spans.first()?;
        let last = self.spans.last()?;
        let (x0, x1) = self
            .spans
            .iter()
            .fold((first.x0, first.x1), |(lo, hi), s| (lo.min(s.x0), hi.max(s.x1)));
        Some(BBox {
            x0,
            y0: first.y,
            x1,
            y1: last.y,
        })
    }

    /// Index of the span containing `(x, y)`.
    ///
    /// Upper-bound search on `(y, x0)`: the only candidate is the last span
    /// starting at or before `(y, x)`.
    pub fn span_index(&self, x: i32, y: i32) -> Option<usize> {
        let upper = self.spans.partition_point(|s| (s.y, s.x0) <= (y, x));
        let idx = upper.checked_sub(1)?;
        self.spans[idx].contains(x, y).then_some(idx)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.span_index(x, y).is_some()
    }

    pub fn pixels(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.spans
            .iter()
            .flat_map(|s| (s.x0..=s.x1).map(move |x| (x, s.y)))
    }

    /// Trim leading and trailing pixels that are zero or below from every
    /// span and drop spans left empty. Pixels outside `image` and NaNs count
    /// as zero.
    ///
    /// Interior zeros are kept, so a span never splits.
    pub fn clip_to_nonzero<T: PixelValue>(&self, image: &MaskedImage<T>) -> Footprint {
        let positive = |x: i32, y: i32| image.get(x, y).is_some_and(|v| v > T::zero());
        let spans = self
            .spans
            .iter()
            .filter_map(|s| {
                let x0 = (s.x0..=s.x1).find(|&x| positive(x, s.y))?;
                let x1 = (x0..=s.x1).rev().find(|&x| positive(x, s.y))?;
                Some(Span::new(s.y, x0, x1))
            })
            .collect();
        Footprint { spans }
    }
}

impl From<Vec<Span>> for Footprint {
    fn from(spans: Vec<Span>) -> Self {
        Self::from_spans(spans)
    }
}

impl From<Footprint> for Vec<Span> {
    fn from(footprint: Footprint) -> Self {
        footprint.spans
    }
}
