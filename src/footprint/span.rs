use crate::error::DeblendError;
use serde::{Deserialize, Serialize};

/// Closed horizontal interval `[x0, x1]` on row `y`.
///
/// Field order gives the derived ordering `(y, x0, x1)` used by footprints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSpan")]
pub struct Span {
    pub y: i32,
    pub x0: i32,
    pub x1: i32,
}

impl Span {
    pub fn new(y: i32, x0: i32, x1: i32) -> Self {
        assert!(x0 <= x1, "span start {x0} is past its end {x1}");
        Self { y, x0, x1 }
    }

    /// Checked constructor for spans coming from outside the crate.
    pub fn try_new(y: i32, x0: i32, x1: i32) -> Result<Self, DeblendError> {
        if x0 > x1 {
            return Err(DeblendError::InvertedSpan { y, x0, x1 });
        }
        Ok(Self { y, x0, x1 })
    }

    /// Start not past end. Always true for spans built through
    /// [`Span::new`], [`Span::try_new`] or deserialization.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x0 <= self.x1
    }

    #[inline]
    pub fn len(&self) -> usize {
        (self.x1 - self.x0 + 1).max(0) as usize
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        y == self.y && x >= self.x0 && x <= self.x1
    }
}

/// Wire form of [`Span`], validated on the way in.
#[derive(Deserialize)]
struct RawSpan {
    y: i32,
    x0: i32,
    x1: i32,
}

impl TryFrom<RawSpan> for Span {
    type Error = DeblendError;

    fn try_from(raw: RawSpan) -> Result<Self, Self::Error> {
        Span::try_new(raw.y, raw.x0, raw.x1)
    }
}
