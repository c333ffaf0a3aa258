use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer pixel location of one blended source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peak {
    pub ix: i32,
    pub iy: i32,
}

impl Peak {
    pub fn new(ix: i32, iy: i32) -> Self {
        Self { ix, iy }
    }
}

/// Inclusive integer box in parent (region) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl BBox {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        assert!(x0 <= x1 && y0 <= y1, "degenerate box");
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> usize {
        (self.x1 - self.x0 + 1) as usize
    }

    pub fn height(&self) -> usize {
        (self.y1 - self.y0 + 1) as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    pub fn contains_box(&self, other: &BBox) -> bool {
        self.contains(other.x0, other.y0) && self.contains(other.x1, other.y1)
    }

    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]x[{},{}]", self.x0, self.x1, self.y0, self.y1)
    }
}
