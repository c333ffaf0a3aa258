use crate::types::BBox;
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeblendError {
    /// No span of the footprint contains the requested centre.
    PeakNotInFootprint { x: i32, y: i32 },
    /// Span `index` overlaps, touches, or sorts before its predecessor.
    NotNormalized { index: usize },
    /// Span whose start lies past its end.
    InvertedSpan { y: i32, x0: i32, x1: i32 },
    EmptyImage { width: usize, height: usize },
    EmptyFootprint,
    SizeMismatch {
        plane: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    OutOfBounds { bbox: BBox, image: BBox },
    FootprintOutsideImage { footprint: BBox, image: BBox },
    MissingMaskPlane { name: String },
}

impl DeblendError {
    /// Data-dependent failures the pipeline skips instead of aborting.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::PeakNotInFootprint { .. })
    }
}

impl fmt::Display for DeblendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeakNotInFootprint { x, y } => {
                write!(f, "no span contains peak ({x}, {y})")
            }
            Self::NotNormalized { index } => {
                write!(f, "footprint is not normalized at span {index}")
            }
            Self::InvertedSpan { y, x0, x1 } => {
                write!(f, "span on row {y} starts at {x0}, past its end {x1}")
            }
            Self::EmptyImage { width, height } => {
                write!(f, "empty image: width={width}, height={height}")
            }
            Self::EmptyFootprint => write!(f, "footprint has no spans"),
            Self::SizeMismatch {
                plane,
                expected,
                actual,
            } => write!(
                f,
                "{plane} plane size mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Self::OutOfBounds { bbox, image } => {
                write!(f, "box {bbox} is not inside image {image}")
            }
            Self::FootprintOutsideImage { footprint, image } => {
                write!(f, "footprint {footprint} extends outside image {image}")
            }
            Self::MissingMaskPlane { name } => write!(f, "mask plane {name} is not registered"),
        }
    }
}

impl std::error::Error for DeblendError {}
