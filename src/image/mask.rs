//! Named mask-plane bits.
//!
//! The deblender never hard-codes bit positions; it asks a [`MaskBitLookup`]
//! for the bit assigned to a plane name. [`MaskPlanes`] is a small registry
//! implementation for callers that do not bring their own.
use super::masked::MaskPixel;
use crate::error::DeblendError;
use serde::Serialize;

/// Pixel was pulled down by at least 1σ by the symmetry constraint.
pub const SYMM_1SIG: &str = "SYMM_1SIG";
/// Pixel was pulled down by at least 3σ by the symmetry constraint.
pub const SYMM_3SIG: &str = "SYMM_3SIG";

/// Maps a mask-plane name to its bit value.
pub trait MaskBitLookup {
    fn bit(&self, name: &str) -> Option<MaskPixel>;
}

impl<F> MaskBitLookup for F
where
    F: Fn(&str) -> Option<MaskPixel>,
{
    fn bit(&self, name: &str) -> Option<MaskPixel> {
        self(name)
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MaskPlanes {
    names: Vec<String>,
}

impl MaskPlanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the two symmetry planes already allocated.
    pub fn with_deblend_planes() -> Self {
        let mut planes = Self::new();
        planes.add(SYMM_1SIG);
        planes.add(SYMM_3SIG);
        planes
    }

    /// Allocate the next free bit for `name`, or return the existing one.
    pub fn add(&mut self, name: &str) -> MaskPixel {
        if let Some(bit) = self.bit(name) {
            return bit;
        }
        assert!(
            self.names.len() < MaskPixel::BITS as usize,
            "mask plane registry is full"
        );
        self.names.push(name.to_string());
        1 << (self.names.len() - 1)
    }
}

impl MaskBitLookup for MaskPlanes {
    fn bit(&self, name: &str) -> Option<MaskPixel> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| 1 << i)
    }
}

/// The two bits written by the symmetric template builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymmetryMaskBits {
    pub one_sigma: MaskPixel,
    pub three_sigma: MaskPixel,
}

impl SymmetryMaskBits {
    pub fn resolve(lookup: &dyn MaskBitLookup) -> Result<Self, DeblendError> {
        let get = |name: &str| {
            lookup.bit(name).ok_or_else(|| DeblendError::MissingMaskPlane {
                name: name.to_string(),
            })
        };
        Ok(Self {
            one_sigma: get(SYMM_1SIG)?,
            three_sigma: get(SYMM_3SIG)?,
        })
    }
}
