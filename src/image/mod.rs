pub mod io;
pub mod mask;
pub mod masked;
pub mod plane;
pub mod traits;

pub use self::mask::{MaskBitLookup, MaskPlanes, SymmetryMaskBits, SYMM_1SIG, SYMM_3SIG};
pub use self::masked::{MaskPixel, MaskedImage, PixelValue};
pub use self::plane::Plane;
pub use self::traits::{ImageView, Rows};
