//! Error types for the checked packing surfaces.

use thiserror::Error;

/// Result type for checked packing operations.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors reported by the validating entry points.
///
/// The hot loop itself never fails; these are produced once, before a buffer
/// is handed to it.
#[derive(Debug, Error)]
pub enum PackError {
    /// Byte length does not cover a whole number of 4-byte pixels.
    #[error("length {len} is not a multiple of 4")]
    LengthNotMultipleOfFour {
        /// The rejected length in bytes.
        len: usize,
    },

    /// Requested length is larger than the buffer backing it.
    #[error("length {len} exceeds buffer size {capacity}")]
    LengthExceedsBuffer {
        /// The requested length in bytes.
        len: usize,
        /// The actual buffer size in bytes.
        capacity: usize,
    },

    /// A null buffer pointer was passed across the C boundary.
    #[error("null buffer pointer")]
    NullBuffer,

    /// Pixel format cannot be produced by the 32-bit packer.
    #[error("Unsupported pixel format: {0}")]
    UnsupportedPixelFormat(String),

    /// Not enough bytes to parse a protocol structure.
    #[error("truncated input: needed {needed} bytes, got {available}")]
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes present.
        available: usize,
    },
}

impl PackError {
    /// Stable status code reported across the C boundary.
    ///
    /// Success is `0`; every error maps to a distinct negative value.
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::LengthNotMultipleOfFour { .. } => -1,
            Self::LengthExceedsBuffer { .. } => -2,
            Self::NullBuffer => -3,
            Self::UnsupportedPixelFormat(_) => -4,
            Self::Truncated { .. } => -5,
        }
    }
}
