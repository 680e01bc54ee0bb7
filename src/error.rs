//! Error types for AES primitive operations.

use core::fmt;

/// Result type alias for AES primitive operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while building AES primitives.
///
/// Misuse that cannot be expressed as a recoverable condition (an out-of-range
/// round key index, decrypting with a forward schedule, ...) panics instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Invalid key length (must be 16, 24, or 32 bytes).
    InvalidKeyLength,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKeyLength => {
                write!(f, "invalid key length (must be 16, 24, or 32 bytes)")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
