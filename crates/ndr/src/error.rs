//! NDR error types

use thiserror::Error;

/// Maximum size for a single NDR-conformant allocation.
///
/// Conformance counts come off the wire; a hostile peer can declare an
/// arbitrarily large array. Decoders reject anything above this bound
/// before allocating.
pub const MAX_NDR_ALLOCATION_SIZE: usize = 16 * 1024 * 1024;

/// Errors produced while encoding or decoding NDR data
#[derive(Debug, Error)]
pub enum NdrError {
    /// Not enough bytes remain in the buffer
    #[error("buffer underflow: needed {needed} bytes, have {have}")]
    BufferUnderflow { needed: usize, have: usize },

    /// A conformant size did not match the data that followed it
    #[error("conformance mismatch: declared {declared}, actual {actual}")]
    ConformanceMismatch { declared: u64, actual: u64 },

    /// A union discriminant or enum value outside the known set
    #[error("invalid discriminant {value} for {type_name}")]
    InvalidDiscriminant { type_name: &'static str, value: u64 },

    /// A wire-declared size exceeds [`MAX_NDR_ALLOCATION_SIZE`]
    #[error("allocation of {0} bytes exceeds NDR limit")]
    AllocationLimitExceeded(usize),

    /// A size computation overflowed
    #[error("integer overflow in NDR size computation")]
    IntegerOverflow,

    /// String data was not valid UTF-16
    #[error("invalid UTF-16 string data")]
    InvalidString,

    /// A deferred pointer body was claimed before the deferral queue ran
    #[error("deferred pointer body not resolved")]
    DeferredNotResolved,

    /// Malformed data that fits no more specific category
    #[error("invalid NDR data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, NdrError>;
