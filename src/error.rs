//! The error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Errors produced while building, reading, or mutating vectors.
///
/// Every error is a synchronous failure of the call that returned it.
/// Single-element operations leave their vector untouched when they fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Two sequences that must agree in length do not.
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        /// The length required by the first sequence.
        expected: usize,
        /// The length of the sequence that disagreed.
        found: usize,
    },

    /// A code points past the end of its pool.
    #[error("code {code} at position {index} is out of range for a pool of {pool} values")]
    OutOfRange {
        index: usize,
        code: usize,
        pool: usize,
    },

    /// A pool would hold more values than the code type can address.
    #[error("pool of {size} values exceeds the maximum of {max} for this code width")]
    PoolOverflow { size: usize, max: usize },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A missing value was found where none are allowed.
    #[error("missing value at position {index}")]
    HasMissingValue { index: usize },

    /// A replacement referenced a value that is not in the pool.
    #[error("value not found in pool")]
    ValueNotFound,

    /// A value is absent from a caller-supplied pool.
    #[error("value at position {index} is not in the supplied pool")]
    ValueNotInPool { index: usize },

    /// A pool holds a value equal to one at an earlier position.
    #[error("value at pool position {index} repeats an earlier value")]
    DuplicateValue { index: usize },

    /// A mask's trailing word disagrees with its recorded bit count.
    #[error("invalid mask: word {last_word:#x} with {last_bits} trailing bits")]
    InvalidMask { last_word: u64, last_bits: u8 },

    #[error("cannot cut into {0} groups")]
    InvalidGroupCount(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
