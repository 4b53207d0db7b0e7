use num_bigint::BigUint;
use thiserror::Error;

/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors from sparse Merkle tree operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The leaf index derived from a key does not fit the tree.
    #[error("index {index} is out of range for {max_index} leaves")]
    IndexOutOfRange {
        /// Offending leaf index
        index: BigUint,
        /// Number of leaves of the tree
        max_index: BigUint,
    },
    /// A node level at or above the tree height.
    #[error("level {level} is out of range for height {height}")]
    LevelOutOfRange {
        /// Offending level
        level: u8,
        /// Height of the tree
        height: u16,
    },
    /// Tree heights are limited to 1..=256 so levels fit a single byte.
    #[error("height must be between 1 and 256, got {0}")]
    InvalidHeight(u16),
    /// An error propagated from the underlying store.
    #[error("store error: {0}")]
    Store(#[from] vsmt_storage::Error),
}
