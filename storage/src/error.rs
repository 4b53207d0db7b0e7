//! Storage errors

use std::path::PathBuf;

/// Storage and underlying errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation not allowed on this store layer, e.g. merging a root store
    #[error("illegal operation: {0}")]
    IllegalOperation(String),
    /// Stored bytes could not be turned back into a key or value
    #[error("decode failure: {0}")]
    DecodeFailure(String),
    /// The store was used after being closed
    #[error("store at {} is closed", .0.display())]
    Closed(PathBuf),
    /// Filesystem error while managing a store namespace
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Rocks DB error
    #[cfg(feature = "rocksdb_storage")]
    #[error("rocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
}
