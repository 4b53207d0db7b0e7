//! vsmt storage layer implemented over RocksDB backend.
//!
//! Each store layer owns its own RocksDB instance. Virtualizing a store opens
//! a nested instance under `<path>/<prefix>`, so destroying a layer is just a
//! recursive directory removal.
mod batch;
mod object_store;
mod storage;
#[cfg(test)]
pub(crate) mod test_utils;
mod tree_store;

pub use self::{
    batch::BatchOperation,
    object_store::RocksDbObjectStore,
    storage::{RocksDbStorage, default_db_opts},
    tree_store::RocksDbTreeStore,
};
