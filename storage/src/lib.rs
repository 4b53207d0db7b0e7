#![deny(missing_docs)]

//! Storage abstraction for vsmt.
//!
//! Two families of stores are provided: object stores (`key -> value`) and
//! Merkle tree stores (`(level, key) -> node`). Every store can be
//! virtualized into a child layer that reads through to its parent and keeps
//! its own writes until they are merged back or discarded.

mod error;
pub mod memory_storage;
#[cfg(feature = "rocksdb_storage")]
pub mod rocksdb_storage;
mod storage;

pub use crate::{
    error::Error,
    memory_storage::{MemoryMerkleTreeStore, MemoryObjectStore},
    storage::{MerkleTreeStore, ObjectStore, StoreEncoder, VirtualizedStore},
};
