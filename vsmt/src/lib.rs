//! Sparse Merkle tree with pluggable, virtualizable storage.
//!
//! The tree covers a sparse address space of `2^(height - 1)` leaves. Unset
//! leaves implicitly hold a precomputed default value, so only nodes on the
//! paths of written leaves are ever stored.
//!
//! # Core types
//!
//! - [`MerkleTree`]: the tree engine (set, get, witness, validate).
//! - [`VirtualizedMerkleTree`]: a tree layered over another tree's store,
//!   merged back with [`VirtualizedMerkleTree::merge_into_parent`] or dropped
//!   with [`VirtualizedMerkleTree::destroy`].
//! - [`MerkleMap`]: a tree that spreads keys over the leaves by reversing
//!   their bits.
//! - [`Witness`]: sibling path proving a leaf value, verified with
//!   [`compute_root`] without access to the tree.
//!
//! # Values
//!
//! Keys, leaves and inner hashes share one value type implementing
//! [`BigIntish`]. [`MerkleTreeOptions`] supplies the hash function and the
//! conversion from [`BigUint`].
//!
//! # Stores
//!
//! Any [`vsmt_storage::MerkleTreeStore`] can back a tree: the in-memory
//! [`vsmt_storage::MemoryMerkleTreeStore`] or, with the `storage` feature,
//! the RocksDB-backed `RocksDbTreeStore` together with [`BigIntEncoder`].

#![warn(missing_docs)]

mod big_int;
mod encoding;
mod error;
mod map;
mod options;
#[cfg(test)]
pub(crate) mod test_utils;
#[cfg(test)]
mod tests;
mod tree;
mod virtualized;
mod witness;

pub use big_int::BigIntish;
pub use encoding::{BigIntEncoder, KEY_WIDTH, pad_to_length};
pub use error::{Error, Result};
pub use map::{MerkleMap, ReversedBitIndex};
pub use num_bigint::BigUint;
pub use options::MerkleTreeOptions;
pub use tree::{DEFAULT_HEIGHT, IdentityIndex, KeyIndex, MAX_HEIGHT, MerkleTree};
pub use virtualized::{DetachedStore, VirtualizedMerkleTree};
pub use witness::{Witness, WitnessEntry, compute_root};
