//! Sparse map keyed by arbitrary integers.

use std::ops::{Deref, DerefMut};

use num_bigint::BigUint;
use num_traits::{One, Zero};
use vsmt_storage::MerkleTreeStore;

use crate::{BigIntish, DEFAULT_HEIGHT, KeyIndex, MerkleTree, MerkleTreeOptions, Result};

/// Leaf index from the low `height - 1` bits of the key in reverse order.
///
/// Bit `i` of the key becomes bit `height - 2 - i` of the index, so keys
/// sharing their low bits land far apart. Higher key bits are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReversedBitIndex;

impl KeyIndex for ReversedBitIndex {
    fn key_to_index(&self, key: &BigUint, height: u16) -> BigUint {
        let mut remaining = key.clone();
        let mut index = BigUint::zero();
        for _ in 1..height {
            index <<= 1usize;
            if !(&remaining % 2u32).is_zero() {
                index += BigUint::one();
            }
            remaining >>= 1usize;
        }
        index
    }
}

/// A [`MerkleTree`] indexed through [`ReversedBitIndex`].
///
/// Every key is in range; keys equal modulo the number of leaves share a
/// leaf. [`Witness::path_key`](crate::Witness::path_key) recovers the key
/// from a proof.
pub struct MerkleMap<T, S>(MerkleTree<T, S, ReversedBitIndex>);

impl<T: BigIntish, S: MerkleTreeStore<T, T>> MerkleMap<T, S> {
    /// Create a map of [`DEFAULT_HEIGHT`] over `store`
    pub fn new(store: S, options: MerkleTreeOptions<T>) -> Self {
        MerkleMap(MerkleTree::from_parts(
            store,
            options,
            DEFAULT_HEIGHT,
            ReversedBitIndex,
        ))
    }

    /// Create a map of `height` levels over `store`
    pub fn with_height(store: S, options: MerkleTreeOptions<T>, height: u16) -> Result<Self> {
        MerkleTree::build(store, options, height, ReversedBitIndex).map(MerkleMap)
    }

    /// Unwrap the underlying tree
    pub fn into_inner(self) -> MerkleTree<T, S, ReversedBitIndex> {
        self.0
    }
}

impl<T, S> Deref for MerkleMap<T, S> {
    type Target = MerkleTree<T, S, ReversedBitIndex>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T, S> DerefMut for MerkleMap<T, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
