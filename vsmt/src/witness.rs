//! Merkle witnesses and root recomputation.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::MerkleTreeOptions;

/// One step of a witness.
#[derive(Debug, Clone, PartialEq)]
pub struct WitnessEntry<T> {
    /// Whether the proven path is the left child at this level
    pub is_left: bool,
    /// The other child at this level
    pub sibling: T,
}

/// Sibling path from a leaf up to just below the root.
///
/// Holds `height - 1` entries in ascending level order.
#[derive(Debug, Clone, PartialEq)]
pub struct Witness<T> {
    entries: Vec<WitnessEntry<T>>,
}

impl<T> Witness<T> {
    /// Wrap entries ordered leaf first
    pub fn new(entries: Vec<WitnessEntry<T>>) -> Self {
        Witness { entries }
    }

    /// Number of levels covered
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the witness is empty, as for a single-level tree
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries, leaf level first
    pub fn iter(&self) -> std::slice::Iter<'_, WitnessEntry<T>> {
        self.entries.iter()
    }

    /// Entries, leaf level first
    pub fn entries(&self) -> &[WitnessEntry<T>] {
        &self.entries
    }

    /// Root implied by `leaf` and this witness
    pub fn compute_root(&self, leaf: T, options: &MerkleTreeOptions<T>) -> T
    where
        T: Clone,
    {
        compute_root(leaf, self, options)
    }

    /// Integer spelled by the path bits, the leaf level bit being the most
    /// significant.
    ///
    /// For a [`MerkleMap`](crate::MerkleMap) this is the proven key modulo
    /// the number of leaves.
    pub fn path_key(&self) -> BigUint {
        self.entries.iter().fold(BigUint::zero(), |key, entry| {
            let key = key << 1usize;
            if entry.is_left { key } else { key + 1u32 }
        })
    }
}

impl<'w, T> IntoIterator for &'w Witness<T> {
    type Item = &'w WitnessEntry<T>;
    type IntoIter = std::slice::Iter<'w, WitnessEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Recompute a root from a leaf value and its witness.
///
/// Needs no tree or store, so it is all a verifier requires.
pub fn compute_root<T: Clone>(leaf: T, witness: &Witness<T>, options: &MerkleTreeOptions<T>) -> T {
    witness.iter().fold(leaf, |hash, entry| {
        if entry.is_left {
            options.hash_pair(hash, entry.sibling.clone())
        } else {
            options.hash_pair(entry.sibling.clone(), hash)
        }
    })
}
