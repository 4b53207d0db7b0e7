//! Sparse Merkle tree engine.

use log::debug;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use vsmt_storage::MerkleTreeStore;

use crate::{
    BigIntish, Error, MerkleTreeOptions, Result,
    virtualized::VirtualizedMerkleTree,
    witness::{Witness, WitnessEntry, compute_root},
};

/// Height used by [`MerkleTree::new`]
pub const DEFAULT_HEIGHT: u16 = 256;

/// Largest supported height, levels must fit a single byte
pub const MAX_HEIGHT: u16 = 256;

/// Maps a key onto a leaf index of a tree with the given height.
///
/// The mapping must be deterministic; `get`, `set` and `get_witness` all go
/// through it.
pub trait KeyIndex {
    /// Leaf index of `key`. May return an index outside the tree, which is
    /// rejected by the caller.
    fn key_to_index(&self, key: &BigUint, height: u16) -> BigUint;
}

/// Uses the key itself as leaf index.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityIndex;

impl KeyIndex for IdentityIndex {
    fn key_to_index(&self, key: &BigUint, _height: u16) -> BigUint {
        key.clone()
    }
}

/// A sparse Merkle tree backed by a pluggable store.
///
/// Leaves sit at level 0 and the root at level `height - 1`. Nodes missing
/// from the store hold the default node of their level, so an empty store
/// is an empty tree.
///
/// `S` is any [`MerkleTreeStore`] keyed and valued by `T`; `I` decides how
/// keys map onto leaves.
pub struct MerkleTree<T, S, I = IdentityIndex> {
    store: S,
    options: MerkleTreeOptions<T>,
    height: u16,
    max_index: BigUint,
    default_nodes: Vec<T>,
    indexer: I,
}

impl<T: BigIntish, S: MerkleTreeStore<T, T>> MerkleTree<T, S, IdentityIndex> {
    /// Create a tree of [`DEFAULT_HEIGHT`] over `store`
    pub fn new(store: S, options: MerkleTreeOptions<T>) -> Self {
        Self::from_parts(store, options, DEFAULT_HEIGHT, IdentityIndex)
    }

    /// Create a tree of `height` levels over `store`.
    ///
    /// Fails with [`Error::InvalidHeight`] unless `1 <= height <= 256`.
    pub fn with_height(store: S, options: MerkleTreeOptions<T>, height: u16) -> Result<Self> {
        Self::build(store, options, height, IdentityIndex)
    }
}

impl<T: BigIntish, S, I> MerkleTree<T, S, I> {
    pub(crate) fn build(
        store: S,
        options: MerkleTreeOptions<T>,
        height: u16,
        indexer: I,
    ) -> Result<Self> {
        if height == 0 || height > MAX_HEIGHT {
            return Err(Error::InvalidHeight(height));
        }
        Ok(Self::from_parts(store, options, height, indexer))
    }

    pub(crate) fn from_parts(
        store: S,
        options: MerkleTreeOptions<T>,
        height: u16,
        indexer: I,
    ) -> Self {
        let mut default_nodes = Vec::with_capacity(height as usize);
        let mut node = options.from_big_int(BigUint::zero());
        for _ in 1..height {
            let next = options.hash_pair(node.clone(), node.clone());
            default_nodes.push(node);
            node = next;
        }
        default_nodes.push(node);

        MerkleTree {
            store,
            options,
            height,
            max_index: BigUint::one() << (height as usize - 1),
            default_nodes,
            indexer,
        }
    }
}

impl<T, S, I> MerkleTree<T, S, I> {
    /// Number of levels, leaves included
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of leaves, `2^(height - 1)`
    pub fn max_index(&self) -> &BigUint {
        &self.max_index
    }

    /// Default node of every level, leaves first
    pub fn default_nodes(&self) -> &[T] {
        &self.default_nodes
    }

    /// Backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hash and encoding configuration
    pub fn options(&self) -> &MerkleTreeOptions<T> {
        &self.options
    }

    fn root_level(&self) -> u8 {
        (self.height - 1) as u8
    }
}

impl<T, S, I> MerkleTree<T, S, I>
where
    T: BigIntish,
    S: MerkleTreeStore<T, T>,
    I: KeyIndex,
{
    /// Node at `(level, index)`, or the level's default node if unset.
    ///
    /// Fails with [`Error::LevelOutOfRange`] when `level >= height`.
    pub fn get_node(&self, level: u8, index: &BigUint) -> Result<T> {
        let default = self
            .default_nodes
            .get(level as usize)
            .ok_or(Error::LevelOutOfRange {
                level,
                height: self.height,
            })?;
        let key = self.options.from_big_int(index.clone());
        match self.store.get_node(&key, level)? {
            Some(node) => Ok(node),
            None => Ok(default.clone()),
        }
    }

    /// Current root
    pub fn get_root(&self) -> Result<T> {
        self.get_node(self.root_level(), &BigUint::zero())
    }

    /// Leaf index of `key`, not range checked
    pub fn key_to_index(&self, key: &T) -> BigUint {
        self.indexer.key_to_index(&key.to_big_int(), self.height)
    }

    fn leaf_index(&self, key: &T) -> Result<BigUint> {
        let index = self.key_to_index(key);
        if index >= self.max_index {
            return Err(Error::IndexOutOfRange {
                index,
                max_index: self.max_index.clone(),
            });
        }
        Ok(index)
    }

    /// Leaf value stored under `key`
    pub fn get(&self, key: &T) -> Result<T> {
        self.get_node(0, &self.key_to_index(key))
    }

    /// Write `value` under `key` and recompute the path up to the root.
    ///
    /// The store is committed once after the whole path is written. An
    /// out-of-range key fails before anything is written.
    pub fn set(&mut self, key: &T, value: T) -> Result<()> {
        let mut index = self.leaf_index(key)?;
        self.store
            .set_node(&self.options.from_big_int(index.clone()), 0, value.clone())?;

        let mut node = value;
        for level in 1..=self.root_level() {
            let is_left = (&index % 2u32).is_zero();
            let sibling = if is_left {
                self.get_node(level - 1, &(&index + 1u32))?
            } else {
                self.get_node(level - 1, &(&index - 1u32))?
            };
            node = if is_left {
                self.options.hash_pair(node, sibling)
            } else {
                self.options.hash_pair(sibling, node)
            };
            index /= 2u32;
            self.store
                .set_node(&self.options.from_big_int(index.clone()), level, node.clone())?;
        }

        self.store.commit()?;
        Ok(())
    }

    /// Sibling path of the leaf under `key`, leaf level first
    pub fn get_witness(&self, key: &T) -> Result<Witness<T>> {
        let mut index = self.leaf_index(key)?;
        let mut entries = Vec::with_capacity(self.root_level() as usize);
        for level in 0..self.root_level() {
            let is_left = (&index % 2u32).is_zero();
            let sibling = if is_left {
                self.get_node(level, &(&index + 1u32))?
            } else {
                self.get_node(level, &(&index - 1u32))?
            };
            entries.push(WitnessEntry { is_left, sibling });
            index /= 2u32;
        }
        Ok(Witness::new(entries))
    }

    /// Whether the leaf under `key` is proven by a freshly built witness
    pub fn validate(&self, key: &T) -> Result<bool> {
        let witness = self.get_witness(key)?;
        self.validate_with(key, &witness)
    }

    /// Whether the leaf under `key` is proven by `witness`
    pub fn validate_with(&self, key: &T, witness: &Witness<T>) -> Result<bool> {
        let leaf = self.get_node(0, &self.leaf_index(key)?)?;
        let root = compute_root(leaf, witness, &self.options);
        Ok(root.to_big_int() == self.get_root()?.to_big_int())
    }

    /// Flush queued writes of the store.
    ///
    /// [`MerkleTree::set`] commits on its own; this is needed after merging
    /// a persistent overlay, which leaves the parent uncommitted.
    pub fn commit(&self) -> Result<()> {
        self.store.commit()?;
        Ok(())
    }

    /// Overlay tree on top of this tree's store.
    ///
    /// Writes to the overlay stay invisible here until
    /// [`VirtualizedMerkleTree::merge_into_parent`].
    pub fn get_detached<'a>(&'a self, name: &str) -> Result<VirtualizedMerkleTree<'a, T, S, I>>
    where
        T: 'a,
        I: Clone,
    {
        let store = self.store.virtualize(name)?;
        debug!("detached tree {name} of height {}", self.height);
        let tree = MerkleTree {
            store,
            options: self.options.clone(),
            height: self.height,
            max_index: self.max_index.clone(),
            default_nodes: self.default_nodes.clone(),
            indexer: self.indexer.clone(),
        };
        Ok(VirtualizedMerkleTree::new(tree, self))
    }
}
