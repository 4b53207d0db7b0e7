//! Overlay trees layered over another tree's store.

use std::ops::{Deref, DerefMut};

use log::debug;
use vsmt_storage::{MerkleTreeStore, VirtualizedStore};

use crate::{MerkleTree, Result};

/// Store of an overlay tree: a child layer of the parent tree's store.
pub type DetachedStore<'a, T> = Box<dyn MerkleTreeStore<T, T> + 'a>;

/// A tree whose store is an overlay of another tree's store.
///
/// Reads fall through to the parent tree, writes stay in the overlay. The
/// overlay ends either in [`merge_into_parent`](Self::merge_into_parent) or
/// in [`destroy`](Self::destroy); both consume it.
///
/// Merging a persistent overlay does not commit the parent, call
/// [`MerkleTree::commit`] on [`parent`](Self::parent) afterwards.
pub struct VirtualizedMerkleTree<'a, T, S, I> {
    tree: MerkleTree<T, DetachedStore<'a, T>, I>,
    parent: &'a MerkleTree<T, S, I>,
}

impl<'a, T, S, I> VirtualizedMerkleTree<'a, T, S, I> {
    pub(crate) fn new(
        tree: MerkleTree<T, DetachedStore<'a, T>, I>,
        parent: &'a MerkleTree<T, S, I>,
    ) -> Self {
        VirtualizedMerkleTree { tree, parent }
    }

    /// Tree this overlay was detached from
    pub fn parent(&self) -> &'a MerkleTree<T, S, I> {
        self.parent
    }

    /// Fold all overlay nodes into the parent's store, then drop the overlay
    pub fn merge_into_parent(self) -> Result<()> {
        let store = self.tree.store();
        store.merge()?;
        store.destroy()?;
        debug!("merged detached tree into parent");
        Ok(())
    }

    /// Drop the overlay and every write made to it
    pub fn destroy(self) -> Result<()> {
        self.tree.store().destroy()?;
        debug!("discarded detached tree");
        Ok(())
    }
}

impl<'a, T, S, I> Deref for VirtualizedMerkleTree<'a, T, S, I> {
    type Target = MerkleTree<T, DetachedStore<'a, T>, I>;

    fn deref(&self) -> &Self::Target {
        &self.tree
    }
}

impl<T, S, I> DerefMut for VirtualizedMerkleTree<'_, T, S, I> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tree
    }
}
