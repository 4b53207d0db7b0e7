//! In-memory stores.
//!
//! Layers are linked through a plain shared reference to the parent, so a
//! child can never outlive the store it was virtualized from. Useful for
//! tests and for short-lived speculative overlays on top of persistent
//! stores.

use std::{cell::RefCell, collections::BTreeMap};

use log::debug;

use crate::{Error, MerkleTreeStore, ObjectStore, VirtualizedStore};

/// In-memory object store backed by a `BTreeMap`.
pub struct MemoryObjectStore<'p, K, V> {
    entries: RefCell<BTreeMap<K, V>>,
    parent: Option<&'p dyn ObjectStore<K, V>>,
}

impl<K: Ord, V> Default for MemoryObjectStore<'_, K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p, K: Ord, V> MemoryObjectStore<'p, K, V> {
    /// Create an empty root store
    pub fn new() -> Self {
        MemoryObjectStore {
            entries: RefCell::new(BTreeMap::new()),
            parent: None,
        }
    }

    /// Create an empty layer on top of `parent`, which may use any backend
    pub fn with_parent(parent: &'p dyn ObjectStore<K, V>) -> Self {
        MemoryObjectStore {
            entries: RefCell::new(BTreeMap::new()),
            parent: Some(parent),
        }
    }

    /// Number of entries owned by this layer
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether this layer owns no entries
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<K, V: Clone> VirtualizedStore for MemoryObjectStore<'_, K, V> {
    fn merge(&self) -> Result<(), Error> {
        let parent = self.parent.ok_or_else(|| {
            Error::IllegalOperation("cannot merge the highest level".to_owned())
        })?;
        let entries = self.entries.borrow();
        for (key, value) in entries.iter() {
            parent.put(key, value.clone())?;
        }
        debug!("merged {} objects into parent store", entries.len());
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        Ok(())
    }

    fn destroy(&self) -> Result<(), Error> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}

impl<K: Ord + Clone, V: Clone> ObjectStore<K, V> for MemoryObjectStore<'_, K, V> {
    fn put(&self, key: &K, value: V) -> Result<(), Error> {
        self.entries.borrow_mut().insert(key.clone(), value);
        Ok(())
    }

    fn get(&self, key: &K) -> Result<Option<V>, Error> {
        if let Some(value) = self.entries.borrow().get(key) {
            return Ok(Some(value.clone()));
        }
        match self.parent {
            Some(parent) => parent.get(key),
            None => Ok(None),
        }
    }

    fn virtualize<'a>(&'a self, prefix: &str) -> Result<Box<dyn ObjectStore<K, V> + 'a>, Error>
    where
        K: 'a,
        V: 'a,
    {
        debug!("virtualizing in-memory object store as {prefix}");
        Ok(Box::new(MemoryObjectStore {
            entries: RefCell::new(BTreeMap::new()),
            parent: Some(self),
        }))
    }
}

/// In-memory Merkle tree node store, nodes grouped per level.
pub struct MemoryMerkleTreeStore<'p, K, V> {
    levels: RefCell<BTreeMap<u8, BTreeMap<K, V>>>,
    parent: Option<&'p dyn MerkleTreeStore<K, V>>,
}

impl<K: Ord, V> Default for MemoryMerkleTreeStore<'_, K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'p, K: Ord, V> MemoryMerkleTreeStore<'p, K, V> {
    /// Create an empty root store
    pub fn new() -> Self {
        MemoryMerkleTreeStore {
            levels: RefCell::new(BTreeMap::new()),
            parent: None,
        }
    }

    /// Create an empty layer on top of `parent`, which may use any backend.
    ///
    /// Merging such a layer commits the parent, so a memory overlay over a
    /// persistent store is flushed in one step.
    pub fn with_parent(parent: &'p dyn MerkleTreeStore<K, V>) -> Self {
        MemoryMerkleTreeStore {
            levels: RefCell::new(BTreeMap::new()),
            parent: Some(parent),
        }
    }

    /// Number of nodes owned by this layer, over all levels
    pub fn node_count(&self) -> usize {
        self.levels.borrow().values().map(BTreeMap::len).sum()
    }
}

impl<K, V: Clone> VirtualizedStore for MemoryMerkleTreeStore<'_, K, V> {
    fn merge(&self) -> Result<(), Error> {
        let parent = self.parent.ok_or_else(|| {
            Error::IllegalOperation("cannot merge the highest merkle tree".to_owned())
        })?;
        let levels = self.levels.borrow();
        let mut merged = 0usize;
        for (level, nodes) in levels.iter() {
            for (key, value) in nodes.iter() {
                parent.set_node(key, *level, value.clone())?;
                merged += 1;
            }
        }
        parent.commit()?;
        debug!("merged {merged} nodes into parent tree store");
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        Ok(())
    }

    fn destroy(&self) -> Result<(), Error> {
        self.levels.borrow_mut().clear();
        Ok(())
    }
}

impl<K: Ord + Clone, V: Clone> MerkleTreeStore<K, V> for MemoryMerkleTreeStore<'_, K, V> {
    fn set_node(&self, key: &K, level: u8, value: V) -> Result<(), Error> {
        self.levels
            .borrow_mut()
            .entry(level)
            .or_default()
            .insert(key.clone(), value);
        Ok(())
    }

    fn get_node(&self, key: &K, level: u8) -> Result<Option<V>, Error> {
        if let Some(value) = self
            .levels
            .borrow()
            .get(&level)
            .and_then(|nodes| nodes.get(key))
        {
            return Ok(Some(value.clone()));
        }
        match self.parent {
            Some(parent) => parent.get_node(key, level),
            None => Ok(None),
        }
    }

    fn commit(&self) -> Result<(), Error> {
        Ok(())
    }

    fn virtualize<'a>(
        &'a self,
        prefix: &str,
    ) -> Result<Box<dyn MerkleTreeStore<K, V> + 'a>, Error>
    where
        K: 'a,
        V: 'a,
    {
        debug!("virtualizing in-memory tree store as {prefix}");
        Ok(Box::new(MemoryMerkleTreeStore {
            levels: RefCell::new(BTreeMap::new()),
            parent: Some(self),
        }))
    }
}
