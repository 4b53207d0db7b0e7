// MIT LICENSE
//
// Copyright (c) 2021 Dash Core Group
//
// Permission is hereby granted, free of charge, to any
// person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the
// Software without restriction, including without
// limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software
// is furnished to do so, subject to the following
// conditions:
//
// The above copyright notice and this permission notice
// shall be included in all copies or substantial portions
// of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF
// ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED
// TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
// SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR
// IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Merkle tree node store persisted in RocksDB.

use std::{cell::RefCell, path::Path};

use log::{debug, trace};

use super::{BatchOperation, RocksDbStorage};
use crate::{Error, MerkleTreeStore, StoreEncoder, VirtualizedStore};

/// Merkle tree node store persisted in RocksDB.
///
/// Physical keys are `encode_key(key) ++ [level]`. Writes are queued and only
/// reach the database as one atomic batch on [`MerkleTreeStore::commit`];
/// reads go to the database directly and do not see the queue.
pub struct RocksDbTreeStore<'p, K, V, E> {
    storage: RocksDbStorage,
    encoder: E,
    queue: RefCell<Vec<BatchOperation>>,
    parent: Option<&'p dyn MerkleTreeStore<K, V>>,
}

impl<K, V, E: StoreEncoder<K, V>> RocksDbTreeStore<'_, K, V, E> {
    /// Open (or create) a root tree store at `path`
    pub fn open<P: AsRef<Path>>(path: P, encoder: E) -> Result<Self, Error> {
        Ok(RocksDbTreeStore {
            storage: RocksDbStorage::default_rocksdb_with_path(path)?,
            encoder,
            queue: RefCell::new(Vec::new()),
            parent: None,
        })
    }

    /// Underlying engine
    pub fn storage(&self) -> &RocksDbStorage {
        &self.storage
    }

    /// Number of writes waiting for the next commit
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    fn level_key(&self, key: &K, level: u8) -> Vec<u8> {
        let mut level_key = self.encoder.encode_key(key);
        level_key.push(level);
        level_key
    }
}

impl<K, V, E: StoreEncoder<K, V>> VirtualizedStore for RocksDbTreeStore<'_, K, V, E> {
    fn merge(&self) -> Result<(), Error> {
        let parent = self.parent.ok_or_else(|| {
            Error::IllegalOperation("cannot merge the highest merkle tree".to_owned())
        })?;
        let mut merged = 0usize;
        self.storage.for_each_key_value(|level_key, value| {
            let (level, key) = level_key.split_last().ok_or_else(|| {
                Error::DecodeFailure("empty node key in tree store".to_owned())
            })?;
            let key = self.encoder.decode_key(key)?;
            parent.set_node(&key, *level, self.encoder.decode_value(value)?)?;
            merged += 1;
            Ok(())
        })?;
        debug!(
            "merged {merged} nodes from {} into parent tree store",
            self.storage.path().display()
        );
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        self.storage.close();
        Ok(())
    }

    fn destroy(&self) -> Result<(), Error> {
        self.queue.borrow_mut().clear();
        self.storage.destroy()
    }
}

impl<K, V, E: StoreEncoder<K, V> + Clone> MerkleTreeStore<K, V>
    for RocksDbTreeStore<'_, K, V, E>
{
    fn set_node(&self, key: &K, level: u8, value: V) -> Result<(), Error> {
        let operation = BatchOperation::Put {
            key: self.level_key(key, level),
            value: self.encoder.encode_value(&value),
        };
        trace!("queued node write {}", hex::encode(operation.key()));
        self.queue.borrow_mut().push(operation);
        Ok(())
    }

    fn get_node(&self, key: &K, level: u8) -> Result<Option<V>, Error> {
        match self.storage.get(&self.level_key(key, level))? {
            Some(bytes) => self.encoder.decode_value(&bytes).map(Some),
            None => match self.parent {
                Some(parent) => parent.get_node(key, level),
                None => Ok(None),
            },
        }
    }

    fn commit(&self) -> Result<(), Error> {
        let mut queue = self.queue.borrow_mut();
        if queue.is_empty() {
            return Ok(());
        }
        // the queue is kept on failure so the caller can retry
        self.storage.write_batch(queue.iter())?;
        debug!(
            "committed {} node writes to {}",
            queue.len(),
            self.storage.path().display()
        );
        queue.clear();
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
        let storage = RocksDbStorage::default_rocksdb_with_path(self.storage.path().join(prefix))?;
        Ok(Box::new(RocksDbTreeStore {
            storage,
            encoder: self.encoder.clone(),
            queue: RefCell::new(Vec::new()),
            parent: Some(self),
        }))
    }
}
