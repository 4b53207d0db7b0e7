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

//! Object store persisted in RocksDB.

use std::path::Path;

use log::debug;

use super::RocksDbStorage;
use crate::{Error, ObjectStore, StoreEncoder, VirtualizedStore};

/// Object store persisted in RocksDB.
///
/// Physical keys are the encoded application keys. Unlike
/// [`RocksDbTreeStore`](super::RocksDbTreeStore), puts go straight to the
/// database.
pub struct RocksDbObjectStore<'p, K, V, E> {
    storage: RocksDbStorage,
    encoder: E,
    parent: Option<&'p dyn ObjectStore<K, V>>,
}

impl<K, V, E: StoreEncoder<K, V>> RocksDbObjectStore<'_, K, V, E> {
    /// Open (or create) a root object store at `path`
    pub fn open<P: AsRef<Path>>(path: P, encoder: E) -> Result<Self, Error> {
        Ok(RocksDbObjectStore {
            storage: RocksDbStorage::default_rocksdb_with_path(path)?,
            encoder,
            parent: None,
        })
    }

    /// Underlying engine
    pub fn storage(&self) -> &RocksDbStorage {
        &self.storage
    }
}

impl<K, V, E: StoreEncoder<K, V>> VirtualizedStore for RocksDbObjectStore<'_, K, V, E> {
    fn merge(&self) -> Result<(), Error> {
        let parent = self.parent.ok_or_else(|| {
            Error::IllegalOperation("cannot merge the highest level".to_owned())
        })?;
        let mut merged = 0usize;
        self.storage.for_each_key_value(|key, value| {
            let key = self.encoder.decode_key(key)?;
            parent.put(&key, self.encoder.decode_value(value)?)?;
            merged += 1;
            Ok(())
        })?;
        debug!(
            "merged {merged} objects from {} into parent store",
            self.storage.path().display()
        );
        Ok(())
    }

    fn close(&self) -> Result<(), Error> {
        self.storage.close();
        Ok(())
    }

    fn destroy(&self) -> Result<(), Error> {
        self.storage.destroy()
    }
}

impl<K, V, E: StoreEncoder<K, V> + Clone> ObjectStore<K, V> for RocksDbObjectStore<'_, K, V, E> {
    fn put(&self, key: &K, value: V) -> Result<(), Error> {
        self.storage.put(
            &self.encoder.encode_key(key),
            &self.encoder.encode_value(&value),
        )
    }

    fn get(&self, key: &K) -> Result<Option<V>, Error> {
        match self.storage.get(&self.encoder.encode_key(key))? {
            Some(bytes) => self.encoder.decode_value(&bytes).map(Some),
            None => match self.parent {
                Some(parent) => parent.get(key),
                None => Ok(None),
            },
        }
    }

    fn virtualize<'a>(&'a self, prefix: &str) -> Result<Box<dyn ObjectStore<K, V> + 'a>, Error>
    where
        K: 'a,
        V: 'a,
    {
        let storage = RocksDbStorage::default_rocksdb_with_path(self.storage.path().join(prefix))?;
        Ok(Box::new(RocksDbObjectStore {
            storage,
            encoder: self.encoder.clone(),
            parent: Some(self),
        }))
    }
}
