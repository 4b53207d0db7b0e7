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

//! Store contracts for vsmt

use crate::Error;

/// Lifecycle shared by every store layer.
///
/// All methods take `&self`; stores use interior mutability so that a child
/// layer can hold a plain shared reference to its parent.
pub trait VirtualizedStore {
    /// Copies every entry owned by this layer into the parent layer.
    ///
    /// Fails with [`Error::IllegalOperation`] on a store without a parent.
    /// Whether the parent gets committed afterwards depends on the backend.
    fn merge(&self) -> Result<(), Error>;

    /// Releases underlying resources without deleting data. Idempotent.
    fn close(&self) -> Result<(), Error>;

    /// Closes the store and irreversibly removes all entries owned by this
    /// layer. The parent is not affected.
    fn destroy(&self) -> Result<(), Error>;
}

/// Plain key-value store with virtualization.
pub trait ObjectStore<K, V>: VirtualizedStore {
    /// Put `value` under `key` in this layer only
    fn put(&self, key: &K, value: V) -> Result<(), Error>;

    /// Get an independent copy of the value under `key`, falling back to the
    /// parent layers on a miss
    fn get(&self, key: &K) -> Result<Option<V>, Error>;

    /// Create a child layer on top of this store
    fn virtualize<'a>(&'a self, prefix: &str) -> Result<Box<dyn ObjectStore<K, V> + 'a>, Error>
    where
        K: 'a,
        V: 'a;
}

/// Node store addressed by `(level, key)` used by Merkle trees.
pub trait MerkleTreeStore<K, V>: VirtualizedStore {
    /// Write a node. Persistent backends only queue the write until
    /// [`MerkleTreeStore::commit`].
    fn set_node(&self, key: &K, level: u8, value: V) -> Result<(), Error>;

    /// Read a node, falling back to the parent layers on a miss
    fn get_node(&self, key: &K, level: u8) -> Result<Option<V>, Error>;

    /// Flush queued writes
    fn commit(&self) -> Result<(), Error>;

    /// Create a child layer on top of this store
    fn virtualize<'a>(
        &'a self,
        prefix: &str,
    ) -> Result<Box<dyn MerkleTreeStore<K, V> + 'a>, Error>
    where
        K: 'a,
        V: 'a;
}

/// Byte codec used by persistent stores.
///
/// Implementations must round-trip: `decode_key(&encode_key(k)) == k` and
/// the same for values.
pub trait StoreEncoder<K, V> {
    /// Encode a key
    fn encode_key(&self, key: &K) -> Vec<u8>;

    /// Decode a key
    fn decode_key(&self, bytes: &[u8]) -> Result<K, Error>;

    /// Encode a value
    fn encode_value(&self, value: &V) -> Vec<u8>;

    /// Decode a value
    fn decode_value(&self, bytes: &[u8]) -> Result<V, Error>;
}

impl<S: VirtualizedStore + ?Sized> VirtualizedStore for Box<S> {
    fn merge(&self) -> Result<(), Error> {
        (**self).merge()
    }

    fn close(&self) -> Result<(), Error> {
        (**self).close()
    }

    fn destroy(&self) -> Result<(), Error> {
        (**self).destroy()
    }
}

impl<K, V, S: ObjectStore<K, V> + ?Sized> ObjectStore<K, V> for Box<S> {
    fn put(&self, key: &K, value: V) -> Result<(), Error> {
        (**self).put(key, value)
    }

    fn get(&self, key: &K) -> Result<Option<V>, Error> {
        (**self).get(key)
    }

    fn virtualize<'a>(&'a self, prefix: &str) -> Result<Box<dyn ObjectStore<K, V> + 'a>, Error>
    where
        K: 'a,
        V: 'a,
    {
        (**self).virtualize(prefix)
    }
}

impl<K, V, S: MerkleTreeStore<K, V> + ?Sized> MerkleTreeStore<K, V> for Box<S> {
    fn set_node(&self, key: &K, level: u8, value: V) -> Result<(), Error> {
        (**self).set_node(key, level, value)
    }

    fn get_node(&self, key: &K, level: u8) -> Result<Option<V>, Error> {
        (**self).get_node(key, level)
    }

    fn commit(&self) -> Result<(), Error> {
        (**self).commit()
    }

    fn virtualize<'a>(
        &'a self,
        prefix: &str,
    ) -> Result<Box<dyn MerkleTreeStore<K, V> + 'a>, Error>
    where
        K: 'a,
        V: 'a,
    {
        (**self).virtualize(prefix)
    }
}
