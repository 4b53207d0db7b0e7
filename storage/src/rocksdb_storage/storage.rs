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

//! Implementation for a key-value engine abstraction over RocksDB.

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use rocksdb::{DB, Options, WriteBatch};

use super::BatchOperation;
use crate::Error;

/// RocksDB options used for every store namespace
pub fn default_db_opts() -> Options {
    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.increase_parallelism(num_cpus::get() as i32);
    opts
}

/// Storage which uses RocksDB as its backend.
///
/// The handle is released when the storage is closed or dropped; any use
/// after [`RocksDbStorage::close`] fails with [`Error::Closed`].
pub struct RocksDbStorage {
    path: PathBuf,
    db: RefCell<Option<DB>>,
}

impl RocksDbStorage {
    /// Open the database at `path`, creating it if missing
    pub fn default_rocksdb_with_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let db = DB::open(&default_db_opts(), &path)?;
        debug!("opened rocksdb namespace at {}", path.display());
        Ok(RocksDbStorage {
            path,
            db: RefCell::new(Some(db)),
        })
    }

    /// Filesystem location of this namespace
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether [`RocksDbStorage::close`] was already called
    pub fn is_closed(&self) -> bool {
        self.db.borrow().is_none()
    }

    fn with_db<R>(&self, f: impl FnOnce(&DB) -> Result<R, Error>) -> Result<R, Error> {
        let db = self.db.borrow();
        let db = db.as_ref().ok_or_else(|| Error::Closed(self.path.clone()))?;
        f(db)
    }

    /// Put `value` under `key` immediately
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        self.with_db(|db| Ok(db.put(key, value)?))
    }

    /// Get the value under `key`
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        self.with_db(|db| Ok(db.get(key)?))
    }

    /// Delete `key` immediately
    pub fn delete(&self, key: &[u8]) -> Result<(), Error> {
        self.with_db(|db| Ok(db.delete(key)?))
    }

    /// Apply all operations atomically
    pub fn write_batch<'b, I>(&self, operations: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'b BatchOperation>,
    {
        self.with_db(|db| {
            let mut batch = WriteBatch::default();
            for operation in operations {
                match operation {
                    BatchOperation::Put { key, value } => batch.put(key, value),
                    BatchOperation::Delete { key } => batch.delete(key),
                }
            }
            db.write(batch)?;
            Ok(())
        })
    }

    /// Walk every entry of the namespace once, in key order.
    ///
    /// The raw iterator is advanced lazily, so `f` may bail out early by
    /// returning an error, which is propagated as is.
    pub fn for_each_key_value<F>(&self, mut f: F) -> Result<(), Error>
    where
        F: FnMut(&[u8], &[u8]) -> Result<(), Error>,
    {
        self.with_db(|db| {
            let mut iter = db.raw_iterator();
            iter.seek_to_first();
            while iter.valid() {
                if let (Some(key), Some(value)) = (iter.key(), iter.value()) {
                    f(key, value)?;
                }
                iter.next();
            }
            iter.status()?;
            Ok(())
        })
    }

    /// Collect all keys of the namespace
    pub fn keys(&self) -> Result<Vec<Vec<u8>>, Error> {
        let mut keys = Vec::new();
        self.for_each_key_value(|key, _| {
            keys.push(key.to_vec());
            Ok(())
        })?;
        Ok(keys)
    }

    /// Release the RocksDB handle. Idempotent.
    pub fn close(&self) {
        if let Some(db) = self.db.borrow_mut().take() {
            drop(db);
            debug!("closed rocksdb namespace at {}", self.path.display());
        }
    }

    /// Close the handle and remove the namespace directory recursively
    pub fn destroy(&self) -> Result<(), Error> {
        self.close();
        if self.path.exists() {
            fs::remove_dir_all(&self.path)?;
        }
        debug!("destroyed rocksdb namespace at {}", self.path.display());
        Ok(())
    }
}
