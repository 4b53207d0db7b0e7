//! Useful utilities for testing.

use std::ops::Deref;

use tempfile::TempDir;

use super::*;
use crate::{Error, StoreEncoder};

/// RocksDb storage with self-cleanup
pub struct TempStorage {
    _dir: TempDir,
    storage: RocksDbStorage,
}

impl TempStorage {
    /// Create new `TempStorage`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("cannot create tempdir");
        let storage = RocksDbStorage::default_rocksdb_with_path(dir.path().join("db"))
            .expect("cannot open RocksDB storage");
        TempStorage { _dir: dir, storage }
    }
}

impl Deref for TempStorage {
    type Target = RocksDbStorage;

    fn deref(&self) -> &Self::Target {
        &self.storage
    }
}

/// Temporary directory for root stores, each opening its own engine
pub struct TempStores {
    dir: TempDir,
}

impl TempStores {
    /// Create new `TempStores`
    pub fn new() -> Self {
        TempStores {
            dir: TempDir::new().expect("cannot create tempdir"),
        }
    }

    /// Directory holding the stores
    pub fn dir(&self) -> &TempDir {
        &self.dir
    }

    /// Open a root object store under `name`
    pub fn object_store(&self, name: &str) -> RocksDbObjectStore<'static, u64, String, TestEncoder> {
        RocksDbObjectStore::open(self.dir.path().join(name), TestEncoder)
            .expect("cannot open object store")
    }

    /// Open a root tree store under `name`
    pub fn tree_store(&self, name: &str) -> RocksDbTreeStore<'static, u64, String, TestEncoder> {
        RocksDbTreeStore::open(self.dir.path().join(name), TestEncoder)
            .expect("cannot open tree store")
    }
}

/// Encodes `u64` keys big-endian and `String` values as UTF-8
#[derive(Clone, Copy, Debug, Default)]
pub struct TestEncoder;

impl StoreEncoder<u64, String> for TestEncoder {
    fn encode_key(&self, key: &u64) -> Vec<u8> {
        key.to_be_bytes().to_vec()
    }

    fn decode_key(&self, bytes: &[u8]) -> Result<u64, Error> {
        let bytes: [u8; 8] = bytes
            .try_into()
            .map_err(|_| Error::DecodeFailure(format!("bad key {}", hex::encode(bytes))))?;
        Ok(u64::from_be_bytes(bytes))
    }

    fn encode_value(&self, value: &String) -> Vec<u8> {
        value.as_bytes().to_vec()
    }

    fn decode_value(&self, bytes: &[u8]) -> Result<String, Error> {
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::DecodeFailure(e.to_string()))
    }
}
