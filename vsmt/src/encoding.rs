//! Byte encoding of [`BigIntish`] values for persistent stores.

use std::sync::Arc;

use num_bigint::BigUint;
use vsmt_storage::{Error as StorageError, StoreEncoder};

use crate::{BigIntish, MerkleTreeOptions};

/// Width of encoded keys. Keys below `2^256` are left padded to it so that
/// byte order matches numeric order.
pub const KEY_WIDTH: usize = 32;

/// Left pad `bytes` with zeros up to `length`. Longer input is returned as
/// is.
pub fn pad_to_length(bytes: &[u8], length: usize) -> Vec<u8> {
    if bytes.len() >= length {
        return bytes.to_vec();
    }
    let mut padded = vec![0u8; length - bytes.len()];
    padded.extend_from_slice(bytes);
    padded
}

/// [`StoreEncoder`] for trees whose keys and values are the same
/// [`BigIntish`] type.
///
/// Keys are fixed width big-endian, values minimal big-endian. Decoding
/// goes through the tree's `from_big_int`.
pub struct BigIntEncoder<T> {
    from_big_int: Arc<dyn Fn(BigUint) -> T + Send + Sync>,
}

impl<T> Clone for BigIntEncoder<T> {
    fn clone(&self) -> Self {
        BigIntEncoder {
            from_big_int: Arc::clone(&self.from_big_int),
        }
    }
}

impl<T: 'static> BigIntEncoder<T> {
    /// Encoder decoding through the conversion of `options`
    pub fn new(options: &MerkleTreeOptions<T>) -> Self {
        let options = options.clone();
        BigIntEncoder {
            from_big_int: Arc::new(move |value| options.from_big_int(value)),
        }
    }
}

impl<T> BigIntEncoder<T> {
    fn decode(&self, bytes: &[u8], what: &str) -> Result<T, StorageError> {
        if bytes.is_empty() {
            return Err(StorageError::DecodeFailure(format!(
                "empty {what} bytes"
            )));
        }
        Ok((self.from_big_int)(BigUint::from_bytes_be(bytes)))
    }
}

impl<T: BigIntish> StoreEncoder<T, T> for BigIntEncoder<T> {
    fn encode_key(&self, key: &T) -> Vec<u8> {
        pad_to_length(&key.to_big_int().to_bytes_be(), KEY_WIDTH)
    }

    fn decode_key(&self, bytes: &[u8]) -> Result<T, StorageError> {
        self.decode(bytes, "key")
    }

    fn encode_value(&self, value: &T) -> Vec<u8> {
        value.to_big_int().to_bytes_be()
    }

    fn decode_value(&self, bytes: &[u8]) -> Result<T, StorageError> {
        self.decode(bytes, "value")
    }
}
