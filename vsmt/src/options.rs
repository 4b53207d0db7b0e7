use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::One;

use crate::encoding::{KEY_WIDTH, pad_to_length};

type FromBigIntFn<T> = Arc<dyn Fn(BigUint) -> T + Send + Sync>;
type HashFn<T> = Arc<dyn Fn(&[T]) -> T + Send + Sync>;

/// Hash function and value encoding of a tree.
///
/// Fixed for the lifetime of a tree; cloning shares the functions.
pub struct MerkleTreeOptions<T> {
    from_big_int: FromBigIntFn<T>,
    hash: HashFn<T>,
}

impl<T> Clone for MerkleTreeOptions<T> {
    fn clone(&self) -> Self {
        MerkleTreeOptions {
            from_big_int: Arc::clone(&self.from_big_int),
            hash: Arc::clone(&self.hash),
        }
    }
}

impl<T> MerkleTreeOptions<T> {
    /// Build options from a conversion and a hash over `[left, right]`.
    pub fn new<F, H>(from_big_int: F, hash: H) -> Self
    where
        F: Fn(BigUint) -> T + Send + Sync + 'static,
        H: Fn(&[T]) -> T + Send + Sync + 'static,
    {
        MerkleTreeOptions {
            from_big_int: Arc::new(from_big_int),
            hash: Arc::new(hash),
        }
    }

    /// Convert an integer into a tree value
    pub fn from_big_int(&self, value: BigUint) -> T {
        (self.from_big_int)(value)
    }

    /// Hash child nodes, always called with exactly two children
    pub fn hash(&self, children: &[T]) -> T {
        (self.hash)(children)
    }

    pub(crate) fn hash_pair(&self, left: T, right: T) -> T {
        self.hash(&[left, right])
    }
}

impl MerkleTreeOptions<BigUint> {
    /// Blake3 over the children, each written as a big-endian length
    /// followed by its bytes left padded to 32.
    ///
    /// The length prefix keeps the encoding injective for children of
    /// 2^256 or more. `from_big_int` reduces modulo 2^256, so hashes and
    /// converted indices always fit 32 bytes.
    pub fn blake3() -> Self {
        MerkleTreeOptions::new(
            |value: BigUint| value % (BigUint::one() << (8 * KEY_WIDTH)),
            |children: &[BigUint]| {
                let mut hasher = blake3::Hasher::new();
                for child in children {
                    let bytes = pad_to_length(&child.to_bytes_be(), KEY_WIDTH);
                    hasher.update(&(bytes.len() as u64).to_be_bytes());
                    hasher.update(&bytes);
                }
                BigUint::from_bytes_be(hasher.finalize().as_bytes())
            },
        )
    }
}
