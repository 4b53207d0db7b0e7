//! Test helpers.

use num_bigint::BigUint;
use num_traits::One;
use vsmt_storage::MemoryMerkleTreeStore;

use crate::{MerkleMap, MerkleTree, MerkleTreeOptions};

/// Tree over an in-memory store, keyed and valued by `BigUint`
pub(crate) type MemoryTree<'p> = MerkleTree<BigUint, MemoryMerkleTreeStore<'p, BigUint, BigUint>>;

/// Hash concatenating the decimal digits of `1`, left and right, reduced
/// modulo `2^255`. Easy to recompute by hand.
pub(crate) fn toy_options() -> MerkleTreeOptions<BigUint> {
    MerkleTreeOptions::new(
        |value| value,
        |children: &[BigUint]| {
            let digits = format!("1{}{}", children[0], children[1]);
            let value = BigUint::parse_bytes(digits.as_bytes(), 10).expect("decimal digits");
            value % (BigUint::one() << 255usize)
        },
    )
}

pub(crate) fn big(value: u64) -> BigUint {
    BigUint::from(value)
}

pub(crate) fn memory_tree(height: u16) -> MemoryTree<'static> {
    MerkleTree::with_height(MemoryMerkleTreeStore::new(), toy_options(), height)
        .expect("valid height")
}

pub(crate) fn memory_map(
    height: u16,
) -> MerkleMap<BigUint, MemoryMerkleTreeStore<'static, BigUint, BigUint>> {
    MerkleMap::with_height(MemoryMerkleTreeStore::new(), toy_options(), height)
        .expect("valid height")
}
