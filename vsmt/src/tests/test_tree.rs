use assert_matches::assert_matches;
use num_bigint::BigUint;
use num_traits::One;
use proptest::prelude::*;
use vsmt_storage::MemoryMerkleTreeStore;

use crate::{
    Error, MerkleTree, MerkleTreeOptions, Result, Witness, WitnessEntry, compute_root,
    test_utils::{MemoryTree, big, memory_tree, toy_options},
};

#[test]
fn test_default_nodes_by_hand() {
    let tree = memory_tree(4);
    assert_eq!(
        tree.default_nodes(),
        &[big(0), big(100), big(1100100), big(111001001100100)]
    );
    assert_eq!(tree.max_index(), &big(8));
    assert_eq!(tree.height(), 4);
}

#[test]
fn test_empty_root_is_default() {
    let tree = memory_tree(8);
    assert_eq!(tree.get_root().expect("root"), tree.default_nodes()[7]);
    assert_eq!(tree.get(&big(3)).expect("get"), big(0));
}

#[test]
fn test_set_changes_root() {
    let mut tree = memory_tree(8);
    tree.set(&big(3), big(42)).expect("set");

    assert_ne!(tree.get_root().expect("root"), tree.default_nodes()[7]);
    assert_eq!(tree.get(&big(3)).expect("get"), big(42));
    // leaf plus one node per level above it
    assert_eq!(tree.store().node_count(), 8);
}

#[test]
fn test_root_by_hand() {
    let options = toy_options();
    let mut tree = memory_tree(2);
    tree.set(&big(1), big(7)).expect("set");

    let expected = options.hash(&[big(0), big(7)]);
    assert_eq!(expected, big(107));
    assert_eq!(tree.get_root().expect("root"), expected);
}

#[test]
fn test_set_is_idempotent() {
    let mut once = memory_tree(8);
    once.set(&big(5), big(9)).expect("set");

    let mut twice = memory_tree(8);
    twice.set(&big(5), big(9)).expect("set");
    twice.set(&big(5), big(9)).expect("set");

    assert_eq!(
        once.get_root().expect("root"),
        twice.get_root().expect("root")
    );
}

#[test]
fn test_resetting_to_default_restores_empty_root() {
    let mut tree = memory_tree(6);
    tree.set(&big(17), big(1)).expect("set");
    tree.set(&big(17), big(0)).expect("set");

    assert_eq!(tree.get_root().expect("root"), tree.default_nodes()[5]);
}

#[test]
fn test_witness_shape() {
    let mut tree = memory_tree(4);
    tree.set(&big(6), big(3573)).expect("set");
    tree.set(&big(7), big(11)).expect("set");

    let witness = tree.get_witness(&big(6)).expect("witness");
    assert_eq!(witness.len(), 3);
    let flags: Vec<bool> = witness.iter().map(|entry| entry.is_left).collect();
    assert_eq!(flags, vec![true, false, false]);
    assert_eq!(witness.entries()[0].sibling, big(11));
    assert_eq!(witness.entries()[2].sibling, tree.default_nodes()[2]);

    assert_eq!(
        compute_root(big(3573), &witness, tree.options()),
        tree.get_root().expect("root")
    );
    assert!(tree.validate(&big(6)).expect("validate"));
}

#[test]
fn test_witness_rejects_wrong_leaf() {
    let mut tree = memory_tree(8);
    tree.set(&big(12), big(1)).expect("set");
    let witness = tree.get_witness(&big(12)).expect("witness");

    assert_ne!(
        witness.compute_root(big(2), tree.options()),
        tree.get_root().expect("root")
    );
    // a witness for another leaf does not prove this one
    let other = tree.get_witness(&big(13)).expect("witness");
    assert!(!tree.validate_with(&big(12), &other).expect("validate"));
}

#[test]
fn test_out_of_range_is_rejected() {
    let mut tree = memory_tree(4);
    let root = tree.get_root().expect("root");

    assert_matches!(
        tree.set(&big(8), big(1)),
        Err(Error::IndexOutOfRange { index, max_index }) if index == big(8) && max_index == big(8)
    );
    assert_matches!(
        tree.get_witness(&big(9)).err(),
        Some(Error::IndexOutOfRange { .. })
    );
    assert_matches!(tree.validate(&big(8)), Err(Error::IndexOutOfRange { .. }));

    assert_eq!(tree.get_root().expect("root"), root);
    assert_eq!(tree.store().node_count(), 0);
}

#[test]
fn test_invalid_height() {
    for height in [0, 257] {
        let result: Result<MemoryTree> =
            MerkleTree::with_height(MemoryMerkleTreeStore::new(), toy_options(), height);
        assert_matches!(result.err(), Some(Error::InvalidHeight(h)) if h == height);
    }
}

#[test]
fn test_single_level_tree() {
    let mut tree = memory_tree(1);
    tree.set(&big(0), big(5)).expect("set");

    assert_eq!(tree.get_root().expect("root"), big(5));
    let witness = tree.get_witness(&big(0)).expect("witness");
    assert!(witness.is_empty());
    assert!(tree.validate(&big(0)).expect("validate"));
    assert_matches!(tree.set(&big(1), big(5)), Err(Error::IndexOutOfRange { .. }));
}

#[test]
fn test_full_height_blake3() {
    let mut tree = MerkleTree::new(MemoryMerkleTreeStore::new(), MerkleTreeOptions::blake3());
    let last = (BigUint::one() << 255usize) - 1u32;
    tree.set(&last, big(1)).expect("set");
    tree.set(&big(0), big(2)).expect("set");

    let witness = tree.get_witness(&last).expect("witness");
    assert_eq!(witness.len(), 255);
    assert!(tree.validate(&last).expect("validate"));
    assert!(tree.validate(&big(0)).expect("validate"));
    assert_matches!(
        tree.set(&(BigUint::one() << 255usize), big(1)),
        Err(Error::IndexOutOfRange { .. })
    );
}

#[test]
fn test_level_out_of_range() {
    let tree = memory_tree(4);
    assert_matches!(
        tree.get_node(10, &big(0)),
        Err(Error::LevelOutOfRange { level: 10, height: 4 })
    );
    assert_matches!(
        tree.get_node(4, &big(0)),
        Err(Error::LevelOutOfRange { .. })
    );
    assert_eq!(tree.get_node(3, &big(0)).expect("root"), tree.default_nodes()[3]);
}

#[test]
fn test_blake3_rejects_witness_for_shifted_leaf_bytes() {
    let mut tree =
        MerkleTree::with_height(MemoryMerkleTreeStore::new(), MerkleTreeOptions::blake3(), 2)
            .expect("valid height");
    let leaf = BigUint::from_bytes_be(&[1; 33]);
    let sibling = BigUint::from_bytes_be(&[2; 32]);
    tree.set(&big(0), leaf).expect("set");
    tree.set(&big(1), sibling).expect("set");
    assert!(tree.validate(&big(0)).expect("validate"));

    let shifted_leaf = BigUint::from_bytes_be(&[1; 32]);
    let shifted_sibling = BigUint::from_bytes_be(&[&[1u8][..], &[2u8; 32][..]].concat());
    let witness = Witness::new(vec![WitnessEntry {
        is_left: true,
        sibling: shifted_sibling,
    }]);
    assert_ne!(
        compute_root(shifted_leaf, &witness, tree.options()),
        tree.get_root().expect("root")
    );
}

#[cfg(feature = "storage")]
mod persistent {
    use tempfile::TempDir;
    use vsmt_storage::rocksdb_storage::RocksDbTreeStore;

    use super::*;
    use crate::BigIntEncoder;

    type DiskTree = MerkleTree<
        BigUint,
        RocksDbTreeStore<'static, BigUint, BigUint, BigIntEncoder<BigUint>>,
    >;

    fn open_tree(dir: &TempDir) -> DiskTree {
        let options = toy_options();
        let store = RocksDbTreeStore::open(dir.path().join("tree"), BigIntEncoder::new(&options))
            .expect("open store");
        MerkleTree::with_height(store, options, 8).expect("valid height")
    }

    #[test]
    fn test_matches_memory_tree() {
        let dir = TempDir::new().expect("temp dir");
        let mut disk = open_tree(&dir);
        let mut memory = memory_tree(8);
        for (key, value) in [(3u64, 30u64), (100, 7), (3, 31), (127, 1)] {
            disk.set(&big(key), big(value)).expect("set");
            memory.set(&big(key), big(value)).expect("set");
        }

        assert_eq!(disk.store().pending(), 0);
        assert_eq!(
            disk.get_root().expect("root"),
            memory.get_root().expect("root")
        );
        assert!(disk.validate(&big(100)).expect("validate"));
    }

    #[test]
    fn test_reopen_keeps_tree() {
        let dir = TempDir::new().expect("temp dir");
        let root = {
            let mut tree = open_tree(&dir);
            tree.set(&big(9), big(99)).expect("set");
            tree.get_root().expect("root")
        };

        let tree = open_tree(&dir);
        assert_eq!(tree.get_root().expect("root"), root);
        assert_eq!(tree.get(&big(9)).expect("get"), big(99));
    }
}

proptest! {
    #[test]
    fn prop_witness_round_trip(
        entries in prop::collection::vec((0u64..128, any::<u64>()), 1..12),
    ) {
        let mut tree = memory_tree(8);
        for (key, value) in &entries {
            tree.set(&big(*key), big(*value)).expect("set");
        }
        let root = tree.get_root().expect("root");
        for (key, _) in &entries {
            let witness = tree.get_witness(&big(*key)).expect("witness");
            let leaf = tree.get(&big(*key)).expect("get");
            prop_assert_eq!(compute_root(leaf, &witness, tree.options()), root.clone());
            prop_assert!(tree.validate(&big(*key)).expect("validate"));
        }
    }
}
