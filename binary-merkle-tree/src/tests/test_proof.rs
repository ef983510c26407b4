use assert_matches::assert_matches;
use hex_literal::hex;

use super::*;
use crate::{
    Direction, EMPTY_ROOT, Error, MerkleProof, MerkleTree, verify_proof, verify_raw_proof,
};

const BASE_2: Hash = hex!("6632753d6ca30fea890f37fc150eaed8d068acf596acb2251b8fafd72db977d3");
const LEVEL1_0: Hash = hex!("c949e892e20b934947df6f3a24a49c5cb385e21d652f5ab1358d6ddc33f61d73");
const ABC_ROOT: Hash = hex!("f4bde677e8d16c8e89f5c3a5e52e99a4162aa938ef72f640b4be8dddbfed9d9c");

fn test_proofs(count: u32) {
    let digests: Vec<Vec<u8>> = (0..count).map(digest_from_u32).collect();
    let tree: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let root = tree.root().expect("non-empty tree");
    for (index, digest) in digests.iter().enumerate() {
        let proof = tree.prove(index as u64).expect("gen proof");
        assert_eq!(proof.len(), tree.height() - 1);
        assert!(
            verify_proof::<Sha256Hasher>(digest, &proof, &root),
            "count: {}, index: {}",
            count,
            index
        );
    }
}

#[test]
fn test_abc_proof_for_last_leaf() {
    init_logger();
    let leaves = items(&["a", "b", "c"]);
    let tree: MerkleTree = MerkleTree::build(&leaves);
    let proof = tree.prove(2).expect("gen proof");

    // the padded duplicate of "c" is its own sibling
    assert_eq!(proof.path(), &[BASE_2, LEVEL1_0]);
    assert_eq!(proof.directions(), &[Direction::Right, Direction::Left]);
    assert_eq!(proof.path_index_bits(), vec![1, 0]);

    assert_eq!(tree.root(), Some(ABC_ROOT));
    assert!(proof.verify::<Sha256Hasher>(&leaves[2].digest(), &ABC_ROOT));
    assert_eq!(
        proof
            .calculate_root::<Sha256Hasher>(&leaves[2].digest())
            .expect("well formed"),
        ABC_ROOT
    );
}

#[test]
fn test_abc_proof_for_first_leaf() {
    let leaves = items(&["a", "b", "c"]);
    let tree: MerkleTree = MerkleTree::build(&leaves);
    let proof = tree.prove(0).expect("gen proof");

    let base = tree.level(0).expect("base");
    let level1 = tree.level(1).expect("level 1");
    assert_eq!(proof.path(), &[*base[1].hash(), *level1[1].hash()]);
    assert_eq!(proof.directions(), &[Direction::Right, Direction::Right]);
    assert!(tree.verify(&leaves[0].digest(), &proof));
}

#[test]
fn test_proofs_small_trees() {
    for count in 1..=33 {
        test_proofs(count);
    }
}

#[test]
fn test_proofs_larger_trees() {
    test_proofs(100);
    test_proofs(257);
}

#[test]
fn test_single_leaf_proof_is_empty() {
    let leaf = StringItem::new("only");
    let tree: MerkleTree = MerkleTree::build([&leaf]);
    let proof = tree.prove(0).expect("gen proof");
    assert!(proof.is_empty());
    assert!(proof.directions().is_empty());

    let root = tree.root().expect("root");
    assert!(verify_proof::<Sha256Hasher>(&leaf.digest(), &proof, &root));
    assert!(!verify_proof::<Sha256Hasher>(
        &StringItem::new("other").digest(),
        &proof,
        &root
    ));
    // the root is H(digest), not the digest itself
    assert!(!verify_proof::<Sha256Hasher>(&root, &proof, &root));
}

#[test]
fn test_empty_tree_has_no_valid_index() {
    let tree: MerkleTree = MerkleTree::empty();
    for index in [0, 1, u64::MAX] {
        assert_matches!(
            tree.prove(index),
            Err(Error::IndexOutOfRange { leaf_count: 0, .. })
        );
    }
}

#[test]
fn test_prove_out_of_range() {
    let tree: MerkleTree = MerkleTree::build(items(&["a", "b", "c"]));
    assert_matches!(
        tree.prove(3),
        Err(Error::IndexOutOfRange {
            index: 3,
            leaf_count: 3
        })
    );
}

#[test]
fn test_tampered_path_fails() {
    let digests: Vec<Vec<u8>> = (0..13).map(digest_from_u32).collect();
    let tree: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let root = tree.root().expect("root");
    let proof = tree.prove(6).expect("gen proof");

    for step in 0..proof.len() {
        for byte in [0, 17, 31] {
            let (mut path, directions) = proof.clone().into_parts();
            path[step][byte] ^= 0x80;
            let tampered = MerkleProof::new(path, directions).expect("same shape");
            assert!(
                !tampered.verify::<Sha256Hasher>(&digests[6], &root),
                "step: {}, byte: {}",
                step,
                byte
            );
        }
    }
}

#[test]
fn test_flipped_direction_fails() {
    let digests: Vec<Vec<u8>> = (0..8).map(digest_from_u32).collect();
    let tree: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let root = tree.root().expect("root");
    let proof = tree.prove(5).expect("gen proof");

    for step in 0..proof.len() {
        let (path, mut directions) = proof.clone().into_parts();
        directions[step] = match directions[step] {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        };
        let tampered = MerkleProof::new(path, directions).expect("same shape");
        assert!(!tampered.verify::<Sha256Hasher>(&digests[5], &root));
    }
}

#[test]
fn test_wrong_leaf_or_root_fails() {
    let digests: Vec<Vec<u8>> = (0..9).map(digest_from_u32).collect();
    let tree: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let root = tree.root().expect("root");
    let proof = tree.prove(4).expect("gen proof");

    assert!(proof.verify::<Sha256Hasher>(&digests[4], &root));
    assert!(!proof.verify::<Sha256Hasher>(&digests[3], &root));
    assert!(!proof.verify::<Sha256Hasher>(&digest_from_u32(31337), &root));

    let mut other_root = root;
    other_root[0] ^= 0x01;
    assert!(!proof.verify::<Sha256Hasher>(&digests[4], &other_root));
}

#[test]
fn test_malformed_root_fails_closed() {
    let digests: Vec<Vec<u8>> = (0..4).map(digest_from_u32).collect();
    let tree: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let root = tree.root().expect("root");
    let proof = tree.prove(1).expect("gen proof");

    assert!(!proof.verify::<Sha256Hasher>(&digests[1], EMPTY_ROOT));
    assert!(!proof.verify::<Sha256Hasher>(&digests[1], &root[..31]));
    let mut long_root = root.to_vec();
    long_root.push(0);
    assert!(!proof.verify::<Sha256Hasher>(&digests[1], &long_root));
}

#[test]
fn test_empty_proof_against_larger_tree_fails() {
    let digests: Vec<Vec<u8>> = (0..4).map(digest_from_u32).collect();
    let tree: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let root = tree.root().expect("root");
    assert!(!MerkleProof::default().verify::<Sha256Hasher>(&digests[0], &root));
}

#[test]
fn test_truncated_proof_fails() {
    let digests: Vec<Vec<u8>> = (0..16).map(digest_from_u32).collect();
    let tree: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let root = tree.root().expect("root");
    let (mut path, mut directions) = tree.prove(9).expect("gen proof").into_parts();
    path.pop();
    directions.pop();
    let truncated = MerkleProof::new(path, directions).expect("same shape");
    assert!(!truncated.verify::<Sha256Hasher>(&digests[9], &root));
}

#[test]
fn test_raw_proof_verification() {
    let leaves = items(&["a", "b", "c"]);
    let path = vec![BASE_2.to_vec(), LEVEL1_0.to_vec()];
    let digest = leaves[2].digest();

    assert!(verify_raw_proof::<Sha256Hasher, _>(
        &digest,
        &path,
        &[1, 0],
        &ABC_ROOT
    ));
    // mismatched lengths
    assert!(!verify_raw_proof::<Sha256Hasher, _>(
        &digest,
        &path,
        &[1],
        &ABC_ROOT
    ));
    // unknown direction bit
    assert!(!verify_raw_proof::<Sha256Hasher, _>(
        &digest,
        &path,
        &[1, 2],
        &ABC_ROOT
    ));
    // short sibling digest
    let short = vec![BASE_2[..16].to_vec(), LEVEL1_0.to_vec()];
    assert!(!verify_raw_proof::<Sha256Hasher, _>(
        &digest,
        &short,
        &[1, 0],
        &ABC_ROOT
    ));
}

#[test]
fn test_proof_from_path_index_bits_matches_generated() {
    let digests: Vec<Vec<u8>> = (0..21).map(digest_from_u32).collect();
    let tree: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let proof = tree.prove(20).expect("gen proof");

    let raw_path: Vec<Vec<u8>> = proof.path().iter().map(|h| h.to_vec()).collect();
    let rebuilt = MerkleProof::from_parts(&raw_path, &proof.path_index_bits()).expect("valid");
    assert_eq!(rebuilt, proof);
}

#[test]
fn test_encoded_proof_still_verifies() {
    let digests: Vec<Vec<u8>> = (0..30).map(digest_from_u32).collect();
    let tree: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let root = tree.root().expect("root");
    let proof = tree.prove(17).expect("gen proof");

    let bytes = proof.encode_to_vec().expect("encode");
    let decoded = MerkleProof::decode_from_slice(&bytes).expect("decode");
    assert_eq!(decoded, proof);
    assert!(decoded.verify::<Sha256Hasher>(&digests[17], &root));
}

#[test]
fn test_proofs_are_deterministic() {
    let digests: Vec<Vec<u8>> = (0..19).map(digest_from_u32).collect();
    let first: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    let second: MerkleTree = MerkleTree::from_leaf_digests(&digests);
    for index in 0..19 {
        assert_eq!(
            first.prove(index).expect("gen proof"),
            second.prove(index).expect("gen proof")
        );
    }
}

#[cfg(feature = "blake3")]
#[test]
fn test_proof_is_bound_to_its_hasher() {
    use crate::Blake3Hasher;

    let digests: Vec<Vec<u8>> = (0..7).map(digest_from_u32).collect();
    let tree: MerkleTree<Blake3Hasher> = MerkleTree::from_leaf_digests(&digests);
    let root = tree.root().expect("root");
    let proof = tree.prove(3).expect("gen proof");
    assert!(proof.verify::<Blake3Hasher>(&digests[3], &root));
    assert!(!proof.verify::<Sha256Hasher>(&digests[3], &root));
}
