//! Proof verification.
//!
//! Pure functions, no tree required. The root is always recomputed from the
//! leaf digest and the path, then compared with the claimed root. Anything
//! malformed (mismatched lengths, a digest that is not 32 bytes, an empty
//! claimed root) fails closed with `false`.

use log::debug;

use crate::{
    MerkleProof,
    hash::{Hash, MerkleHasher, hash_from_slice, leaf_hash},
    proof::{Direction, MAX_PROOF_DEPTH},
};

/// Check that `leaf_digest` chains through `proof` to `claimed_root`.
///
/// `leaf_digest` is the item digest, not yet hashed into its base-level
/// node.
pub fn verify_proof<H: MerkleHasher>(
    leaf_digest: &[u8],
    proof: &MerkleProof,
    claimed_root: &[u8],
) -> bool {
    verify_path::<H>(leaf_digest, proof.path(), proof.directions(), claimed_root)
}

/// Byte-level variant of [`verify_proof`].
///
/// `path` holds raw sibling digests and `path_index` one bit per step
/// (1 = sibling on the right, 0 = sibling on the left).
pub fn verify_raw_proof<H: MerkleHasher, P: AsRef<[u8]>>(
    leaf_digest: &[u8],
    path: &[P],
    path_index: &[u64],
    claimed_root: &[u8],
) -> bool {
    if path.len() != path_index.len() {
        debug!(
            "proof rejected: {} siblings but {} path index bits",
            path.len(),
            path_index.len()
        );
        return false;
    }

    let mut hashes = Vec::with_capacity(path.len());
    let mut directions = Vec::with_capacity(path.len());
    for (step, (sibling, &bit)) in path.iter().zip(path_index).enumerate() {
        let Some(hash) = hash_from_slice(sibling.as_ref()) else {
            debug!(
                "proof rejected: sibling at step {} is {} bytes",
                step,
                sibling.as_ref().len()
            );
            return false;
        };
        let Some(direction) = Direction::from_bit(bit) else {
            debug!("proof rejected: path index {} at step {}", bit, step);
            return false;
        };
        hashes.push(hash);
        directions.push(direction);
    }

    verify_path::<H>(leaf_digest, &hashes, &directions, claimed_root)
}

fn verify_path<H: MerkleHasher>(
    leaf_digest: &[u8],
    path: &[Hash],
    directions: &[Direction],
    claimed_root: &[u8],
) -> bool {
    let Some(expected) = hash_from_slice(claimed_root) else {
        debug!("proof rejected: claimed root is {} bytes", claimed_root.len());
        return false;
    };
    let Some(computed) = calculate_root::<H>(leaf_digest, path, directions) else {
        debug!(
            "proof rejected: {} siblings, {} directions",
            path.len(),
            directions.len()
        );
        return false;
    };
    if computed != expected {
        debug!(
            "proof rejected: root mismatch, expected {}, got {}",
            hex::encode(expected),
            hex::encode(computed)
        );
        return false;
    }
    true
}

/// Replay the hash chain from `H(leaf_digest)` up through `path`.
///
/// Returns `None` when the path and directions differ in length or exceed
/// [`MAX_PROOF_DEPTH`].
pub(crate) fn calculate_root<H: MerkleHasher>(
    leaf_digest: &[u8],
    path: &[Hash],
    directions: &[Direction],
) -> Option<Hash> {
    if path.len() != directions.len() || path.len() > MAX_PROOF_DEPTH {
        return None;
    }
    let mut current = leaf_hash::<H>(leaf_digest);
    for (sibling, direction) in path.iter().zip(directions) {
        current = match direction {
            Direction::Right => H::hash_pair(&current, sibling),
            Direction::Left => H::hash_pair(sibling, &current),
        };
    }
    Some(current)
}
