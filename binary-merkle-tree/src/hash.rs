//! Hash functions used to build and verify trees.
//!
//! Every node hash in the tree comes from one of two shapes:
//! - Base nodes:     `H(leaf_digest)`
//! - Internal nodes: `H(left_hash || right_hash)`
//!
//! No domain tags, separators or length prefixes are added. Roots and proofs
//! produced with [`Sha256Hasher`] are therefore byte-compatible with any
//! other implementation of the same convention.

use sha2::{Digest, Sha256};

/// Length in bytes of every node hash.
pub const HASH_LEN: usize = 32;

/// A node hash.
pub type Hash = [u8; HASH_LEN];

/// Root of the empty tree in the byte-level API.
///
/// It is the empty byte string, which no hash function output can equal.
pub const EMPTY_ROOT: &[u8] = &[];

/// A 256-bit hash function the tree is parameterised over.
pub trait MerkleHasher {
    /// Short name used in log output.
    const NAME: &'static str;

    /// Hash an arbitrary byte string.
    fn hash(data: &[u8]) -> Hash;

    /// Hash the concatenation `left || right`.
    fn hash_pair(left: &Hash, right: &Hash) -> Hash {
        let mut input = [0u8; 2 * HASH_LEN];
        input[..HASH_LEN].copy_from_slice(left);
        input[HASH_LEN..].copy_from_slice(right);
        Self::hash(&input)
    }
}

/// SHA-256, the reference hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    const NAME: &'static str = "sha256";

    fn hash(data: &[u8]) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    fn hash_pair(left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

/// Blake3 with its default 32-byte output.
#[cfg(feature = "blake3")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

#[cfg(feature = "blake3")]
impl MerkleHasher for Blake3Hasher {
    const NAME: &'static str = "blake3";

    fn hash(data: &[u8]) -> Hash {
        *blake3::hash(data).as_bytes()
    }

    fn hash_pair(left: &Hash, right: &Hash) -> Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(left);
        hasher.update(right);
        *hasher.finalize().as_bytes()
    }
}

/// Hash a leaf digest into its base-level node hash: `H(leaf_digest)`.
pub fn leaf_hash<H: MerkleHasher>(leaf_digest: &[u8]) -> Hash {
    H::hash(leaf_digest)
}

/// Hash two sibling node hashes into their parent: `H(left || right)`.
pub fn node_hash<H: MerkleHasher>(left: &Hash, right: &Hash) -> Hash {
    H::hash_pair(left, right)
}

/// Interpret a byte slice as a node hash, if it has the right length.
pub(crate) fn hash_from_slice(bytes: &[u8]) -> Option<Hash> {
    bytes.try_into().ok()
}
