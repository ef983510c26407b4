//! Binary Merkle tree over an ordered sequence of leaves.
//!
//! The tree commits to its leaves in order and hands out compact inclusion
//! proofs for individual leaves.
//!
//! # Hashing convention
//!
//! - Base nodes:     `H(leaf.digest())`
//! - Internal nodes: `H(left || right)`, raw concatenation
//! - A level of odd length pairs its last node with itself before the next
//!   level is derived, at every level where that happens.
//!
//! With [`Sha256Hasher`] (the default) roots and proofs match any other
//! implementation of this convention byte for byte.
//!
//! # Core types
//!
//! - [`MerkleTree`]: immutable tree with every level retained (build,
//!   root, prove).
//! - [`MerkleProof`]: authentication path with [`Direction`]s (verify,
//!   encode).
//! - [`MutableTree`]: owned leaf sequence with two-phase insert / rebuild.
//! - [`MerkleAccumulator`]: byte-level interface implemented by
//!   [`MutableTree`].
//! - [`Leaf`]: the digest capability items must provide.
//!
//! # Features
//!
//! - `blake3` (default): [`Blake3Hasher`].
//! - `serde`: `Serialize`/`Deserialize` on proofs and snapshots.

#![warn(missing_docs)]

mod accumulator;
mod error;
pub mod hash;
mod leaf;
mod mutable;
mod node;
mod proof;
mod tree;
mod verify;

#[cfg(test)]
mod tests;

pub use accumulator::{DigestLog, MerkleAccumulator};
pub use error::{Error, Result};
#[cfg(feature = "blake3")]
pub use hash::Blake3Hasher;
pub use hash::{EMPTY_ROOT, HASH_LEN, Hash, MerkleHasher, Sha256Hasher, leaf_hash, node_hash};
pub use leaf::Leaf;
pub use mutable::MutableTree;
pub use node::Node;
pub use proof::{Direction, MAX_PROOF_DEPTH, MerkleProof};
pub use tree::{MerkleTree, TreeSnapshot};
pub use verify::{verify_proof, verify_raw_proof};
