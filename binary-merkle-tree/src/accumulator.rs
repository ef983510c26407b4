use crate::{
    Leaf, MerkleProof, MutableTree, Result,
    hash::{MerkleHasher, Sha256Hasher},
    verify::verify_proof,
};

/// Byte-level interface of an appendable Merkle commitment.
///
/// Roots are exchanged as raw bytes: a 32-byte hash, or the empty slice
/// [`EMPTY_ROOT`](crate::EMPTY_ROOT) while nothing has been committed.
pub trait MerkleAccumulator {
    /// The item type committed to.
    type Item;
    /// The hash function the commitment uses.
    type Hasher: MerkleHasher;

    /// Root of the last built tree.
    fn get_root(&self) -> &[u8];

    /// Digest of the leaf at `index`.
    fn get_leaf(&self, index: u64) -> Result<&[u8]>;

    /// Inclusion proof for the leaf at `index`.
    fn get_merkle_proof(&self, index: u64) -> Result<MerkleProof>;

    /// Check a proof for `leaf_digest` against `root`.
    fn verify_merkle_proof(&self, leaf_digest: &[u8], proof: &MerkleProof, root: &[u8]) -> bool {
        verify_proof::<Self::Hasher>(leaf_digest, proof, root)
    }

    /// Record an item and return its index.
    fn insert(&mut self, item: Self::Item) -> u64;

    /// Rebuild after inserts and return the new root.
    fn update_tree(&mut self) -> &[u8];
}

impl<L: Leaf, H: MerkleHasher> MerkleAccumulator for MutableTree<L, H> {
    type Item = L;
    type Hasher = H;

    fn get_root(&self) -> &[u8] {
        self.tree().root_bytes()
    }

    fn get_leaf(&self, index: u64) -> Result<&[u8]> {
        self.leaf(index)
    }

    fn get_merkle_proof(&self, index: u64) -> Result<MerkleProof> {
        self.proof(index)
    }

    fn insert(&mut self, item: L) -> u64 {
        MutableTree::insert(self, item)
    }

    fn update_tree(&mut self) -> &[u8] {
        self.rebuild();
        self.tree().root_bytes()
    }
}

/// A [`MutableTree`] over raw digests with the reference hash.
pub type DigestLog = MutableTree<Vec<u8>, Sha256Hasher>;
