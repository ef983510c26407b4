//! An appendable leaf set with an explicitly rebuilt tree.

use log::debug;

use crate::{
    Error, Leaf, MerkleProof, MerkleTree, Result,
    hash::{Hash, MerkleHasher, Sha256Hasher},
};

/// An owned, ordered leaf sequence plus the tree last built from it.
///
/// Mutation is two-phase: [`MutableTree::insert`] only records the leaf, and
/// [`MutableTree::rebuild`] replaces the tree with one built from every leaf
/// recorded so far. Batch inserts before a single rebuild; each rebuild
/// rehashes the whole tree.
///
/// Root and proofs always describe the last built tree, so a leaf inserted
/// after the last rebuild is not provable yet.
#[derive(Debug, Clone)]
pub struct MutableTree<L, H = Sha256Hasher> {
    leaves: Vec<L>,
    digests: Vec<Vec<u8>>,
    tree: MerkleTree<H>,
}

impl<L, H> Default for MutableTree<L, H> {
    fn default() -> Self {
        MutableTree {
            leaves: Vec::new(),
            digests: Vec::new(),
            tree: MerkleTree::default(),
        }
    }
}

impl<L: Leaf, H: MerkleHasher> MutableTree<L, H> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a leaf sequence and build its tree right away.
    ///
    /// This is the path a persistence layer uses to restore a tree from its
    /// stored leaves.
    pub fn from_leaves<I: IntoIterator<Item = L>>(leaves: I) -> Self {
        let leaves: Vec<L> = leaves.into_iter().collect();
        let digests: Vec<Vec<u8>> = leaves.iter().map(Leaf::digest).collect();
        let tree = MerkleTree::from_leaf_digests(&digests);
        MutableTree {
            leaves,
            digests,
            tree,
        }
    }

    /// Append a leaf and return its index. The tree is not rebuilt.
    pub fn insert(&mut self, leaf: L) -> u64 {
        let index = self.leaves.len() as u64;
        self.digests.push(leaf.digest());
        self.leaves.push(leaf);
        index
    }

    /// Rebuild the tree from every recorded leaf and return the new root.
    ///
    /// Rebuilding again without an insert in between yields the same root.
    pub fn rebuild(&mut self) -> Option<Hash> {
        let pending = self.pending();
        self.tree = MerkleTree::from_leaf_digests(&self.digests);
        debug!(
            "rebuilt tree over {} leaves ({} new)",
            self.digests.len(),
            pending
        );
        self.tree.root()
    }

    /// Insert a leaf and rebuild immediately.
    pub fn append(&mut self, leaf: L) -> (u64, Option<Hash>) {
        let index = self.insert(leaf);
        (index, self.rebuild())
    }

    /// Returns `true` if a leaf with the same digest has been recorded.
    pub fn contains(&self, leaf: &L) -> bool {
        self.leaf_index(&leaf.digest()).is_some()
    }
}

impl<L, H: MerkleHasher> MutableTree<L, H> {
    /// Inclusion proof for `index` in the last built tree.
    pub fn proof(&self, index: u64) -> Result<MerkleProof> {
        self.tree.prove(index)
    }
}

impl<L, H> MutableTree<L, H> {
    /// The digest of the leaf at `index`, as returned by [`Leaf::digest`].
    pub fn leaf(&self, index: u64) -> Result<&[u8]> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.digests.get(i))
            .map(Vec::as_slice)
            .ok_or(Error::IndexOutOfRange {
                index,
                leaf_count: self.len(),
            })
    }

    /// Index of the first recorded leaf whose digest equals `digest`.
    pub fn leaf_index(&self, digest: &[u8]) -> Option<u64> {
        self.digests
            .iter()
            .position(|d| d.as_slice() == digest)
            .map(|i| i as u64)
    }

    /// Root of the last built tree, `None` if it is empty.
    pub fn root(&self) -> Option<Hash> {
        self.tree.root()
    }

    /// The last built tree.
    pub fn tree(&self) -> &MerkleTree<H> {
        &self.tree
    }

    /// Number of recorded leaves, built or not.
    pub fn len(&self) -> u64 {
        self.leaves.len() as u64
    }

    /// Returns `true` if no leaf has been recorded.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Number of leaves recorded since the last rebuild.
    pub fn pending(&self) -> u64 {
        self.len() - self.tree.leaf_count()
    }

    /// The recorded leaves in insertion order.
    pub fn leaves(&self) -> &[L] {
        &self.leaves
    }

    /// The recorded leaf digests in insertion order.
    pub fn leaf_digests(&self) -> &[Vec<u8>] {
        &self.digests
    }

    /// Give back the recorded leaves.
    pub fn into_leaves(self) -> Vec<L> {
        self.leaves
    }
}
