//! Level-by-level construction of the tree and inclusion proof generation.

use std::marker::PhantomData;

use bincode::{Decode, Encode};
use log::{debug, trace};

use crate::{
    Error, Leaf, MerkleProof, Node, Result,
    hash::{EMPTY_ROOT, Hash, MerkleHasher, Sha256Hasher, leaf_hash},
    proof::Direction,
    verify::verify_proof,
};

/// An immutable binary Merkle tree over an ordered leaf sequence.
///
/// Level 0 holds one node per leaf, `H(leaf.digest())`, in input order.
/// Every further level pairs adjacent nodes of the level below into
/// `H(left || right)`; a level of odd length pairs its last node with itself.
/// The last level holds the single root node.
///
/// All levels are kept after construction so that proofs can be read off
/// directly. An empty tree has no levels and no root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree<H = Sha256Hasher> {
    levels: Vec<Vec<Node>>,
    leaf_count: u64,
    hasher: PhantomData<fn() -> H>,
}

impl<H> Default for MerkleTree<H> {
    fn default() -> Self {
        MerkleTree {
            levels: Vec::new(),
            leaf_count: 0,
            hasher: PhantomData,
        }
    }
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Create the empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a tree from an ordered sequence of leaves.
    pub fn build<I>(leaves: I) -> Self
    where
        I: IntoIterator,
        I::Item: Leaf,
    {
        let base = leaves
            .into_iter()
            .map(|leaf| Node::leaf(leaf_hash::<H>(&leaf.digest())))
            .collect();
        Self::from_base_level(base)
    }

    /// Build a tree from leaf digests that have already been extracted from
    /// their items.
    pub fn from_leaf_digests<D: AsRef<[u8]>>(digests: &[D]) -> Self {
        let base = digests
            .iter()
            .map(|digest| Node::leaf(leaf_hash::<H>(digest.as_ref())))
            .collect();
        Self::from_base_level(base)
    }

    fn from_base_level(base: Vec<Node>) -> Self {
        let leaf_count = base.len() as u64;
        if base.is_empty() {
            debug!("built empty {} merkle tree", H::NAME);
            return Self::empty();
        }

        let mut levels = vec![base];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next = next_level::<H>(current);
            trace!(
                "derived level {} with {} nodes from {} nodes",
                levels.len(),
                next.len(),
                current.len()
            );
            levels.push(next);
        }

        debug!(
            "built {} merkle tree with {} leaves and {} levels",
            H::NAME,
            leaf_count,
            levels.len()
        );
        MerkleTree {
            levels,
            leaf_count,
            hasher: PhantomData,
        }
    }

    /// Generate the inclusion proof for the leaf at `index`.
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= leaf_count`, which
    /// includes every index of the empty tree.
    pub fn prove(&self, index: u64) -> Result<MerkleProof> {
        if index >= self.leaf_count {
            return Err(Error::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count,
            });
        }

        let steps = self.levels.len() - 1;
        let mut path = Vec::with_capacity(steps);
        let mut directions = Vec::with_capacity(steps);
        let mut position = index as usize;
        for level in &self.levels[..steps] {
            if position % 2 == 0 {
                // past the end means the padded duplicate of this node
                let sibling = (position + 1).min(level.len() - 1);
                path.push(*level[sibling].hash());
                directions.push(Direction::Right);
            } else {
                path.push(*level[position - 1].hash());
                directions.push(Direction::Left);
            }
            position /= 2;
        }
        Ok(MerkleProof::from_verified_parts(path, directions))
    }

    /// Check a proof for `leaf_digest` against this tree's root.
    pub fn verify(&self, leaf_digest: &[u8], proof: &MerkleProof) -> bool {
        verify_proof::<H>(leaf_digest, proof, self.root_bytes())
    }

    /// Recompute every internal hash and compare it with the stored one.
    ///
    /// Trees produced by [`MerkleTree::build`] always pass; this is meant for
    /// trees restored with [`MerkleTree::from_snapshot`].
    pub fn check_integrity(&self) -> Result<()> {
        for (level_index, pair) in self.levels.windows(2).enumerate() {
            let (below, level) = (&pair[0], &pair[1]);
            for (position, node) in level.iter().enumerate() {
                let (left, right) = node.children().ok_or(Error::CorruptedNode {
                    level: level_index + 1,
                    position,
                })?;
                let expected = H::hash_pair(below[left].hash(), below[right].hash());
                if &expected != node.hash() {
                    return Err(Error::CorruptedNode {
                        level: level_index + 1,
                        position,
                    });
                }
            }
        }
        Ok(())
    }
}

impl<H> MerkleTree<H> {
    /// The root hash, or `None` for the empty tree.
    pub fn root(&self) -> Option<Hash> {
        self.root_node().map(|node| *node.hash())
    }

    /// The root hash as bytes; [`EMPTY_ROOT`] for the empty tree.
    pub fn root_bytes(&self) -> &[u8] {
        match self.root_node() {
            Some(node) => &node.hash()[..],
            None => EMPTY_ROOT,
        }
    }

    fn root_node(&self) -> Option<&Node> {
        self.levels.last().and_then(|level| level.first())
    }

    /// Number of leaves the tree was built from.
    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// Returns `true` if the tree was built from no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// Number of levels, including the base level and the root level.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// All levels, base level first.
    pub fn levels(&self) -> &[Vec<Node>] {
        &self.levels
    }

    /// The level at `level`, base level being 0.
    pub fn level(&self, level: usize) -> Option<&[Node]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// The node at `position` within `level`.
    pub fn node(&self, level: usize, position: usize) -> Option<&Node> {
        self.levels.get(level)?.get(position)
    }

    /// The base-level hash of the leaf at `index`, `H(leaf.digest())`.
    pub fn leaf_node_hash(&self, index: u64) -> Result<Hash> {
        self.levels
            .first()
            .and_then(|base| base.get(usize::try_from(index).ok()?))
            .map(|node| *node.hash())
            .ok_or(Error::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count,
            })
    }

    /// Export the level structure for an external persistence layer.
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            leaf_count: self.leaf_count,
            levels: self
                .levels
                .iter()
                .map(|level| level.iter().map(|node| *node.hash()).collect())
                .collect(),
        }
    }

    /// Restore a tree from a snapshot without rehashing.
    ///
    /// Only the shape of the snapshot is checked: the base level must hold
    /// `leaf_count` hashes, each further level `ceil(len / 2)` of the one
    /// below, and the last level exactly one. Use
    /// [`MerkleTree::check_integrity`] to also check the hashes.
    pub fn from_snapshot(snapshot: TreeSnapshot) -> Result<Self> {
        let TreeSnapshot { leaf_count, levels } = snapshot;
        if levels.is_empty() {
            if leaf_count != 0 {
                return Err(Error::InvalidData(format!(
                    "snapshot has no levels but leaf_count={}",
                    leaf_count
                )));
            }
            return Ok(MerkleTree {
                levels: Vec::new(),
                leaf_count,
                hasher: PhantomData,
            });
        }
        if levels[0].len() as u64 != leaf_count {
            return Err(Error::InvalidData(format!(
                "base level has {} hashes but leaf_count={}",
                levels[0].len(),
                leaf_count
            )));
        }
        if leaf_count == 0 {
            return Err(Error::InvalidData("snapshot has an empty base level".into()));
        }

        let mut restored: Vec<Vec<Node>> = Vec::with_capacity(levels.len());
        for (level_index, hashes) in levels.into_iter().enumerate() {
            let level = match restored.last() {
                None => hashes.into_iter().map(Node::leaf).collect(),
                Some(below) => {
                    if below.len() == 1 {
                        return Err(Error::InvalidData(format!(
                            "level {} found above the root level",
                            level_index
                        )));
                    }
                    let expected = below.len().div_ceil(2);
                    if hashes.len() != expected {
                        return Err(Error::InvalidData(format!(
                            "level {} has {} hashes, expected {}",
                            level_index,
                            hashes.len(),
                            expected
                        )));
                    }
                    let last = below.len() - 1;
                    hashes
                        .into_iter()
                        .enumerate()
                        .map(|(i, hash)| Node::internal(hash, 2 * i, (2 * i + 1).min(last)))
                        .collect()
                }
            };
            restored.push(level);
        }
        if restored.last().map(Vec::len) != Some(1) {
            return Err(Error::InvalidData(
                "snapshot does not end in a single root".into(),
            ));
        }

        Ok(MerkleTree {
            levels: restored,
            leaf_count,
            hasher: PhantomData,
        })
    }
}

/// Derive the next level up by pairing adjacent nodes.
///
/// An odd-length level pairs its last node with itself.
pub(crate) fn next_level<H: MerkleHasher>(level: &[Node]) -> Vec<Node> {
    let last = level.len() - 1;
    (0..level.len().div_ceil(2))
        .map(|i| {
            let left = 2 * i;
            let right = (left + 1).min(last);
            let hash = H::hash_pair(level[left].hash(), level[right].hash());
            Node::internal(hash, left, right)
        })
        .collect()
}

/// The level hashes of a tree, as handed to and from a persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeSnapshot {
    /// Number of leaves.
    pub leaf_count: u64,
    /// Node hashes per level, base level first.
    pub levels: Vec<Vec<Hash>>,
}

impl TreeSnapshot {
    /// Serialize this snapshot to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| Error::InvalidData(format!("failed to encode TreeSnapshot: {}", e)))
    }

    /// Deserialize a snapshot from bytes.
    ///
    /// The bincode size limit is capped at 1 GiB.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 1024 * 1024 * 1024 }>();
        let (snapshot, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| Error::InvalidData(format!("failed to decode TreeSnapshot: {}", e)))?;
        Ok(snapshot)
    }
}
