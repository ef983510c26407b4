use crate::hash::Hash;

/// A tree vertex.
///
/// Nodes live in their tree's level arena. An internal node refers to its
/// children by position in the level directly below; when the level below
/// has odd length its last node is paired with itself, so the final parent
/// reports the same child position twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    hash: Hash,
    children: Option<(usize, usize)>,
}

impl Node {
    /// Create a base-level node from an already hashed leaf digest.
    pub(crate) fn leaf(hash: Hash) -> Self {
        Node {
            hash,
            children: None,
        }
    }

    /// Create an internal node pointing at `left` and `right` in the level
    /// below.
    pub(crate) fn internal(hash: Hash, left: usize, right: usize) -> Self {
        Node {
            hash,
            children: Some((left, right)),
        }
    }

    /// The node's hash.
    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    /// Positions of the left and right child in the level below, or `None`
    /// for a base-level node.
    pub fn children(&self) -> Option<(usize, usize)> {
        self.children
    }

    /// Whether this is a base-level node.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}
