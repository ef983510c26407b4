//! Inclusion proofs.
//!
//! A [`MerkleProof`] is the authentication path from one leaf to the root:
//! the sibling hash at every level below the root, and on which side of the
//! authenticated node each sibling sits.

use bincode::{Decode, Encode};

use crate::{
    Error, Result,
    hash::{Hash, MerkleHasher, hash_from_slice},
    verify::{calculate_root, verify_proof},
};

/// Maximum number of steps in a proof.
///
/// A tree over at most `u64::MAX` leaves is never more than 64 levels above
/// its base, so any deeper proof is malformed.
pub const MAX_PROOF_DEPTH: usize = 64;

/// Side of the authenticated node on which a sibling sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// The sibling is the left input: `H(sibling || current)`.
    Left,
    /// The sibling is the right input: `H(current || sibling)`.
    Right,
}

impl Direction {
    /// Path index bit: 1 for a sibling on the right, 0 for one on the left.
    pub fn bit(self) -> u64 {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
        }
    }

    /// Inverse of [`Direction::bit`]. Any value other than 0 or 1 is `None`.
    pub fn from_bit(bit: u64) -> Option<Self> {
        match bit {
            0 => Some(Direction::Left),
            1 => Some(Direction::Right),
            _ => None,
        }
    }
}

/// An inclusion proof for a single leaf.
///
/// `path[k]` is the sibling at step `k`, counted from the base level, and
/// `directions[k]` says which side it sits on. Both always have the same
/// length; a proof for a single-leaf tree is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MerkleProof {
    path: Vec<Hash>,
    directions: Vec<Direction>,
}

impl MerkleProof {
    /// Construct a proof from sibling hashes and their directions.
    ///
    /// Returns [`Error::InvalidProof`] if the lengths differ or the proof is
    /// deeper than [`MAX_PROOF_DEPTH`].
    pub fn new(path: Vec<Hash>, directions: Vec<Direction>) -> Result<Self> {
        check_shape(path.len(), directions.len())?;
        Ok(MerkleProof { path, directions })
    }

    pub(crate) fn from_verified_parts(path: Vec<Hash>, directions: Vec<Direction>) -> Self {
        debug_assert_eq!(path.len(), directions.len());
        MerkleProof { path, directions }
    }

    /// Construct a proof from raw sibling digests and path index bits
    /// (1 = sibling on the right, 0 = sibling on the left).
    pub fn from_parts<P: AsRef<[u8]>>(path: &[P], path_index: &[u64]) -> Result<Self> {
        check_shape(path.len(), path_index.len())?;
        let path = path
            .iter()
            .enumerate()
            .map(|(step, sibling)| {
                hash_from_slice(sibling.as_ref()).ok_or_else(|| {
                    Error::InvalidProof(format!(
                        "sibling at step {} is {} bytes, expected 32",
                        step,
                        sibling.as_ref().len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let directions = path_index
            .iter()
            .enumerate()
            .map(|(step, &bit)| {
                Direction::from_bit(bit).ok_or_else(|| {
                    Error::InvalidProof(format!("path index {} at step {} is not 0 or 1", bit, step))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MerkleProof { path, directions })
    }

    /// Sibling hashes, base level first.
    pub fn path(&self) -> &[Hash] {
        &self.path
    }

    /// Sibling directions, base level first.
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Directions as path index bits, see [`Direction::bit`].
    pub fn path_index_bits(&self) -> Vec<u64> {
        self.directions.iter().map(|d| d.bit()).collect()
    }

    /// Number of steps from the leaf to the root.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns `true` for the proof of a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Split the proof into its sibling hashes and directions.
    pub fn into_parts(self) -> (Vec<Hash>, Vec<Direction>) {
        (self.path, self.directions)
    }

    /// Recompute the root implied by this proof for `leaf_digest`.
    pub fn calculate_root<H: MerkleHasher>(&self, leaf_digest: &[u8]) -> Result<Hash> {
        calculate_root::<H>(leaf_digest, &self.path, &self.directions).ok_or_else(|| {
            Error::InvalidProof(format!(
                "{} sibling hashes but {} directions",
                self.path.len(),
                self.directions.len()
            ))
        })
    }

    /// Check that `leaf_digest` chains through this proof to `root`.
    pub fn verify<H: MerkleHasher>(&self, leaf_digest: &[u8], root: &[u8]) -> bool {
        verify_proof::<H>(leaf_digest, self, root)
    }

    /// Serialize this proof to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| Error::InvalidProof(format!("failed to encode MerkleProof: {}", e)))
    }

    /// Deserialize a proof from bytes.
    ///
    /// The bincode size limit is capped at 100 MiB to prevent crafted length
    /// headers from causing huge allocations. The decoded proof is checked
    /// like one passed to [`MerkleProof::new`].
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 100 * 1024 * 1024 }>();
        let (proof, _): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| Error::InvalidProof(format!("failed to decode MerkleProof: {}", e)))?;
        check_shape(proof.path.len(), proof.directions.len())?;
        Ok(proof)
    }
}

fn check_shape(path_len: usize, directions_len: usize) -> Result<()> {
    if path_len != directions_len {
        return Err(Error::InvalidProof(format!(
            "{} sibling hashes but {} directions",
            path_len, directions_len
        )));
    }
    if path_len > MAX_PROOF_DEPTH {
        return Err(Error::InvalidProof(format!(
            "proof has {} steps, max {}",
            path_len, MAX_PROOF_DEPTH
        )));
    }
    Ok(())
}
