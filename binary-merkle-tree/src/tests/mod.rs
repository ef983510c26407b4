use crate::{Hash, Leaf, MerkleHasher, Sha256Hasher};

mod test_proof;

/// A test item whose digest is the SHA-256 of its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StringItem(pub(crate) String);

impl StringItem {
    pub(crate) fn new(data: &str) -> Self {
        StringItem(data.to_string())
    }
}

impl Leaf for StringItem {
    fn digest(&self) -> Vec<u8> {
        Sha256Hasher::hash(self.0.as_bytes()).to_vec()
    }
}

pub(crate) fn items(data: &[&str]) -> Vec<StringItem> {
    data.iter().map(|d| StringItem::new(d)).collect()
}

/// `count` items all carrying the same text.
pub(crate) fn repeated_items(count: usize, data: &str) -> Vec<StringItem> {
    (0..count).map(|_| StringItem::new(data)).collect()
}

/// Raw 32-byte digests derived from an integer (for test convenience).
pub(crate) fn digest_from_u32(i: u32) -> Vec<u8> {
    Sha256Hasher::hash(&i.to_le_bytes()).to_vec()
}

pub(crate) fn sha256(data: &[u8]) -> Hash {
    Sha256Hasher::hash(data)
}

pub(crate) fn sha256_pair(left: &Hash, right: &Hash) -> Hash {
    let mut input = left.to_vec();
    input.extend_from_slice(right);
    Sha256Hasher::hash(&input)
}

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
