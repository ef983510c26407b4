/// An item that can be committed to as a tree leaf.
///
/// The tree never looks at the item itself, only at the bytes returned by
/// [`Leaf::digest`]. Those bytes are hashed once more to form the base-level
/// node, so the digest may have any length.
pub trait Leaf {
    /// The item's digest.
    fn digest(&self) -> Vec<u8>;
}

impl<T: Leaf + ?Sized> Leaf for &T {
    fn digest(&self) -> Vec<u8> {
        (**self).digest()
    }
}

impl Leaf for [u8] {
    fn digest(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl Leaf for Vec<u8> {
    fn digest(&self) -> Vec<u8> {
        self.clone()
    }
}

impl<const N: usize> Leaf for [u8; N] {
    fn digest(&self) -> Vec<u8> {
        self.to_vec()
    }
}
