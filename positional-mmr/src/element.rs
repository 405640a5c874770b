//! The opaque payload stored at every MMR position.

use std::{fmt, ops::Deref};

/// An MMR element: a leaf supplied by the caller or a parent produced by
/// the merge function.
///
/// The MMR imposes no structure on the bytes; only the merge function
/// interprets them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MmrElement(Vec<u8>);

impl MmrElement {
    /// Wrap raw bytes as an element.
    pub fn new(bytes: Vec<u8>) -> Self {
        MmrElement(bytes)
    }

    /// The element bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the element and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for MmrElement {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for MmrElement {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for MmrElement {
    fn from(bytes: Vec<u8>) -> Self {
        MmrElement(bytes)
    }
}

impl From<&[u8]> for MmrElement {
    fn from(bytes: &[u8]) -> Self {
        MmrElement(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for MmrElement {
    fn from(bytes: [u8; N]) -> Self {
        MmrElement(bytes.to_vec())
    }
}

impl From<MmrElement> for Vec<u8> {
    fn from(element: MmrElement) -> Self {
        element.0
    }
}

impl fmt::Display for MmrElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}
