//! The merge function contract and the stock hash-based merges.
//!
//! The MMR never hashes anything itself; every parent and every bagged root
//! comes from a [`Merge`] implementation supplied at construction time. Any
//! `Fn(&MmrElement, &MmrElement) -> Result<MmrElement>` qualifies.
//!
//! [`Blake3Merge`] uses domain separation:
//! - Leaf values:  `blake3(0x00 || value)` via [`leaf_hash`]
//! - Parents:      `blake3(0x01 || left || right)`
//!
//! The tags keep a crafted leaf value from colliding with an internal merge.

use crate::{MmrElement, Result};

/// Domain tag prepended to leaf hash inputs: `blake3(LEAF_TAG || value)`.
const LEAF_TAG: u8 = 0x00;
/// Domain tag prepended to internal merge inputs: `blake3(INTERNAL_TAG ||
/// left || right)`.
const INTERNAL_TAG: u8 = 0x01;

/// Combines two sibling elements into their parent.
///
/// Implementations must be deterministic. Argument order matters: `left` is
/// always the older (lower position) element, both when building parents
/// and when bagging peaks.
pub trait Merge {
    /// Merge `left` and `right` into their parent element.
    fn merge(&self, left: &MmrElement, right: &MmrElement) -> Result<MmrElement>;
}

impl<F> Merge for F
where
    F: Fn(&MmrElement, &MmrElement) -> Result<MmrElement>,
{
    fn merge(&self, left: &MmrElement, right: &MmrElement) -> Result<MmrElement> {
        self(left, right)
    }
}

/// Domain-separated Blake3 merge: `blake3(0x01 || left || right)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Merge;

impl Merge for Blake3Merge {
    fn merge(&self, left: &MmrElement, right: &MmrElement) -> Result<MmrElement> {
        Ok(MmrElement::from(blake3_merge(left, right)))
    }
}

/// Compute `blake3(0x00 || value)`, the leaf hash paired with
/// [`Blake3Merge`].
pub fn leaf_hash(value: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[LEAF_TAG]);
    hasher.update(value);
    *hasher.finalize().as_bytes()
}

/// Compute `blake3(0x01 || left || right)`.
pub fn blake3_merge(left: &[u8], right: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[INTERNAL_TAG]);
    hasher.update(left);
    hasher.update(right);
    *hasher.finalize().as_bytes()
}

#[cfg(any(test, feature = "blake2b"))]
pub use self::blake2b::{Blake2bMerge, blake2b_hash};

#[cfg(any(test, feature = "blake2b"))]
mod blake2b {
    use blake2::{Blake2b, Digest, digest::consts::U32};

    use super::Merge;
    use crate::{MmrElement, Result};

    type Blake2b256 = Blake2b<U32>;

    /// Plain BLAKE2b-256 over the concatenation `left || right`, without
    /// domain tags.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Blake2bMerge;

    impl Merge for Blake2bMerge {
        fn merge(&self, left: &MmrElement, right: &MmrElement) -> Result<MmrElement> {
            let mut hasher = Blake2b256::new();
            hasher.update(left);
            hasher.update(right);
            Ok(MmrElement::new(hasher.finalize().to_vec()))
        }
    }

    /// Unkeyed BLAKE2b-256 of `bytes`.
    pub fn blake2b_hash(bytes: &[u8]) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&Blake2b256::digest(bytes));
        out
    }
}
