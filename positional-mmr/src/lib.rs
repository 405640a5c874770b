//! Merkle Mountain Range (MMR) — an append-only, position-addressed
//! authenticated data structure.
//!
//! Elements live in a single flat position space that encodes a forest of
//! perfect binary trees in post-order. Pushing a leaf never rewrites an
//! existing position; it only appends the leaf and the parents it completes.
//! The root is obtained by bagging the current peaks.
//!
//! # Core types
//!
//! - [`MMR`] — the main MMR struct (push, root, peaks, commit).
//! - [`MmrElement`] — the opaque byte payload stored at each position.
//! - [`Merge`] — the caller-supplied function combining two siblings.
//!   [`Blake3Merge`] is provided; `Blake2bMerge` requires the `blake2b`
//!   feature.
//!
//! # Store traits
//!
//! - [`MMRStoreReadOps`] — read an element by MMR position.
//! - [`MMRStoreWriteOps`] — persist a contiguous run of elements.
//! - [`MMRBatch`] — write buffer and read overlay in front of a store.
//! - [`MemStore`] — in-memory store (requires `mem_store` feature).

#![warn(missing_docs)]

mod element;
mod error;
pub mod helper;
/// In-memory MMR store (requires `mem_store` feature).
#[cfg(any(test, feature = "mem_store"))]
pub mod mem_store;
mod merge;
mod mmr;
mod mmr_store;
#[cfg(test)]
mod tests;

pub use element::MmrElement;
pub use error::{Error, Result};
pub use helper::{
    get_peak_map, get_peaks, is_valid_mmr_size, leaf_index_to_mmr_size, leaf_index_to_pos,
    merge_count_for_push, mmr_node_key, mmr_size_to_leaf_count, pos_height_in_tree,
};
#[cfg(any(test, feature = "mem_store"))]
pub use mem_store::MemStore;
#[cfg(any(test, feature = "blake2b"))]
pub use merge::{Blake2bMerge, blake2b_hash};
pub use merge::{Blake3Merge, Merge, blake3_merge, leaf_hash};
#[cfg(any(test, feature = "mem_store"))]
pub use mmr::InMemMMR;
pub use mmr::{MMR, bag_peaks};
pub use mmr_store::{MMRBatch, MMRStoreReadOps, MMRStoreWriteOps};
