//! Merkle Mountain Range (MMR) — an append-only authenticated data structure.

use std::borrow::Cow;

use tracing::{trace, warn};

#[cfg(any(test, feature = "mem_store"))]
use crate::MemStore;
use crate::{
    Error, Merge, MmrElement, Result,
    helper::{get_peak_map, get_peaks, is_valid_mmr_size, mmr_size_to_leaf_count},
    mmr_store::{MMRBatch, MMRStoreReadOps, MMRStoreWriteOps},
};

/// A Merkle Mountain Range backed by a pluggable store.
///
/// `S` is the backing store (implements [`MMRStoreReadOps`] and/or
/// [`MMRStoreWriteOps`]); `M` is the merge function used for parents and for
/// bagging peaks.
///
/// Mutations are buffered in an [`MMRBatch`]; call [`MMR::commit`] to flush
/// them to the store. A single `MMR` value is single-writer: `push` and
/// `commit` take `&mut self`.
#[allow(clippy::upper_case_acronyms)]
pub struct MMR<S, M> {
    mmr_size: u64,
    batch: MMRBatch<S>,
    merge: M,
}

/// An MMR over a [`MemStore`] it owns.
#[cfg(any(test, feature = "mem_store"))]
pub type InMemMMR<M> = MMR<MemStore, M>;

impl<S, M> MMR<S, M> {
    /// Create a new MMR starting at the given size, backed by `store`.
    ///
    /// Use `mmr_size = 0` for a fresh, empty MMR. To resume an existing
    /// MMR, pass the size returned by [`MMR::mmr_size`] after the last
    /// committed operation.
    pub fn new(mmr_size: u64, store: S, merge: M) -> Self {
        Self::with_batch(mmr_size, MMRBatch::new(store), merge)
    }

    /// Like [`MMR::new`], but rejects sizes no sequence of pushes can
    /// produce.
    pub fn try_new(mmr_size: u64, store: S, merge: M) -> Result<Self> {
        if !is_valid_mmr_size(mmr_size) {
            return Err(Error::InvalidInput(format!(
                "{} is not a reachable MMR size",
                mmr_size
            )));
        }
        Ok(Self::new(mmr_size, store, merge))
    }

    /// Create an MMR of the given size over an existing batch.
    ///
    /// Runs already buffered in `batch` are treated as part of the MMR.
    pub fn with_batch(mmr_size: u64, batch: MMRBatch<S>, merge: M) -> Self {
        MMR {
            mmr_size,
            batch,
            merge,
        }
    }

    /// The current total number of positions (leaves + internal) in the MMR.
    pub fn mmr_size(&self) -> u64 {
        self.mmr_size
    }

    /// The number of leaves pushed so far.
    pub fn leaf_count(&self) -> u64 {
        mmr_size_to_leaf_count(self.mmr_size)
    }

    /// Returns `true` if the MMR contains no elements.
    pub fn is_empty(&self) -> bool {
        self.mmr_size == 0
    }

    /// Return a reference to the internal [`MMRBatch`].
    pub fn batch(&self) -> &MMRBatch<S> {
        &self.batch
    }

    /// Return a reference to the underlying store.
    pub fn store(&self) -> &S {
        self.batch.store()
    }

    /// Return a reference to the merge function.
    pub fn merge_fn(&self) -> &M {
        &self.merge
    }

    /// Consume the MMR and return its batch, buffered runs included.
    pub fn into_batch(self) -> MMRBatch<S> {
        self.batch
    }
}

#[cfg(any(test, feature = "mem_store"))]
impl<M> MMR<MemStore, M> {
    /// Create a fresh MMR over a new in-memory store.
    pub fn in_memory(merge: M) -> Self {
        MMR::new(0, MemStore::new(), merge)
    }
}

impl<S: MMRStoreReadOps, M> MMR<S, M> {
    // Resolve a position that must exist for the current size.
    fn required_element(&self, pos: u64) -> Result<MmrElement> {
        self.batch.element_at_position(pos)?.ok_or_else(|| {
            warn!(pos, mmr_size = self.mmr_size, "MMR store is missing an expected element");
            Error::InconsistentStore(pos)
        })
    }

    // Find an element by position. Positions at or past the committed size
    // belong to the push in progress and are taken from `elems`.
    fn find_element_at_position<'b>(
        &self,
        pos: u64,
        elems: &'b [MmrElement],
    ) -> Result<Cow<'b, MmrElement>> {
        let pos_offset = pos.checked_sub(self.mmr_size);
        if let Some(elem) = pos_offset.and_then(|i| elems.get(i as usize)) {
            return Ok(Cow::Borrowed(elem));
        }
        self.required_element(pos).map(Cow::Owned)
    }

    /// Read the element at `pos`, checking the batch before the store.
    ///
    /// Returns `Ok(None)` for positions at or past [`MMR::mmr_size`].
    pub fn element_at_position(&self, pos: u64) -> Result<Option<MmrElement>> {
        if pos >= self.mmr_size {
            return Ok(None);
        }
        self.required_element(pos).map(Some)
    }

    /// The current peak elements, left (tallest) to right.
    pub fn peaks(&self) -> Result<Vec<MmrElement>> {
        get_peaks(self.mmr_size)
            .into_iter()
            .map(|peak_pos| self.required_element(peak_pos))
            .collect()
    }
}

impl<S: MMRStoreReadOps, M: Merge> MMR<S, M> {
    /// Append a leaf element and return its position in the MMR.
    ///
    /// This may also create internal (merged) nodes, one per peak of equal
    /// height that the new leaf completes. The new nodes are buffered until
    /// [`MMR::commit`] is called. On error nothing is buffered and the size
    /// is unchanged.
    pub fn push(&mut self, elem: MmrElement) -> Result<u64> {
        let mut elems = vec![elem];
        let elem_pos = self.mmr_size;
        let peak_map = get_peak_map(self.mmr_size);
        let mut pos = self.mmr_size;
        let mut peak = 1;
        while (peak_map & peak) != 0 {
            peak <<= 1;
            pos += 1;
            let left_pos = pos - peak;
            let parent_elem = {
                let left_elem = self.find_element_at_position(left_pos, &elems)?;
                let right_elem = &elems[elems.len() - 1];
                self.merge.merge(&left_elem, right_elem)?
            };
            elems.push(parent_elem);
        }
        trace!(
            leaf_pos = elem_pos,
            merges = elems.len() - 1,
            mmr_size = pos + 1,
            "pushed MMR leaf"
        );
        self.batch.append(elem_pos, elems);
        self.mmr_size = pos + 1;
        Ok(elem_pos)
    }

    /// Compute the root by bagging all peaks right-to-left.
    ///
    /// Returns [`Error::GetRootOnEmpty`] for an empty MMR. A single-leaf MMR
    /// returns that leaf as-is.
    pub fn get_root(&self) -> Result<MmrElement> {
        if self.mmr_size == 0 {
            return Err(Error::GetRootOnEmpty);
        } else if self.mmr_size == 1 {
            return self.required_element(0);
        }
        let peaks = self.peaks()?;
        bag_peaks(&self.merge, peaks)?.ok_or(Error::GetRootOnEmpty)
    }
}

impl<S: MMRStoreWriteOps, M> MMR<S, M> {
    /// Flush all buffered mutations to the underlying store.
    pub fn commit(&mut self) -> Result<()> {
        self.batch.commit()
    }
}

/// Bag peaks right-to-left into a single element.
///
/// The two rightmost peaks are replaced by `merge(left, right)` until one
/// remains, so `n` peaks take exactly `n - 1` merges and the result equals
/// `merge(p0, merge(p1, ... merge(p[n-2], p[n-1])))`. A single peak is
/// returned unchanged; no peaks yields `None`.
pub fn bag_peaks<M: Merge>(merge: &M, mut peaks: Vec<MmrElement>) -> Result<Option<MmrElement>> {
    while let Some(right_peak) = peaks.pop() {
        let Some(left_peak) = peaks.pop() else {
            return Ok(Some(right_peak));
        };
        peaks.push(merge.merge(&left_peak, &right_peak)?);
    }
    Ok(None)
}
