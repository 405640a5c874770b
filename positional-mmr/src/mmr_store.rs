use tracing::debug;

use crate::{MmrElement, Result};

/// Write-ahead batch buffer for MMR mutations.
///
/// Each push appends one contiguous run of elements. Runs are held in memory
/// and served back on reads (overlay semantics) until [`MMRBatch::commit`]
/// flushes them to the underlying store. The batch never flushes on its own.
#[derive(Default)]
pub struct MMRBatch<Store> {
    memory_batch: Vec<(u64, Vec<MmrElement>)>,
    store: Store,
}

impl<Store> MMRBatch<Store> {
    /// Create a new, empty batch wrapping the given store.
    pub fn new(store: Store) -> Self {
        MMRBatch {
            memory_batch: Vec::new(),
            store,
        }
    }

    /// Buffer a contiguous run of elements starting at `pos`.
    ///
    /// Runs never overlap: each one starts where the previous one ended.
    pub fn append(&mut self, pos: u64, elems: Vec<MmrElement>) {
        debug_assert!(
            self.memory_batch
                .last()
                .is_none_or(|(start, run)| start + run.len() as u64 <= pos),
            "batch runs must not overlap"
        );
        self.memory_batch.push((pos, elems));
    }

    /// Number of buffered runs.
    pub fn len(&self) -> usize {
        self.memory_batch.len()
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.memory_batch.is_empty()
    }

    /// Return a reference to the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Return a mutable reference to the underlying store.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// Drop the buffer and return the underlying store.
    ///
    /// Uncommitted runs are discarded.
    pub fn into_store(self) -> Store {
        self.store
    }
}

impl<Store: MMRStoreReadOps> MMRBatch<Store> {
    /// Look up an element by position, checking the in-memory runs
    /// newest-first before falling back to the store.
    pub fn element_at_position(&self, pos: u64) -> Result<Option<MmrElement>> {
        for (start_pos, elems) in self.memory_batch.iter().rev() {
            if pos < *start_pos {
                continue;
            } else if pos < start_pos + elems.len() as u64 {
                return Ok(elems.get((pos - start_pos) as usize).cloned());
            } else {
                // every older run lies entirely to the left of this one
                break;
            }
        }
        self.store.element_at_position(pos)
    }
}

impl<Store: MMRStoreWriteOps> MMRBatch<Store> {
    /// Flush buffered runs, oldest first, to the underlying store.
    ///
    /// A run leaves the buffer only once the store accepted it. If the store
    /// fails, the failing run and everything after it stay buffered and
    /// readable, and the store error is returned.
    pub fn commit(&mut self) -> Result<()> {
        let mut flushed = 0;
        let mut result = Ok(());
        for (pos, elems) in &self.memory_batch {
            if let Err(e) = self.store.append(*pos, elems) {
                result = Err(e);
                break;
            }
            flushed += 1;
        }
        let elements: usize = self
            .memory_batch
            .drain(..flushed)
            .map(|(_, elems)| elems.len())
            .sum();
        debug!(
            runs = flushed,
            elements,
            pending = self.memory_batch.len(),
            "committed MMR batch"
        );
        result
    }
}

impl<Store> IntoIterator for MMRBatch<Store> {
    type IntoIter = std::vec::IntoIter<Self::Item>;
    type Item = (u64, Vec<MmrElement>);

    fn into_iter(self) -> Self::IntoIter {
        self.memory_batch.into_iter()
    }
}

/// Read access to the MMR backing store.
///
/// Implementations return the element at a given MMR position, or `None` if
/// the position has not been written yet.
pub trait MMRStoreReadOps {
    /// Retrieve the element stored at `pos`, if any.
    fn element_at_position(&self, pos: u64) -> Result<Option<MmrElement>>;
}

/// Write access to the MMR backing store.
///
/// Implementations persist a contiguous run of elements starting at `pos`
/// and must never overwrite an existing position.
pub trait MMRStoreWriteOps {
    /// Persist `elems` starting at position `pos`.
    fn append(&mut self, pos: u64, elems: &[MmrElement]) -> Result<()>;
}
