use std::{cell::RefCell, collections::BTreeMap};

use crate::{MMRStoreReadOps, MMRStoreWriteOps, MmrElement, Result};

/// In-memory MMR store backed by a `BTreeMap` keyed by position.
///
/// Useful for tests and ephemeral computations. Both the owned store and a
/// shared reference implement the store traits, so a caller can hand
/// `&store` to an MMR and keep inspecting the store afterwards.
#[derive(Clone, Debug, Default)]
pub struct MemStore(RefCell<BTreeMap<u64, MmrElement>>);

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        MemStore(RefCell::new(BTreeMap::new()))
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Clone out the element at `pos`, if stored.
    pub fn get(&self, pos: u64) -> Option<MmrElement> {
        self.0.borrow().get(&pos).cloned()
    }

    fn insert_run(&self, pos: u64, elems: &[MmrElement]) {
        let mut store = self.0.borrow_mut();
        for (i, elem) in elems.iter().enumerate() {
            let previous = store.insert(pos + i as u64, elem.clone());
            debug_assert!(previous.is_none(), "position {} overwritten", pos + i as u64);
        }
    }
}

impl MMRStoreReadOps for &MemStore {
    fn element_at_position(&self, pos: u64) -> Result<Option<MmrElement>> {
        Ok(self.get(pos))
    }
}

impl MMRStoreWriteOps for &MemStore {
    fn append(&mut self, pos: u64, elems: &[MmrElement]) -> Result<()> {
        self.insert_run(pos, elems);
        Ok(())
    }
}

impl MMRStoreReadOps for MemStore {
    fn element_at_position(&self, pos: u64) -> Result<Option<MmrElement>> {
        Ok(self.get(pos))
    }
}

impl MMRStoreWriteOps for MemStore {
    fn append(&mut self, pos: u64, elems: &[MmrElement]) -> Result<()> {
        self.insert_run(pos, elems);
        Ok(())
    }
}
