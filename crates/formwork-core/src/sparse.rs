// File: formwork-core/src/sparse.rs
// Purpose: Integer-keyed storage with genuinely absent slots

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Integer-keyed storage whose missing slots are genuinely absent.
///
/// A `Vec<Option<T>>` cannot distinguish "explicitly cleared" from "never
/// written", so sparse positions are kept out of the storage entirely: a
/// logical length is tracked alongside a map of the slots that actually hold
/// a value, and [`SparseSlots::has`] answers the "is there anything at this
/// index" question that bounds checks cannot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseSlots<T> {
    len: usize,
    slots: BTreeMap<usize, T>,
}

impl<T> SparseSlots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical length, counting absent slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a value is present at `index`; absent slots within range
    /// answer `false`.
    pub fn has(&self, index: usize) -> bool {
        self.slots.contains_key(&index)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(&index)
    }

    /// Sets the slot at `index`, extending the logical length as needed.
    /// Positions below `index` that were never written stay absent.
    pub fn set(&mut self, index: usize, value: T) {
        self.slots.insert(index, value);
        self.len = self.len.max(index + 1);
    }

    /// Clears the slot at `index` without shrinking the logical length; the
    /// position becomes absent, exactly as if it had never been written.
    pub fn clear_slot(&mut self, index: usize) -> Option<T> {
        self.len = self.len.max(index + 1);
        self.slots.remove(&index)
    }

    /// Whether every slot is absent, regardless of logical length.
    pub fn is_hollow(&self) -> bool {
        self.slots.is_empty()
    }

    /// Present slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots.iter().map(|(index, value)| (*index, value))
    }
}

impl<T> Default for SparseSlots<T> {
    fn default() -> Self {
        Self {
            len: 0,
            slots: BTreeMap::new(),
        }
    }
}

/// Builds dense storage: every collected element is present, in order.
impl<T> FromIterator<T> for SparseSlots<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut slots = Self::new();
        for (index, value) in iter.into_iter().enumerate() {
            slots.set(index, value);
        }
        slots
    }
}
