//! Vector entries and entry-state filters

use crate::Key;

/// Whether an entry holds a value or is only present in the key domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryState {
    /// Active entries only
    #[default]
    Set,
    /// Inactive domain entries only
    Unset,
    /// Every domain entry
    Either,
}

/// A single vector entry
///
/// Entries are plain `Copy` values produced on the fly by iteration, so no
/// allocation happens per step. `index` is the position in the vector's key
/// domain and can be passed back to the `*_entry` mutators. For unset
/// entries `value` is NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorEntry {
    pub key: Key,
    pub index: usize,
    pub value: f64,
    pub is_set: bool,
}

impl VectorEntry {
    #[inline]
    pub fn new(key: Key, index: usize, value: f64, is_set: bool) -> Self {
        Self {
            key,
            index,
            value,
            is_set,
        }
    }

    /// `(key, value)` pair
    #[inline]
    pub fn pair(&self) -> (Key, f64) {
        (self.key, self.value)
    }
}
