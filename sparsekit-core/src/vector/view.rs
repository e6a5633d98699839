//! Read-only vector access shared by the immutable and mutable vectors

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::cursor::ActiveCursor;
use super::entry::{EntryState, VectorEntry};
use super::intersection::Intersection;
use super::stats;
use crate::Key;
use crate::structures::KeyDomain;

/// Read access to a sparse vector
///
/// Implementors provide the key domain and the value array parallel to the
/// domain's keys. Everything else is derived: lookups resolve the key to a
/// domain index by binary search and then read the array directly.
///
/// Absent keys are reported as NaN by [`get`](Self::get) and as `None` by
/// [`try_get`](Self::try_get). A key whose value was explicitly set to NaN
/// is still present: `try_get` returns `Some(NaN)`.
pub trait VectorView {
    /// Key domain the vector is defined over
    fn key_domain(&self) -> &KeyDomain;

    /// Value array parallel to the domain keys (only active slots are meaningful)
    fn raw_values(&self) -> &[f64];

    /// Number of set entries
    #[inline]
    fn size(&self) -> usize {
        self.key_domain().active_count()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Value for `key`, or `None` if the key is unset or outside the domain
    #[inline]
    fn try_get(&self, key: Key) -> Option<f64> {
        self.key_domain()
            .index_if_active(key)
            .map(|i| self.raw_values()[i])
    }

    /// Value for `key`, or NaN if absent
    #[inline]
    fn get(&self, key: Key) -> f64 {
        self.try_get(key).unwrap_or(f64::NAN)
    }

    /// Value for `key`, or `default` if absent
    #[inline]
    fn get_or(&self, key: Key, default: f64) -> f64 {
        self.try_get(key).unwrap_or(default)
    }

    #[inline]
    fn contains_key(&self, key: Key) -> bool {
        self.key_domain().index_if_active(key).is_some()
    }

    /// Set entries in key order
    fn iter(&self) -> Entries<'_> {
        self.fast_iter(EntryState::Set)
    }

    /// Entries in key order, filtered by state
    ///
    /// Unset entries carry a NaN value.
    fn fast_iter(&self, state: EntryState) -> Entries<'_> {
        Entries {
            domain: self.key_domain(),
            values: self.raw_values(),
            next: 0,
            state,
        }
    }

    /// Cursor over set entries, for use with [`Intersection`] and friends
    fn cursor(&self) -> ActiveCursor<'_> {
        ActiveCursor::new(self.key_domain(), self.raw_values())
    }

    /// Set keys in ascending order
    fn key_set(&self) -> Vec<Key> {
        self.key_domain().active_keys().collect()
    }

    /// Set keys ordered by value; ties keep ascending key order
    ///
    /// NaN values sort after every number in either direction.
    fn keys_by_value(&self, descending: bool) -> Vec<Key> {
        let mut entries: Vec<(Key, f64)> = self.iter().map(|e| e.pair()).collect();
        entries.sort_by(|a, b| match (a.1.is_nan(), b.1.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = a.1.total_cmp(&b.1);
                if descending { ord.reverse() } else { ord }
            }
        });
        entries.into_iter().map(|(k, _)| k).collect()
    }

    fn sum(&self) -> f64 {
        self.iter().map(|e| e.value).sum()
    }

    fn sum_abs(&self) -> f64 {
        self.iter().map(|e| e.value.abs()).sum()
    }

    /// Mean of set values, 0 for an empty vector
    fn mean(&self) -> f64 {
        let n = self.size();
        if n == 0 { 0.0 } else { self.sum() / n as f64 }
    }

    /// Euclidean (L2) norm
    fn norm(&self) -> f64 {
        self.iter().map(|e| e.value * e.value).sum::<f64>().sqrt()
    }

    /// Dot product over the keys set in both vectors
    fn dot(&self, other: &dyn VectorView) -> f64 {
        stats::dot(self, other)
    }

    /// Number of keys set in both vectors
    fn count_common(&self, other: &dyn VectorView) -> usize {
        Intersection::of(self, other).count()
    }

    /// Set entries as an ordered map
    fn to_map(&self) -> BTreeMap<Key, f64> {
        self.iter().map(|e| e.pair()).collect()
    }
}

/// Entry iterator over a vector's domain
pub struct Entries<'a> {
    domain: &'a KeyDomain,
    values: &'a [f64],
    next: usize,
    state: EntryState,
}

impl Iterator for Entries<'_> {
    type Item = VectorEntry;

    #[inline]
    fn next(&mut self) -> Option<VectorEntry> {
        let index = match self.state {
            EntryState::Set => self.domain.next_active(self.next)?,
            EntryState::Unset => self.domain.next_inactive(self.next)?,
            EntryState::Either => {
                if self.next >= self.domain.size() {
                    return None;
                }
                self.next
            }
        };
        self.next = index + 1;
        let is_set = self.domain.is_active(index);
        let value = if is_set {
            self.values[index]
        } else {
            f64::NAN
        };
        Some(VectorEntry::new(self.domain.key(index), index, value, is_set))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = self.domain.size().saturating_sub(self.next);
        (0, Some(upper))
    }
}
