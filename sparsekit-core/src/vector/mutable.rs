//! Mutable sparse vectors
//!
//! A `MutableSparseVector` owns its value array and its copy of the active
//! mask. Values may change and keys may be set or unset, but the key domain
//! itself is fixed: a key outside the domain can never be added. Setting such
//! a key is a silent no-op that returns NaN, so call sites that do not
//! pre-check membership stay branch-free.
//!
//! Once populated, [`freeze`](MutableSparseVector::freeze) turns the vector
//! into an immutable [`SparseVector`] without copying.

use std::collections::BTreeMap;

use super::entry::VectorEntry;
use super::ops;
use super::sparse::SparseVector;
use super::view::VectorView;
use crate::structures::KeyDomain;
use crate::{Error, Key, Result};

/// Sparse vector with in-place value updates over a fixed key domain
#[derive(Debug, Clone)]
pub struct MutableSparseVector {
    domain: KeyDomain,
    values: Vec<f64>,
}

impl MutableSparseVector {
    /// Vector over `keys` with every key unset
    pub fn new<I: IntoIterator<Item = Key>>(keys: I) -> Self {
        Self::over(&KeyDomain::from_keys(keys, false))
    }

    /// Vector over `keys` with every key set to `value`
    pub fn filled<I: IntoIterator<Item = Key>>(keys: I, value: f64) -> Self {
        let domain = KeyDomain::from_keys(keys, true);
        let values = vec![value; domain.capacity()];
        Self::from_parts(domain, values)
    }

    /// Empty vector over a domain derived from `domain`
    ///
    /// The result is compatible with `domain` and every key is unset.
    pub fn over(domain: &KeyDomain) -> Self {
        let domain = domain.inactive_copy();
        let values = vec![f64::NAN; domain.capacity()];
        Self::from_parts(domain, values)
    }

    /// Wrap parallel arrays of sorted keys and values; every key is set
    pub fn wrap(keys: Vec<Key>, values: Vec<f64>) -> Result<Self> {
        if values.len() < keys.len() {
            return Err(Error::ValuesTooShort {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let size = keys.len();
        let domain = KeyDomain::wrap(keys, size, true)?;
        Ok(Self::from_parts(domain, values))
    }

    /// Build from an ordered map; every key is set
    pub fn from_map(map: &BTreeMap<Key, f64>) -> Self {
        let domain = KeyDomain::from_keys(map.keys().copied(), true);
        let values = map.values().copied().collect();
        Self::from_parts(domain, values)
    }

    pub(crate) fn from_parts(domain: KeyDomain, values: Vec<f64>) -> Self {
        debug_assert!(values.len() >= domain.size());
        Self { domain, values }
    }

    /// Set the value for `key`, returning the previous value
    ///
    /// Sets the key if it was unset (previous value NaN). Keys outside the
    /// domain are ignored and NaN is returned.
    #[inline]
    pub fn set(&mut self, key: Key, value: f64) -> f64 {
        match self.domain.index_of(key) {
            Some(index) => self.set_at(index, value),
            None => f64::NAN,
        }
    }

    /// Set the value at an entry obtained from this vector (or a compatible one)
    #[inline]
    pub fn set_entry(&mut self, entry: &VectorEntry, value: f64) -> f64 {
        debug_assert_eq!(self.domain.key(entry.index), entry.key);
        self.set_at(entry.index, value)
    }

    #[inline]
    fn set_at(&mut self, index: usize, value: f64) -> f64 {
        let was_set = self.domain.set_active(index, true);
        let old = std::mem::replace(&mut self.values[index], value);
        if was_set { old } else { f64::NAN }
    }

    /// Add `delta` to the value for a set key, returning the new value
    ///
    /// Unset or unknown keys are left alone and NaN is returned.
    #[inline]
    pub fn add_value(&mut self, key: Key, delta: f64) -> f64 {
        match self.domain.index_if_active(key) {
            Some(index) => {
                self.values[index] += delta;
                self.values[index]
            }
            None => f64::NAN,
        }
    }

    /// Unset `key`, returning its previous value (NaN if it was not set)
    pub fn unset(&mut self, key: Key) -> f64 {
        match self.domain.index_if_active(key) {
            Some(index) => self.unset_at(index),
            None => f64::NAN,
        }
    }

    pub fn unset_entry(&mut self, entry: &VectorEntry) -> f64 {
        if self.domain.is_active(entry.index) {
            self.unset_at(entry.index)
        } else {
            f64::NAN
        }
    }

    #[inline]
    fn unset_at(&mut self, index: usize) -> f64 {
        self.domain.set_active(index, false);
        std::mem::replace(&mut self.values[index], f64::NAN)
    }

    /// Set every domain key to `value`
    pub fn fill(&mut self, value: f64) {
        let size = self.domain.size();
        self.values[..size].fill(value);
        self.domain.set_all_active(true);
    }

    /// Unset every key
    pub fn clear(&mut self) {
        self.domain.set_all_active(false);
    }

    /// Multiply every set value by `scale`
    pub fn multiply(&mut self, scale: f64) {
        for index in self.domain.active_indices() {
            self.values[index] *= scale;
        }
    }

    /// Apply `f(key, value)` to every set value
    pub fn map_values<F: FnMut(Key, f64) -> f64>(&mut self, mut f: F) {
        for index in self.domain.active_indices() {
            let key = self.domain.key(index);
            self.values[index] = f(key, self.values[index]);
        }
    }

    /// Add `other` element-wise over the keys set in both vectors
    ///
    /// Keys not set here are never introduced.
    pub fn add<V: VectorView + ?Sized>(&mut self, other: &V) {
        ops::combine(&self.domain, &mut self.values, other, |a, b| a + b);
    }

    /// Subtract `other` element-wise over the keys set in both vectors
    pub fn subtract<V: VectorView + ?Sized>(&mut self, other: &V) {
        ops::combine(&self.domain, &mut self.values, other, |a, b| a - b);
    }

    /// Like [`add`](Self::add), but a NaN value here is replaced by the
    /// other value instead of being summed
    pub fn add_clear_nan<V: VectorView + ?Sized>(&mut self, other: &V) {
        ops::combine(&self.domain, &mut self.values, other, |a, b| {
            if a.is_nan() { b } else { a + b }
        });
    }

    /// Copy every value of `other` whose key is in this domain, setting it
    ///
    /// Returns the number of values copied.
    pub fn set_all<V: VectorView + ?Sized>(&mut self, other: &V) -> usize {
        ops::assign(&mut self.domain, &mut self.values, other)
    }

    /// Keep only entries for which `keep` returns true
    pub fn retain<F: FnMut(&VectorEntry) -> bool>(&mut self, mut keep: F) {
        let drop: Vec<usize> = self
            .iter()
            .filter(|e| !keep(e))
            .map(|e| e.index)
            .collect();
        for index in drop {
            self.unset_at(index);
        }
    }

    /// Copy with a domain holding only the set keys
    pub fn shrink_domain(&self) -> MutableSparseVector {
        let values = self.iter().map(|e| e.value).collect();
        Self::from_parts(self.domain.compact_copy(), values)
    }

    /// Deep copy (values duplicated, keys shared)
    pub fn copy(&self) -> MutableSparseVector {
        self.clone()
    }

    /// Immutable snapshot; values are copied so this vector stays usable
    pub fn immutable(&self) -> SparseVector {
        SparseVector::from_parts(self.domain.clone(), self.values.clone())
    }

    /// Convert into an immutable vector without copying
    pub fn freeze(self) -> SparseVector {
        SparseVector::from_parts(self.domain, self.values)
    }
}

impl VectorView for MutableSparseVector {
    #[inline]
    fn key_domain(&self) -> &KeyDomain {
        &self.domain
    }

    #[inline]
    fn raw_values(&self) -> &[f64] {
        &self.values
    }
}
