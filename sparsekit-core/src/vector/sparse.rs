//! Immutable sparse vectors

use std::collections::BTreeMap;
use std::sync::Arc;

use super::mutable::MutableSparseVector;
use super::view::VectorView;
use crate::structures::KeyDomain;
use crate::{Error, Key, Result};

/// Immutable sparse vector
///
/// Holds a key domain and a shared value array. Cloning is cheap: the key
/// array and the values are shared, only the active mask is copied. Safe to
/// share across threads.
#[derive(Debug, Clone)]
pub struct SparseVector {
    domain: KeyDomain,
    values: Arc<Vec<f64>>,
}

impl SparseVector {
    /// Vector with no entries
    pub fn empty() -> Self {
        Self {
            domain: KeyDomain::empty(),
            values: Arc::new(Vec::new()),
        }
    }

    /// Wrap parallel arrays of sorted keys and values
    ///
    /// `keys` must be strictly increasing and `values` at least as long as
    /// `keys`; extra values are ignored. Every key is set.
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

    /// Build from `(key, value)` pairs in any order; later duplicates win
    pub fn from_pairs<I: IntoIterator<Item = (Key, f64)>>(pairs: I) -> Self {
        let map: BTreeMap<Key, f64> = pairs.into_iter().collect();
        Self::from_map(&map)
    }

    /// Build from an ordered map
    pub fn from_map(map: &BTreeMap<Key, f64>) -> Self {
        let domain = KeyDomain::from_keys(map.keys().copied(), true);
        let values = map.values().copied().collect();
        Self::from_parts(domain, values)
    }

    /// Assemble from a domain and a value array covering its capacity
    pub(crate) fn from_parts(domain: KeyDomain, values: Vec<f64>) -> Self {
        Self::from_shared(domain, Arc::new(values))
    }

    pub(crate) fn from_shared(domain: KeyDomain, values: Arc<Vec<f64>>) -> Self {
        debug_assert!(values.len() >= domain.size());
        Self { domain, values }
    }

    /// Same values over a differently-masked domain
    ///
    /// `domain` must be compatible with this vector's domain. Keys active in
    /// `domain` but unset here are left unset.
    pub fn with_domain(&self, domain: &KeyDomain) -> Self {
        assert!(
            self.domain.is_compatible_with(domain),
            "with_domain requires a compatible key domain"
        );
        let mut mask = domain.mask().clone();
        mask.intersect_with(self.domain.mask());
        Self::from_shared(domain.with_mask(mask), Arc::clone(&self.values))
    }

    /// Mutable copy: values are duplicated, keys are shared
    pub fn copy(&self) -> MutableSparseVector {
        MutableSparseVector::from_parts(self.domain.clone(), self.values.as_ref().clone())
    }

    /// Convert into a mutable vector, reusing the value array if unshared
    pub fn into_mutable(self) -> MutableSparseVector {
        let values = Arc::try_unwrap(self.values).unwrap_or_else(|shared| shared.as_ref().clone());
        MutableSparseVector::from_parts(self.domain, values)
    }

    /// Vector holding only the set entries, with a trimmed key array
    pub fn compact(&self) -> Self {
        if self.domain.all_active() && self.domain.size() == self.domain.capacity() {
            return self.clone();
        }
        let values = self.iter().map(|e| e.value).collect();
        Self::from_parts(self.domain.compact_copy(), values)
    }

    #[cfg(test)]
    pub(crate) fn shared_values(&self) -> &Arc<Vec<f64>> {
        &self.values
    }
}

impl VectorView for SparseVector {
    #[inline]
    fn key_domain(&self) -> &KeyDomain {
        &self.domain
    }

    #[inline]
    fn raw_values(&self) -> &[f64] {
        &self.values
    }
}

impl Default for SparseVector {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<MutableSparseVector> for SparseVector {
    fn from(vector: MutableSparseVector) -> Self {
        vector.freeze()
    }
}

impl FromIterator<(Key, f64)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (Key, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
