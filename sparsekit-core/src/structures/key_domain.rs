//! Immutable sorted key domains with an active mask
//!
//! A `KeyDomain` is the universe of keys a sparse vector is defined over.
//! It has three parts:
//! - **keys**: strictly increasing, deduplicated, shared by `Arc` and never
//!   mutated after construction
//! - **size**: logical length, `size <= keys.len()`, so a larger backing
//!   array can be reused for a shorter domain
//! - **mask**: one bit per position marking the key as active (set)
//!
//! ## Key width
//!
//! Keys are `i64` at the API level. When every key fits in `i32` the
//! domain stores them in a compact 32-bit array (half the memory). The
//! choice is made once at construction and is invisible to callers.
//!
//! ## Compatibility
//!
//! Each freshly built key array gets a provenance tag. Domains derived from
//! it (clones, re-masked copies) carry the same tag. Two domains are
//! compatible iff their tags and widths match, which lets vector arithmetic
//! pair values by index without resolving keys. Domains with equal keys but
//! built independently are *not* compatible.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::bitset::{BitSet, Ones};
use crate::{Error, Key, Result};

static NEXT_PROVENANCE: AtomicU64 = AtomicU64::new(1);

#[inline]
fn next_provenance() -> u64 {
    NEXT_PROVENANCE.fetch_add(1, Ordering::Relaxed)
}

/// Storage width for domain keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyWidth {
    /// 32-bit signed keys
    Compact,
    /// 64-bit signed keys
    Full,
}

impl KeyWidth {
    /// Narrowest width able to hold every key in `keys`
    pub fn fitting(keys: &[Key]) -> Self {
        if keys
            .iter()
            .all(|&k| (i32::MIN as Key..=i32::MAX as Key).contains(&k))
        {
            KeyWidth::Compact
        } else {
            KeyWidth::Full
        }
    }

    /// Bytes per stored key
    pub fn bytes(&self) -> usize {
        match self {
            KeyWidth::Compact => 4,
            KeyWidth::Full => 8,
        }
    }
}

#[derive(Debug, Clone)]
enum KeyStorage {
    Compact(Arc<[i32]>),
    Full(Arc<[i64]>),
}

impl KeyStorage {
    /// Store keys in the narrowest width that holds them all
    fn fitted(keys: Vec<Key>) -> Self {
        match KeyWidth::fitting(&keys) {
            KeyWidth::Compact => {
                KeyStorage::Compact(keys.into_iter().map(|k| k as i32).collect::<Vec<_>>().into())
            }
            KeyWidth::Full => KeyStorage::Full(keys.into()),
        }
    }

    fn build(sorted: Vec<Key>, width: KeyWidth) -> Result<Self> {
        match width {
            KeyWidth::Full => Ok(KeyStorage::Full(sorted.into())),
            KeyWidth::Compact => {
                let narrow = sorted
                    .iter()
                    .map(|&k| i32::try_from(k).map_err(|_| Error::KeyOutOfRange(k)))
                    .collect::<Result<Vec<i32>>>()?;
                Ok(KeyStorage::Compact(narrow.into()))
            }
        }
    }

    #[inline]
    fn len(&self) -> usize {
        match self {
            KeyStorage::Compact(keys) => keys.len(),
            KeyStorage::Full(keys) => keys.len(),
        }
    }

    #[inline]
    fn width(&self) -> KeyWidth {
        match self {
            KeyStorage::Compact(_) => KeyWidth::Compact,
            KeyStorage::Full(_) => KeyWidth::Full,
        }
    }

    #[inline]
    fn get(&self, index: usize) -> Key {
        match self {
            KeyStorage::Compact(keys) => keys[index] as Key,
            KeyStorage::Full(keys) => keys[index],
        }
    }

    /// Binary search over `[0, size)`
    #[inline]
    fn search(&self, size: usize, key: Key) -> Option<usize> {
        match self {
            KeyStorage::Compact(keys) => {
                let key = i32::try_from(key).ok()?;
                keys[..size].binary_search(&key).ok()
            }
            KeyStorage::Full(keys) => keys[..size].binary_search(&key).ok(),
        }
    }

    /// First position in `[0, size)` whose key is `>= key` (or `> key` if `strict`)
    fn partition(&self, size: usize, key: Key, strict: bool) -> usize {
        match self {
            KeyStorage::Compact(keys) => {
                if key < i32::MIN as Key {
                    return 0;
                }
                if key > i32::MAX as Key {
                    return size;
                }
                let key = key as i32;
                if strict {
                    keys[..size].partition_point(|&k| k <= key)
                } else {
                    keys[..size].partition_point(|&k| k < key)
                }
            }
            KeyStorage::Full(keys) => {
                if strict {
                    keys[..size].partition_point(|&k| k <= key)
                } else {
                    keys[..size].partition_point(|&k| k < key)
                }
            }
        }
    }

    /// Copy the keys at `indices` into fresh storage of the same width
    fn gather(&self, indices: impl Iterator<Item = usize>) -> Self {
        match self {
            KeyStorage::Compact(keys) => {
                KeyStorage::Compact(indices.map(|i| keys[i]).collect::<Vec<_>>().into())
            }
            KeyStorage::Full(keys) => {
                KeyStorage::Full(indices.map(|i| keys[i]).collect::<Vec<_>>().into())
            }
        }
    }
}

/// Sorted, deduplicated key universe with an active mask
#[derive(Debug, Clone)]
pub struct KeyDomain {
    keys: KeyStorage,
    size: usize,
    mask: BitSet,
    provenance: u64,
}

impl KeyDomain {
    /// Build a domain from arbitrary keys (sorted and deduplicated here)
    pub fn from_keys<I: IntoIterator<Item = Key>>(keys: I, active: bool) -> Self {
        let mut sorted: Vec<Key> = keys.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();
        let size = sorted.len();
        Self::assemble(KeyStorage::fitted(sorted), size, active)
    }

    /// Build a domain from arbitrary keys with a forced storage width
    ///
    /// Fails with [`Error::KeyOutOfRange`] when `width` is compact and a key
    /// does not fit in 32 bits.
    pub fn from_keys_with_width<I: IntoIterator<Item = Key>>(
        keys: I,
        width: KeyWidth,
        active: bool,
    ) -> Result<Self> {
        let mut sorted: Vec<Key> = keys.into_iter().collect();
        sorted.sort_unstable();
        sorted.dedup();
        let size = sorted.len();
        let keys = KeyStorage::build(sorted, width)?;
        Ok(Self::assemble(keys, size, active))
    }

    /// Wrap pre-sorted keys, using only the first `size` of them
    ///
    /// The first `size` keys must be strictly increasing.
    pub fn wrap(keys: Vec<Key>, size: usize, active: bool) -> Result<Self> {
        if size > keys.len() {
            return Err(Error::DomainTooLarge {
                size,
                capacity: keys.len(),
            });
        }
        check_sorted(&keys[..size])?;
        Ok(Self::assemble(KeyStorage::fitted(keys), size, active))
    }

    /// Domain with no keys
    pub fn empty() -> Self {
        Self::assemble(KeyStorage::Compact(Arc::from(Vec::<i32>::new())), 0, false)
    }

    fn assemble(keys: KeyStorage, size: usize, active: bool) -> Self {
        let mask = if active {
            BitSet::full(size)
        } else {
            BitSet::new(size)
        };
        Self {
            keys,
            size,
            mask,
            provenance: next_provenance(),
        }
    }

    /// Number of keys in the domain (active or not)
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Length of the backing key array
    #[inline]
    pub fn capacity(&self) -> usize {
        self.keys.len()
    }

    /// Number of active keys
    #[inline]
    pub fn active_count(&self) -> usize {
        self.mask.count()
    }

    #[inline]
    pub fn width(&self) -> KeyWidth {
        self.keys.width()
    }

    #[inline]
    pub fn is_compact(&self) -> bool {
        self.width() == KeyWidth::Compact
    }

    /// Provenance tag shared by every domain derived from the same key array
    #[inline]
    pub fn provenance(&self) -> u64 {
        self.provenance
    }

    /// Index of `key`, whether active or not
    ///
    /// Keys outside the representable range of a compact domain are
    /// reported as absent.
    #[inline]
    pub fn index_of(&self, key: Key) -> Option<usize> {
        self.keys.search(self.size, key)
    }

    /// Index of `key` only if the key is present and active
    #[inline]
    pub fn index_if_active(&self, key: Key) -> Option<usize> {
        self.index_of(key).filter(|&i| self.mask.contains(i))
    }

    /// Key at `index`
    ///
    /// # Panics
    /// If `index >= size()`.
    #[inline]
    pub fn key(&self, index: usize) -> Key {
        assert!(
            index < self.size,
            "index {} out of domain bounds {}",
            index,
            self.size
        );
        self.keys.get(index)
    }

    /// Position of the first key `>= key`
    pub fn lower_bound(&self, key: Key) -> usize {
        self.keys.partition(self.size, key, false)
    }

    /// Position of the first key `> key`
    pub fn upper_bound(&self, key: Key) -> usize {
        self.keys.partition(self.size, key, true)
    }

    #[inline]
    pub fn contains_key(&self, key: Key) -> bool {
        self.index_of(key).is_some()
    }

    #[inline]
    pub fn is_active(&self, index: usize) -> bool {
        self.mask.contains(index)
    }

    /// Set the active flag at `index`, returning the previous flag
    #[inline]
    pub fn set_active(&mut self, index: usize, active: bool) -> bool {
        self.mask.put(index, active)
    }

    pub fn set_all_active(&mut self, active: bool) {
        self.mask.fill(active);
    }

    /// Flip every active flag
    pub fn invert(&mut self) {
        self.mask.invert();
    }

    #[inline]
    pub fn all_active(&self) -> bool {
        self.mask.count() == self.size
    }

    /// True iff index-aligned operations between the two domains are safe
    #[inline]
    pub fn is_compatible_with(&self, other: &KeyDomain) -> bool {
        self.provenance == other.provenance && self.width() == other.width()
    }

    /// Copy of this domain with every key inactive
    pub fn inactive_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.mask.fill(false);
        copy
    }

    /// Copy of this domain with only `indices` active
    pub fn with_active_indices<I: IntoIterator<Item = usize>>(&self, indices: I) -> Self {
        let mut mask = BitSet::new(self.size);
        for index in indices {
            mask.insert(index);
        }
        self.with_mask(mask)
    }

    /// Copy of this domain with a replacement mask
    ///
    /// # Panics
    /// If `mask.len() != size()`.
    pub fn with_mask(&self, mask: BitSet) -> Self {
        assert_eq!(mask.len(), self.size, "mask length must match domain size");
        Self {
            keys: self.keys.clone(),
            size: self.size,
            mask,
            provenance: self.provenance,
        }
    }

    /// Domain holding only the active keys, all active
    ///
    /// Reuses the key array when nothing would be dropped; otherwise the
    /// trimmed keys are copied and the result gets a fresh provenance.
    pub fn compact_copy(&self) -> Self {
        if self.all_active() && self.size == self.keys.len() {
            return self.clone();
        }
        log::debug!(
            "compacting key domain: {} of {} keys active, capacity {}",
            self.active_count(),
            self.size,
            self.keys.len()
        );
        let keys = self.keys.gather(self.mask.ones());
        let size = keys.len();
        Self::assemble(keys, size, true)
    }

    /// Active positions in ascending order
    #[inline]
    pub fn active_indices(&self) -> Ones<'_> {
        self.mask.ones()
    }

    /// Active keys in ascending order
    pub fn active_keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.mask.ones().map(move |i| self.keys.get(i))
    }

    /// Every domain key in ascending order, active or not
    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        (0..self.size).map(move |i| self.keys.get(i))
    }

    /// First active index at or after `from`
    #[inline]
    pub fn next_active(&self, from: usize) -> Option<usize> {
        self.mask.next_set(from)
    }

    /// First inactive index at or after `from`
    #[inline]
    pub fn next_inactive(&self, from: usize) -> Option<usize> {
        self.mask.next_clear(from)
    }

    pub(crate) fn mask(&self) -> &BitSet {
        &self.mask
    }
}

fn check_sorted(keys: &[Key]) -> Result<()> {
    for (index, pair) in keys.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(Error::UnsortedKeys {
                index: index + 1,
                previous: pair[0],
                key: pair[1],
            });
        }
    }
    Ok(())
}
