//! Vector truncation: keep a subset of entries by rank or threshold
//!
//! Truncators never change their input. Each one decides which entries of a
//! key-ordered `(key, value)` list survive; the same decision drives
//! truncation of a [`SparseVector`] (result shares keys, values and
//! provenance with the input, only the active mask differs), of a
//! [`MutableSparseVector`] in place, and of a plain ordered map.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

use serde::{Deserialize, Serialize};

use crate::Key;
use crate::vector::{MutableSparseVector, SparseVector, VectorView};

/// Reduces a vector to a subset of its entries
pub trait VectorTruncator: Send + Sync {
    /// Keep flags for `entries`, which are in ascending key order
    fn select(&self, entries: &[(Key, f64)]) -> Vec<bool>;

    /// New vector holding only the retained entries
    fn truncate(&self, vector: &SparseVector) -> SparseVector {
        let entries: Vec<(usize, Key, f64)> =
            vector.iter().map(|e| (e.index, e.key, e.value)).collect();
        let pairs: Vec<(Key, f64)> = entries.iter().map(|&(_, k, v)| (k, v)).collect();
        let keep = self.select(&pairs);
        let indices = entries
            .iter()
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .map(|((index, _, _), _)| *index);
        let domain = vector.key_domain().with_active_indices(indices);
        log::trace!(
            "truncated vector from {} to {} entries",
            vector.size(),
            domain.active_count()
        );
        vector.with_domain(&domain)
    }

    /// Unset every entry that is not retained
    fn truncate_in_place(&self, vector: &mut MutableSparseVector) {
        let pairs: Vec<(Key, f64)> = vector.iter().map(|e| e.pair()).collect();
        let mut keep = self.select(&pairs).into_iter();
        vector.retain(|_| keep.next().unwrap_or(false));
    }

    /// New map holding only the retained entries
    fn truncate_map(&self, map: &BTreeMap<Key, f64>) -> BTreeMap<Key, f64> {
        let pairs: Vec<(Key, f64)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        let keep = self.select(&pairs);
        pairs
            .into_iter()
            .zip(keep)
            .filter_map(|(pair, keep)| keep.then_some(pair))
            .collect()
    }
}

/// Orders values with NaN below everything else
#[inline]
fn compare_values(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

// ── NoOp ─────────────────────────────────────────────────────────────────

/// Keeps every entry
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTruncator;

impl VectorTruncator for NoOpTruncator {
    fn select(&self, entries: &[(Key, f64)]) -> Vec<bool> {
        vec![true; entries.len()]
    }

    fn truncate(&self, vector: &SparseVector) -> SparseVector {
        vector.clone()
    }
}

// ── TopN ─────────────────────────────────────────────────────────────────

/// Heap candidate: greater means more worth keeping
#[derive(Debug, Clone, Copy)]
struct Candidate {
    value: f64,
    position: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_values(self.value, other.value)
            // earlier (smaller) keys win ties
            .then_with(|| other.position.cmp(&self.position))
    }
}

/// Keeps the `n` highest-valued entries; ties go to the smaller key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopNTruncator {
    n: usize,
}

impl TopNTruncator {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn n(&self) -> usize {
        self.n
    }
}

impl VectorTruncator for TopNTruncator {
    fn select(&self, entries: &[(Key, f64)]) -> Vec<bool> {
        if entries.len() <= self.n {
            return vec![true; entries.len()];
        }
        // Min-heap of the best n seen so far; the root is the weakest keeper
        let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(self.n + 1);
        for (position, &(_, value)) in entries.iter().enumerate() {
            let candidate = Candidate { value, position };
            if heap.len() < self.n {
                heap.push(Reverse(candidate));
            } else if let Some(&Reverse(weakest)) = heap.peek()
                && candidate > weakest
            {
                heap.pop();
                heap.push(Reverse(candidate));
            }
        }
        let mut keep = vec![false; entries.len()];
        for Reverse(candidate) in heap {
            keep[candidate.position] = true;
        }
        keep
    }
}

// ── Threshold ────────────────────────────────────────────────────────────

/// Direction of a threshold test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `value > cutoff`
    #[default]
    Above,
    /// `value >= cutoff`
    AtLeast,
    /// `value < cutoff`
    Below,
    /// `value <= cutoff`
    AtMost,
}

impl Comparison {
    /// Whether `value` passes against `cutoff`; NaN never passes
    #[inline]
    pub fn accepts(&self, value: f64, cutoff: f64) -> bool {
        match self {
            Comparison::Above => value > cutoff,
            Comparison::AtLeast => value >= cutoff,
            Comparison::Below => value < cutoff,
            Comparison::AtMost => value <= cutoff,
        }
    }
}

/// Keeps entries whose value passes a cutoff
///
/// With `absolute` set, the magnitude of each value is compared instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTruncator {
    cutoff: f64,
    comparison: Comparison,
    absolute: bool,
}

impl ThresholdTruncator {
    /// Keep values strictly above `cutoff`
    pub fn new(cutoff: f64) -> Self {
        Self::with_comparison(cutoff, Comparison::Above)
    }

    pub fn with_comparison(cutoff: f64, comparison: Comparison) -> Self {
        Self {
            cutoff,
            comparison,
            absolute: false,
        }
    }

    /// Compare `|value|` instead of `value` (builder pattern)
    pub fn absolute(mut self, absolute: bool) -> Self {
        self.absolute = absolute;
        self
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    #[inline]
    pub fn retains(&self, value: f64) -> bool {
        let value = if self.absolute { value.abs() } else { value };
        self.comparison.accepts(value, self.cutoff)
    }
}

impl VectorTruncator for ThresholdTruncator {
    fn select(&self, entries: &[(Key, f64)]) -> Vec<bool> {
        entries.iter().map(|&(_, v)| self.retains(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ramp(n: i64) -> SparseVector {
        let keys: Vec<Key> = (1..=n).collect();
        let values = keys.iter().map(|&k| k as f64).collect();
        SparseVector::wrap(keys, values).unwrap()
    }

    #[test]
    fn test_threshold() {
        let v = ramp(4);
        let t = ThresholdTruncator::new(3.5).truncate(&v);
        assert_eq!(t.to_map(), BTreeMap::from([(4, 4.0)]));
        // input untouched
        assert_eq!(v.size(), 4);
    }

    #[test]
    fn test_threshold_directions() {
        let v = ramp(4);
        let keys = |c: Comparison| {
            ThresholdTruncator::with_comparison(3.0, c)
                .truncate(&v)
                .key_set()
        };
        assert_eq!(keys(Comparison::Above), vec![4]);
        assert_eq!(keys(Comparison::AtLeast), vec![3, 4]);
        assert_eq!(keys(Comparison::Below), vec![1, 2]);
        assert_eq!(keys(Comparison::AtMost), vec![1, 2, 3]);
    }

    #[test]
    fn test_threshold_absolute() {
        let v = SparseVector::wrap(vec![1, 2, 3], vec![-5.0, 0.5, 4.0]).unwrap();
        let t = ThresholdTruncator::new(1.0).absolute(true).truncate(&v);
        assert_eq!(t.key_set(), vec![1, 3]);
    }

    #[test]
    fn test_threshold_drops_nan() {
        let v = SparseVector::wrap(vec![1, 2], vec![f64::NAN, 2.0]).unwrap();
        let t = ThresholdTruncator::with_comparison(0.0, Comparison::AtLeast).truncate(&v);
        assert_eq!(t.key_set(), vec![2]);
    }

    #[test]
    fn test_top_n() {
        let v = ramp(5);
        let t = TopNTruncator::new(3).truncate(&v);
        assert_eq!(t.to_map(), BTreeMap::from([(3, 3.0), (4, 4.0), (5, 5.0)]));
        assert!(t.key_domain().is_compatible_with(v.key_domain()));
    }

    #[test]
    fn test_top_n_larger_than_vector() {
        let v = ramp(2);
        assert_eq!(TopNTruncator::new(10).truncate(&v).size(), 2);
        assert_eq!(TopNTruncator::new(0).truncate(&v).size(), 0);
    }

    #[test]
    fn test_top_n_ties_prefer_smaller_keys() {
        let v = SparseVector::wrap(vec![1, 2, 3, 4], vec![1.0, 2.0, 2.0, 2.0]).unwrap();
        let t = TopNTruncator::new(2).truncate(&v);
        assert_eq!(t.key_set(), vec![2, 3]);
    }

    #[test]
    fn test_top_n_ranks_nan_last() {
        let v = SparseVector::wrap(vec![1, 2, 3], vec![f64::NAN, -1.0, 0.0]).unwrap();
        let t = TopNTruncator::new(2).truncate(&v);
        assert_eq!(t.key_set(), vec![2, 3]);
    }

    #[test]
    fn test_top_n_size_bound() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let len = rng.random_range(0..50);
            let pairs: Vec<(Key, f64)> = (0..len)
                .map(|k| (k as Key, rng.random_range(0..10) as f64))
                .collect();
            let v: SparseVector = pairs.iter().copied().collect();
            let n = rng.random_range(0..60);
            let t = TopNTruncator::new(n).truncate(&v);

            assert_eq!(t.size(), n.min(v.size()));
            let min_kept = t.iter().map(|e| e.value).fold(f64::INFINITY, f64::min);
            for e in v.iter().filter(|e| !t.contains_key(e.key)) {
                assert!(e.value <= min_kept);
            }
        }
    }

    #[test]
    fn test_truncate_map_matches_vector() {
        let map: BTreeMap<Key, f64> = (1..=5).map(|k| (k, (k % 3) as f64)).collect();
        let truncator = TopNTruncator::new(2);
        let from_map = truncator.truncate_map(&map);
        let from_vector = truncator.truncate(&SparseVector::from_map(&map)).to_map();
        assert_eq!(from_map, from_vector);
        assert_eq!(from_map, BTreeMap::from([(2, 2.0), (5, 2.0)]));
    }

    #[test]
    fn test_truncate_in_place() {
        let mut v = ramp(5).copy();
        ThresholdTruncator::with_comparison(2.0, Comparison::AtMost).truncate_in_place(&mut v);
        assert_eq!(v.key_set(), vec![1, 2]);
        assert_eq!(v.key_domain().size(), 5);
    }

    #[test]
    fn test_no_op() {
        let v = ramp(3);
        assert_eq!(NoOpTruncator.truncate(&v).to_map(), v.to_map());
        assert_eq!(NoOpTruncator.truncate_map(&v.to_map()).len(), 3);
    }

    #[test]
    fn test_truncate_respects_unset_entries() {
        let mut m = ramp(4).copy();
        m.unset(4);
        let v = m.freeze();
        let t = TopNTruncator::new(2).truncate(&v);
        assert_eq!(t.key_set(), vec![2, 3]);
    }
}
