//! Reversible vector normalization
//!
//! A [`VectorNormalizer`] inspects a *reference* vector and produces a
//! [`VectorTransformation`]. The transformation can then be applied to any
//! vector (typically the reference itself or predictions for the same user)
//! and later undone:
//!
//! ```text
//! unapply(apply(v)) == v   (within floating-point tolerance)
//! ```
//!
//! An empty reference always yields a transformation that changes nothing.

use crate::Key;
use crate::vector::{MutableSparseVector, VectorView};

/// Reversible value transformation derived from a reference vector
pub trait VectorTransformation: Send + Sync {
    /// Transform a single value
    fn apply_value(&self, key: Key, value: f64) -> f64;

    /// Undo [`apply_value`](Self::apply_value)
    fn unapply_value(&self, key: Key, value: f64) -> f64;

    /// Transform every set value in place
    fn apply(&self, vector: &mut MutableSparseVector) {
        vector.map_values(|k, v| self.apply_value(k, v));
    }

    /// Undo [`apply`](Self::apply) in place
    fn unapply(&self, vector: &mut MutableSparseVector) {
        vector.map_values(|k, v| self.unapply_value(k, v));
    }
}

/// Builds transformations from reference vectors
pub trait VectorNormalizer: Send + Sync {
    fn make_transformation(&self, reference: &dyn VectorView) -> Box<dyn VectorTransformation>;

    /// Normalize `target` against `reference` in place
    fn normalize(&self, reference: &dyn VectorView, target: &mut MutableSparseVector) {
        self.make_transformation(reference).apply(target);
    }
}

// ── Identity ─────────────────────────────────────────────────────────────

/// Transformation that leaves values unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransformation;

impl VectorTransformation for IdentityTransformation {
    #[inline]
    fn apply_value(&self, _key: Key, value: f64) -> f64 {
        value
    }

    #[inline]
    fn unapply_value(&self, _key: Key, value: f64) -> f64 {
        value
    }

    fn apply(&self, _vector: &mut MutableSparseVector) {}

    fn unapply(&self, _vector: &mut MutableSparseVector) {}
}

/// Normalizer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl VectorNormalizer for IdentityNormalizer {
    fn make_transformation(&self, _reference: &dyn VectorView) -> Box<dyn VectorTransformation> {
        Box::new(IdentityTransformation)
    }
}

// ── Affine (shift + scale) ───────────────────────────────────────────────

/// `apply(v) = (v - offset) / scale`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransformation {
    pub offset: f64,
    pub scale: f64,
}

impl AffineTransformation {
    pub fn new(offset: f64, scale: f64) -> Self {
        debug_assert!(scale != 0.0, "scale must be non-zero");
        Self { offset, scale }
    }
}

impl VectorTransformation for AffineTransformation {
    #[inline]
    fn apply_value(&self, _key: Key, value: f64) -> f64 {
        (value - self.offset) / self.scale
    }

    #[inline]
    fn unapply_value(&self, _key: Key, value: f64) -> f64 {
        value * self.scale + self.offset
    }
}

// ── Mean centering ───────────────────────────────────────────────────────

/// Subtracts the reference vector's mean
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanCenteringNormalizer;

impl VectorNormalizer for MeanCenteringNormalizer {
    fn make_transformation(&self, reference: &dyn VectorView) -> Box<dyn VectorTransformation> {
        if reference.is_empty() {
            log::debug!("mean centering against an empty reference, using identity");
            return Box::new(IdentityTransformation);
        }
        Box::new(AffineTransformation::new(reference.mean(), 1.0))
    }
}

// ── Unit vector ──────────────────────────────────────────────────────────

/// Divides by the reference vector's Euclidean norm
///
/// A reference whose norm is within `tolerance` of zero yields the identity.
#[derive(Debug, Clone, Copy)]
pub struct UnitVectorNormalizer {
    tolerance: f64,
}

impl UnitVectorNormalizer {
    pub const DEFAULT_TOLERANCE: f64 = 1.0e-6;

    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

impl Default for UnitVectorNormalizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE)
    }
}

impl VectorNormalizer for UnitVectorNormalizer {
    fn make_transformation(&self, reference: &dyn VectorView) -> Box<dyn VectorTransformation> {
        let norm = reference.norm();
        if norm <= self.tolerance {
            log::debug!(
                "unit normalization: reference norm {} within tolerance {}, using identity",
                norm,
                self.tolerance
            );
            return Box::new(IdentityTransformation);
        }
        Box::new(AffineTransformation::new(0.0, norm))
    }
}

// ── Mean / variance ──────────────────────────────────────────────────────

/// Z-score normalization with Bayesian damping
///
/// The mean is damped toward `global_mean` by `damping` pseudo-observations.
/// The variance is damped toward a unit prior variance with the same weight:
/// `(sum((v - mean)^2) + damping) / (n + damping)`. A damped standard
/// deviation of zero falls back to identity scaling.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanVarianceNormalizer {
    damping: f64,
    global_mean: f64,
}

impl MeanVarianceNormalizer {
    pub fn new(damping: f64, global_mean: f64) -> Self {
        Self {
            damping,
            global_mean,
        }
    }
}

impl VectorNormalizer for MeanVarianceNormalizer {
    fn make_transformation(&self, reference: &dyn VectorView) -> Box<dyn VectorTransformation> {
        if reference.is_empty() {
            log::debug!("mean/variance normalization against an empty reference, using identity");
            return Box::new(IdentityTransformation);
        }
        let n = reference.size() as f64;
        let mean =
            (reference.sum() + self.damping * self.global_mean) / (n + self.damping);
        let sq_dev: f64 = reference
            .iter()
            .map(|e| (e.value - mean) * (e.value - mean))
            .sum();
        let variance = (sq_dev + self.damping) / (n + self.damping);
        let stdev = variance.sqrt();
        let scale = if stdev > 0.0 && stdev.is_finite() {
            stdev
        } else {
            1.0
        };
        Box::new(AffineTransformation::new(mean, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::SparseVector;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn test_mean_centering() {
        let reference = SparseVector::wrap(vec![4, 5], vec![3.5, 2.5]).unwrap();
        let tx = MeanCenteringNormalizer.make_transformation(&reference);

        let mut v = reference.copy();
        tx.apply(&mut v);
        assert_close(v.get(4), 0.5);
        assert_close(v.get(5), -0.5);

        let mut w = MutableSparseVector::new([4]);
        w.set(4, 2.0);
        tx.unapply(&mut w);
        assert_close(w.get(4), 5.0);
        assert_eq!(w.size(), 1);
    }

    #[test]
    fn test_normalize_in_place() {
        let reference = SparseVector::wrap(vec![1, 2], vec![1.0, 3.0]).unwrap();
        let mut target = reference.copy();
        MeanCenteringNormalizer.normalize(&reference, &mut target);
        assert_close(target.get(1), -1.0);
        assert_close(target.get(2), 1.0);
    }

    #[test]
    fn test_unit_vector() {
        let reference = SparseVector::wrap(vec![1, 2], vec![3.0, 4.0]).unwrap();
        let tx = UnitVectorNormalizer::default().make_transformation(&reference);
        let mut v = reference.copy();
        tx.apply(&mut v);
        assert_close(v.norm(), 1.0);
        assert_close(v.get(1), 0.6);
        tx.unapply(&mut v);
        assert_close(v.get(2), 4.0);
    }

    #[test]
    fn test_empty_reference_is_noop() {
        let empty = SparseVector::empty();
        let normalizers: Vec<Box<dyn VectorNormalizer>> = vec![
            Box::new(MeanCenteringNormalizer),
            Box::new(UnitVectorNormalizer::default()),
            Box::new(MeanVarianceNormalizer::new(5.0, 3.0)),
        ];
        for normalizer in normalizers {
            let tx = normalizer.make_transformation(&empty);
            let mut v = MutableSparseVector::filled([1, 2], 2.0);
            tx.apply(&mut v);
            assert_eq!(v.get(1), 2.0);
            assert_eq!(v.get(2), 2.0);
        }
    }

    #[test]
    fn test_zero_norm_reference_is_noop() {
        let zeros = SparseVector::wrap(vec![1, 2], vec![0.0, 0.0]).unwrap();
        let tx = UnitVectorNormalizer::default().make_transformation(&zeros);
        let mut v = MutableSparseVector::filled([1], 7.0);
        tx.apply(&mut v);
        assert_eq!(v.get(1), 7.0);
    }

    #[test]
    fn test_mean_variance() {
        let reference = SparseVector::wrap(vec![1, 2, 3, 4], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let tx = MeanVarianceNormalizer::default().make_transformation(&reference);
        let mut v = reference.copy();
        tx.apply(&mut v);
        assert_close(v.mean(), 0.0);
        // population variance of 1..=4 is 1.25
        assert_close(v.get(4), 1.5 / 1.25f64.sqrt());
    }

    #[test]
    fn test_mean_variance_damping() {
        let reference = SparseVector::wrap(vec![1], vec![5.0]).unwrap();
        let tx = MeanVarianceNormalizer::new(1.0, 3.0).make_transformation(&reference);
        // damped mean = (5 + 3) / 2 = 4; variance = (1 + 1) / 2 = 1
        assert_close(tx.apply_value(1, 5.0), 1.0);
    }

    #[test]
    fn test_mean_variance_unit_prior() {
        let reference = SparseVector::wrap(vec![1, 2], vec![1.0, 5.0]).unwrap();
        let tx = MeanVarianceNormalizer::new(2.0, 3.0).make_transformation(&reference);
        // mean = (6 + 2 * 3) / 4 = 3; variance = (8 + 2 * 1) / 4 = 2.5
        assert_close(tx.apply_value(2, 5.0), 2.0 / 2.5f64.sqrt());
        assert_close(tx.apply_value(1, 3.0), 0.0);
    }

    #[test]
    fn test_apply_only_touches_set_entries() {
        let reference = SparseVector::wrap(vec![1, 2], vec![1.0, 3.0]).unwrap();
        let tx = MeanCenteringNormalizer.make_transformation(&reference);
        let mut v = MutableSparseVector::new([1, 2, 3]);
        v.set(3, 10.0);
        tx.apply(&mut v);
        assert_eq!(v.size(), 1);
        assert_close(v.get(3), 8.0);
    }

    #[test]
    fn test_round_trip_random() {
        let normalizers: Vec<Box<dyn VectorNormalizer>> = vec![
            Box::new(IdentityNormalizer),
            Box::new(MeanCenteringNormalizer),
            Box::new(UnitVectorNormalizer::default()),
            Box::new(MeanVarianceNormalizer::new(3.0, 2.5)),
        ];
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let len = rng.random_range(0..30i64);
            let reference: SparseVector = (0..len)
                .map(|k| (k * 7, rng.random_range(-5.0..5.0)))
                .collect();
            for normalizer in &normalizers {
                let tx = normalizer.make_transformation(&reference);
                let mut v = reference.copy();
                tx.apply(&mut v);
                tx.unapply(&mut v);
                assert_eq!(v.size(), reference.size());
                for e in reference.iter() {
                    assert_close(v.get(e.key), e.value);
                }
            }
        }
    }
}
