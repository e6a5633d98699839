//! Similarity reducers over the intersection of two vectors

use super::intersection::Intersection;
use super::view::VectorView;

/// Dot product over the keys set in both vectors
pub fn dot<A, B>(a: &A, b: &B) -> f64
where
    A: VectorView + ?Sized,
    B: VectorView + ?Sized,
{
    Intersection::of(a, b).map(|p| p.left * p.right).sum()
}

/// Cosine similarity
///
/// The numerator runs over common keys, the norms over each full vector.
/// Returns 0 when either norm is 0.
pub fn cosine<A, B>(a: &A, b: &B) -> f64
where
    A: VectorView + ?Sized,
    B: VectorView + ?Sized,
{
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    dot(a, b) / denom
}

/// Pearson correlation over the keys set in both vectors
///
/// Means are taken over the common keys. Returns 0 with fewer than two
/// common keys or when either side has zero variance there.
pub fn pearson<A, B>(a: &A, b: &B) -> f64
where
    A: VectorView + ?Sized,
    B: VectorView + ?Sized,
{
    let mut n = 0usize;
    let mut sum_a = 0.0;
    let mut sum_b = 0.0;
    for pair in Intersection::of(a, b) {
        n += 1;
        sum_a += pair.left;
        sum_b += pair.right;
    }
    if n < 2 {
        return 0.0;
    }
    let mean_a = sum_a / n as f64;
    let mean_b = sum_b / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for pair in Intersection::of(a, b) {
        let da = pair.left - mean_a;
        let db = pair.right - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 { 0.0 } else { cov / denom }
}

/// Sum of squared differences over common keys
pub fn squared_distance<A, B>(a: &A, b: &B) -> f64
where
    A: VectorView + ?Sized,
    B: VectorView + ?Sized,
{
    Intersection::of(a, b)
        .map(|p| (p.left - p.right) * (p.left - p.right))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::SparseVector;

    fn v(pairs: &[(i64, f64)]) -> SparseVector {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_cosine() {
        let a = v(&[(1, 1.0), (2, 0.0)]);
        let b = v(&[(1, 2.0)]);
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-12);

        let c = v(&[(3, 1.0)]);
        assert_eq!(cosine(&a, &c), 0.0);
        assert_eq!(cosine(&a, &SparseVector::empty()), 0.0);
    }

    #[test]
    fn test_pearson() {
        let a = v(&[(1, 1.0), (2, 2.0), (3, 3.0), (9, 100.0)]);
        let b = v(&[(1, 2.0), (2, 4.0), (3, 6.0)]);
        assert!((pearson(&a, &b) - 1.0).abs() < 1e-12);

        let c = v(&[(1, 3.0), (2, 2.0), (3, 1.0)]);
        assert!((pearson(&a, &c) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate() {
        let a = v(&[(1, 1.0)]);
        let b = v(&[(1, 5.0)]);
        assert_eq!(pearson(&a, &b), 0.0);

        let flat = v(&[(1, 2.0), (2, 2.0)]);
        let other = v(&[(1, 1.0), (2, 3.0)]);
        assert_eq!(pearson(&flat, &other), 0.0);
    }

    #[test]
    fn test_squared_distance() {
        let a = v(&[(1, 1.0), (2, 2.0)]);
        let b = v(&[(2, 5.0), (3, 1.0)]);
        assert_eq!(squared_distance(&a, &b), 9.0);
    }
}
