//! Element-wise combination of two vectors
//!
//! Only keys set in *both* operands are touched. Two strategies:
//! - **aligned**: domains are compatible, so equal indices mean equal keys
//!   and the other vector's active positions can be used directly
//! - **merge**: linear walk over both sorted active-key streams

use std::cmp::Ordering;

use super::view::VectorView;
use crate::structures::KeyDomain;

/// Apply `op(current, other)` to every key set in both `domain` and `other`
///
/// Returns the number of entries updated.
pub(crate) fn combine<V, F>(domain: &KeyDomain, values: &mut [f64], other: &V, mut op: F) -> usize
where
    V: VectorView + ?Sized,
    F: FnMut(f64, f64) -> f64,
{
    let other_domain = other.key_domain();
    let other_values = other.raw_values();
    let mut touched = 0;

    if domain.is_compatible_with(other_domain) {
        log::trace!("combine: aligned path over {} entries", other.size());
        for index in other_domain.active_indices() {
            if domain.is_active(index) {
                values[index] = op(values[index], other_values[index]);
                touched += 1;
            }
        }
        return touched;
    }

    log::trace!(
        "combine: merge path ({} x {} entries)",
        domain.active_count(),
        other.size()
    );
    let mut i = domain.next_active(0);
    let mut j = other_domain.next_active(0);
    while let (Some(ia), Some(jb)) = (i, j) {
        match domain.key(ia).cmp(&other_domain.key(jb)) {
            Ordering::Less => i = domain.next_active(ia + 1),
            Ordering::Greater => j = other_domain.next_active(jb + 1),
            Ordering::Equal => {
                values[ia] = op(values[ia], other_values[jb]);
                touched += 1;
                i = domain.next_active(ia + 1);
                j = other_domain.next_active(jb + 1);
            }
        }
    }
    touched
}

/// Like [`combine`] but also visits keys that are in `domain` and unset,
/// activating them. Used to copy values across domains.
pub(crate) fn assign<V>(domain: &mut KeyDomain, values: &mut [f64], other: &V) -> usize
where
    V: VectorView + ?Sized,
{
    let other_domain = other.key_domain();
    let other_values = other.raw_values();
    let mut touched = 0;

    if domain.is_compatible_with(other_domain) {
        for index in other_domain.active_indices() {
            values[index] = other_values[index];
            domain.set_active(index, true);
            touched += 1;
        }
        return touched;
    }

    for entry in other.iter() {
        if let Some(index) = domain.index_of(entry.key) {
            values[index] = entry.value;
            domain.set_active(index, true);
            touched += 1;
        }
    }
    touched
}
