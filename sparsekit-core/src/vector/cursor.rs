//! Forward-only cursors over the set entries of a vector.
//!
//! `KeyCursor` is the iteration primitive behind intersections and unions:
//! a cursor sits on one set entry at a time and only moves forward.
//! Exhaustion is signalled by the [`TERMINATED`] index.

use crate::Key;
use crate::structures::KeyDomain;

/// Index reported by an exhausted cursor
pub const TERMINATED: usize = usize::MAX;

/// Forward-only cursor over set entries in ascending key order.
pub trait KeyCursor {
    /// Current domain index, or [`TERMINATED`] if exhausted.
    fn index(&self) -> usize;

    /// Current key, or `None` if exhausted.
    fn key(&self) -> Option<Key>;

    /// Current value. Only meaningful while not exhausted.
    fn value(&self) -> f64;

    /// Move to the next set entry. Returns the new index or [`TERMINATED`].
    fn advance(&mut self) -> usize;

    /// Move to the first set entry whose key is `>= target`.
    fn seek(&mut self, target: Key) -> usize {
        while let Some(key) = self.key() {
            if key >= target {
                break;
            }
            self.advance();
        }
        self.index()
    }

    /// Upper bound on the number of entries left.
    fn size_hint(&self) -> usize;

    #[inline]
    fn is_terminated(&self) -> bool {
        self.index() == TERMINATED
    }
}

// ── ActiveCursor ─────────────────────────────────────────────────────────

/// Cursor over the active positions of a key domain and its value array.
#[derive(Clone)]
pub struct ActiveCursor<'a> {
    domain: &'a KeyDomain,
    values: &'a [f64],
    index: usize,
    remaining: usize,
}

impl<'a> ActiveCursor<'a> {
    pub fn new(domain: &'a KeyDomain, values: &'a [f64]) -> Self {
        let index = domain.next_active(0).unwrap_or(TERMINATED);
        Self {
            domain,
            values,
            index,
            remaining: domain.active_count(),
        }
    }

    #[inline]
    pub fn domain(&self) -> &'a KeyDomain {
        self.domain
    }
}

impl KeyCursor for ActiveCursor<'_> {
    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    #[inline]
    fn key(&self) -> Option<Key> {
        (self.index != TERMINATED).then(|| self.domain.key(self.index))
    }

    #[inline]
    fn value(&self) -> f64 {
        debug_assert!(self.index != TERMINATED, "value() on exhausted cursor");
        self.values[self.index]
    }

    #[inline]
    fn advance(&mut self) -> usize {
        if self.index != TERMINATED {
            self.remaining = self.remaining.saturating_sub(1);
            self.index = self.domain.next_active(self.index + 1).unwrap_or(TERMINATED);
        }
        self.index
    }

    fn seek(&mut self, target: Key) -> usize {
        match self.key() {
            None => return TERMINATED,
            Some(key) if key >= target => return self.index,
            Some(_) => {}
        }
        // Binary search for the landing spot, then skip inactive slots
        let from = self.domain.lower_bound(target);
        self.index = self.domain.next_active(from).unwrap_or(TERMINATED);
        self.remaining = if self.index == TERMINATED {
            0
        } else {
            self.remaining.min(self.domain.size() - self.index)
        };
        self.index
    }

    fn size_hint(&self) -> usize {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain_with(keys: &[Key], active: &[Key]) -> KeyDomain {
        let mut domain = KeyDomain::from_keys(keys.iter().copied(), false);
        for &k in active {
            let index = domain.index_of(k).unwrap();
            domain.set_active(index, true);
        }
        domain
    }

    #[test]
    fn test_active_cursor_skips_inactive() {
        let domain = domain_with(&[1, 3, 5, 7, 9], &[3, 7, 9]);
        let values = [10.0, 30.0, 50.0, 70.0, 90.0];
        let mut cursor = ActiveCursor::new(&domain, &values);

        assert_eq!(cursor.key(), Some(3));
        assert_eq!(cursor.value(), 30.0);
        assert_eq!(cursor.advance(), 3);
        assert_eq!(cursor.key(), Some(7));
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_terminated());
        assert_eq!(cursor.key(), None);
        assert_eq!(cursor.advance(), TERMINATED);
    }

    #[test]
    fn test_active_cursor_seek() {
        let domain = domain_with(&[1, 5, 10, 20, 30], &[1, 10, 30]);
        let values = [0.0; 5];
        let mut cursor = ActiveCursor::new(&domain, &values);

        assert_eq!(cursor.seek(1), 0);
        assert_eq!(cursor.seek(4), 2);
        // Seeking backwards is a no-op
        assert_eq!(cursor.seek(2), 2);
        assert_eq!(cursor.seek(21), 4);
        assert_eq!(cursor.seek(31), TERMINATED);
        assert_eq!(cursor.size_hint(), 0);
    }

    #[test]
    fn test_active_cursor_empty() {
        let domain = domain_with(&[1, 2], &[]);
        let values = [0.0; 2];
        let cursor = ActiveCursor::new(&domain, &values);
        assert!(cursor.is_terminated());
        assert_eq!(cursor.size_hint(), 0);
    }

    #[test]
    fn test_size_hint_counts_down() {
        let domain = domain_with(&[1, 2, 3], &[1, 2, 3]);
        let values = [0.0; 3];
        let mut cursor = ActiveCursor::new(&domain, &values);
        assert_eq!(cursor.size_hint(), 3);
        cursor.advance();
        assert_eq!(cursor.size_hint(), 2);
    }
}
