//! Linear-time intersection and union of two vectors' set keys.
//!
//! Both walk two [`KeyCursor`]s in lockstep. Every step produces a small
//! `Copy` pair, so traversal never allocates; the cursor-style API
//! (`current()` / `advance()`) additionally keeps the pair in a single slot
//! that is overwritten on each step.

use std::cmp::Ordering;

use super::cursor::{ActiveCursor, KeyCursor};
use super::view::VectorView;
use crate::Key;

/// A key set in both vectors, with both values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairedEntry {
    pub key: Key,
    pub left_index: usize,
    pub right_index: usize,
    pub left: f64,
    pub right: f64,
}

// ── Intersection ─────────────────────────────────────────────────────────

/// Keys set in both cursors, in ascending order.
pub struct Intersection<A: KeyCursor, B: KeyCursor> {
    a: A,
    b: B,
    current: Option<PairedEntry>,
}

impl<'a> Intersection<ActiveCursor<'a>, ActiveCursor<'a>> {
    /// Intersect the set entries of two vectors
    pub fn of<L, R>(left: &'a L, right: &'a R) -> Self
    where
        L: VectorView + ?Sized,
        R: VectorView + ?Sized,
    {
        Self::new(left.cursor(), right.cursor())
    }
}

impl<A: KeyCursor, B: KeyCursor> Intersection<A, B> {
    pub fn new(a: A, b: B) -> Self {
        let mut isect = Self {
            a,
            b,
            current: None,
        };
        isect.align();
        isect
    }

    /// Current pair, or `None` once either side is exhausted
    #[inline]
    pub fn current(&self) -> Option<&PairedEntry> {
        self.current.as_ref()
    }

    /// Move to the next common key
    pub fn advance(&mut self) -> Option<&PairedEntry> {
        if self.current.is_some() {
            self.a.advance();
            self.b.advance();
            self.align();
        }
        self.current.as_ref()
    }

    /// Upper bound on pairs left
    pub fn remaining_hint(&self) -> usize {
        self.a.size_hint().min(self.b.size_hint())
    }

    /// Move both cursors forward until they agree on a key
    fn align(&mut self) {
        self.current = loop {
            let (Some(ka), Some(kb)) = (self.a.key(), self.b.key()) else {
                break None;
            };
            match ka.cmp(&kb) {
                Ordering::Equal => {
                    break Some(PairedEntry {
                        key: ka,
                        left_index: self.a.index(),
                        right_index: self.b.index(),
                        left: self.a.value(),
                        right: self.b.value(),
                    });
                }
                Ordering::Less => {
                    self.a.seek(kb);
                }
                Ordering::Greater => {
                    self.b.seek(ka);
                }
            }
        };
    }
}

impl<A: KeyCursor, B: KeyCursor> Iterator for Intersection<A, B> {
    type Item = PairedEntry;

    fn next(&mut self) -> Option<PairedEntry> {
        let pair = self.current?;
        self.advance();
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.current {
            None => (0, Some(0)),
            Some(_) => (1, Some(self.remaining_hint().max(1))),
        }
    }
}

// ── Union ────────────────────────────────────────────────────────────────

/// A key set in at least one of two vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnionEntry {
    pub key: Key,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

/// Keys set in either cursor, in ascending order.
pub struct Union<A: KeyCursor, B: KeyCursor> {
    a: A,
    b: B,
}

impl<'a> Union<ActiveCursor<'a>, ActiveCursor<'a>> {
    /// Union of the set entries of two vectors
    pub fn of<L, R>(left: &'a L, right: &'a R) -> Self
    where
        L: VectorView + ?Sized,
        R: VectorView + ?Sized,
    {
        Self::new(left.cursor(), right.cursor())
    }
}

impl<A: KeyCursor, B: KeyCursor> Union<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: KeyCursor, B: KeyCursor> Iterator for Union<A, B> {
    type Item = UnionEntry;

    fn next(&mut self) -> Option<UnionEntry> {
        let entry = match (self.a.key(), self.b.key()) {
            (None, None) => return None,
            (Some(ka), None) => {
                let entry = UnionEntry {
                    key: ka,
                    left: Some(self.a.value()),
                    right: None,
                };
                self.a.advance();
                entry
            }
            (None, Some(kb)) => {
                let entry = UnionEntry {
                    key: kb,
                    left: None,
                    right: Some(self.b.value()),
                };
                self.b.advance();
                entry
            }
            (Some(ka), Some(kb)) => match ka.cmp(&kb) {
                Ordering::Less => {
                    let entry = UnionEntry {
                        key: ka,
                        left: Some(self.a.value()),
                        right: None,
                    };
                    self.a.advance();
                    entry
                }
                Ordering::Greater => {
                    let entry = UnionEntry {
                        key: kb,
                        left: None,
                        right: Some(self.b.value()),
                    };
                    self.b.advance();
                    entry
                }
                Ordering::Equal => {
                    let entry = UnionEntry {
                        key: ka,
                        left: Some(self.a.value()),
                        right: Some(self.b.value()),
                    };
                    self.a.advance();
                    self.b.advance();
                    entry
                }
            },
        };
        Some(entry)
    }
}
