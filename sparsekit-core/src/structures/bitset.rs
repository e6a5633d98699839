//! Fixed-length bit set used as the active mask of a key domain
//!
//! Bits are packed into `u64` words. The number of set bits is cached so
//! that `count()` is O(1); every mutation keeps the cache in sync.

/// Fixed-length bit set with a cached population count
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
    count: usize,
}

#[inline]
fn words_for(len: usize) -> usize {
    len.div_ceil(64)
}

impl BitSet {
    /// Create a bit set of `len` bits, all clear
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0u64; words_for(len)],
            len,
            count: 0,
        }
    }

    /// Create a bit set of `len` bits, all set
    pub fn full(len: usize) -> Self {
        let mut bits = Self {
            words: vec![u64::MAX; words_for(len)],
            len,
            count: len,
        };
        bits.clear_tail();
        bits
    }

    /// Number of bits (set or not)
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of set bits
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn contains(&self, bit: usize) -> bool {
        debug_assert!(bit < self.len, "bit {} out of range {}", bit, self.len);
        (self.words[bit / 64] >> (bit % 64)) & 1 == 1
    }

    /// Set or clear a bit. Returns the previous state.
    #[inline]
    pub fn put(&mut self, bit: usize, value: bool) -> bool {
        assert!(bit < self.len, "bit {} out of range {}", bit, self.len);
        let word = &mut self.words[bit / 64];
        let mask = 1u64 << (bit % 64);
        let old = *word & mask != 0;
        if value && !old {
            *word |= mask;
            self.count += 1;
        } else if !value && old {
            *word &= !mask;
            self.count -= 1;
        }
        old
    }

    #[inline]
    pub fn insert(&mut self, bit: usize) -> bool {
        !self.put(bit, true)
    }

    #[inline]
    pub fn remove(&mut self, bit: usize) -> bool {
        self.put(bit, false)
    }

    /// Set or clear every bit
    pub fn fill(&mut self, value: bool) {
        let word = if value { u64::MAX } else { 0 };
        self.words.iter_mut().for_each(|w| *w = word);
        self.clear_tail();
        self.count = if value { self.len } else { 0 };
    }

    /// Flip every bit
    pub fn invert(&mut self) {
        for w in &mut self.words {
            *w = !*w;
        }
        self.clear_tail();
        self.count = self.len - self.count;
    }

    /// In-place intersection with another set of the same length
    pub fn intersect_with(&mut self, other: &BitSet) {
        assert_eq!(self.len, other.len, "bit set length mismatch");
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a &= *b;
        }
        self.recount();
    }

    /// First set bit at or after `from`
    pub fn next_set(&self, from: usize) -> Option<usize> {
        if from >= self.len {
            return None;
        }
        let mut word_idx = from / 64;
        let mut word = self.words[word_idx] & (u64::MAX << (from % 64));
        loop {
            if word != 0 {
                let bit = word_idx * 64 + word.trailing_zeros() as usize;
                return (bit < self.len).then_some(bit);
            }
            word_idx += 1;
            if word_idx >= self.words.len() {
                return None;
            }
            word = self.words[word_idx];
        }
    }

    /// First clear bit at or after `from`
    pub fn next_clear(&self, from: usize) -> Option<usize> {
        if from >= self.len {
            return None;
        }
        let mut word_idx = from / 64;
        let mut word = !self.words[word_idx] & (u64::MAX << (from % 64));
        loop {
            if word != 0 {
                let bit = word_idx * 64 + word.trailing_zeros() as usize;
                return (bit < self.len).then_some(bit);
            }
            word_idx += 1;
            if word_idx >= self.words.len() {
                return None;
            }
            word = !self.words[word_idx];
        }
    }

    /// Iterate set bits in ascending order
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            bits: self,
            next: 0,
        }
    }

    fn clear_tail(&mut self) {
        let tail = self.len % 64;
        if tail != 0
            && let Some(last) = self.words.last_mut()
        {
            *last &= (1u64 << tail) - 1;
        }
    }

    fn recount(&mut self) {
        self.count = self.words.iter().map(|w| w.count_ones() as usize).sum();
    }
}

/// Iterator over set bits
pub struct Ones<'a> {
    bits: &'a BitSet,
    next: usize,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        let bit = self.bits.next_set(self.next)?;
        self.next = bit + 1;
        Some(bit)
    }
}
