//! Sparsekit - sparse vectors keyed by 64-bit ids
//!
//! Built for recommender workloads where every user or item profile is a
//! small, sparse map from ids to scores:
//! - Shared, immutable key domains with an active-key mask
//! - Compact (32-bit) key storage when every key fits
//! - Immutable, thread-shareable [`SparseVector`] and its editable
//!   counterpart [`MutableSparseVector`], with zero-copy freezing
//! - Index-aligned arithmetic between vectors over the same domain, with a
//!   sorted merge fallback for unrelated domains
//! - Seek-based cursors and intersection/union iterators
//! - Reversible normalizers and top-N / threshold truncators, configurable
//!   from JSON

pub mod error;
pub mod structures;
pub mod transform;
pub mod vector;

/// Key type used throughout the crate
pub type Key = i64;

pub use error::{Error, Result};

// Re-exports from structures
pub use structures::{BitSet, KeyDomain, KeyWidth};

// Re-exports from vector
pub use vector::{
    ActiveCursor, EntryState, Intersection, KeyCursor, MutableSparseVector, PairedEntry,
    SparseVector, TERMINATED, Union, UnionEntry, VectorEntry, VectorView,
};

// Re-exports from transform
pub use transform::{
    Comparison, MeanCenteringNormalizer, MeanVarianceNormalizer, NoOpTruncator,
    NormalizerConfig, ThresholdTruncator, TopNTruncator, TruncatorConfig, UnitVectorNormalizer,
    VectorNormalizer, VectorTransformation, VectorTruncator,
};
