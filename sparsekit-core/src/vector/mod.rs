//! Sparse vectors over key domains
//!
//! - [`SparseVector`]: immutable, cheaply cloneable, thread-safe
//! - [`MutableSparseVector`]: owned values, fixed key domain
//! - [`VectorView`]: read access shared by both
//! - [`Intersection`] / [`Union`]: linear two-vector traversal
//! - [`stats`]: similarity reducers built on the intersection

mod cursor;
mod entry;
mod intersection;
mod mutable;
mod ops;
mod sparse;
pub mod stats;
mod view;


pub use cursor::{ActiveCursor, KeyCursor, TERMINATED};
pub use entry::{EntryState, VectorEntry};
pub use intersection::{Intersection, PairedEntry, Union, UnionEntry};
pub use mutable::MutableSparseVector;
pub use sparse::SparseVector;
pub use view::{Entries, VectorView};
