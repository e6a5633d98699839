mod bitset;
mod key_domain;

pub use bitset::{BitSet, Ones};
pub use key_domain::{KeyDomain, KeyWidth};
