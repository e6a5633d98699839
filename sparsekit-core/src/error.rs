//! Error types for sparsekit

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Keys not strictly increasing at index {index}: {key} follows {previous}")]
    UnsortedKeys { index: usize, previous: i64, key: i64 },

    #[error("Value array too short: {values} values for {keys} keys")]
    ValuesTooShort { keys: usize, values: usize },

    #[error("Domain size {size} exceeds key capacity {capacity}")]
    DomainTooLarge { size: usize, capacity: usize },

    #[error("Key {0} does not fit in a compact (32-bit) domain")]
    KeyOutOfRange(i64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
