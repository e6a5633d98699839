//! Vector transforms: reversible normalization and entry truncation

mod config;
mod normalize;
mod truncate;

pub use config::{NormalizerConfig, TruncatorConfig};
pub use normalize::{
    AffineTransformation, IdentityNormalizer, IdentityTransformation, MeanCenteringNormalizer,
    MeanVarianceNormalizer, UnitVectorNormalizer, VectorNormalizer, VectorTransformation,
};
pub use truncate::{
    Comparison, NoOpTruncator, ThresholdTruncator, TopNTruncator, VectorTruncator,
};
