//! Serializable configuration for normalizers and truncators
//!
//! Both configs are internally tagged by `type`:
//!
//! ```json
//! {"type": "mean_variance", "damping": 5.0, "global_mean": 3.2}
//! {"type": "threshold", "cutoff": 0.5, "comparison": "at_least"}
//! ```

use serde::{Deserialize, Serialize};

use super::normalize::{
    IdentityNormalizer, MeanCenteringNormalizer, MeanVarianceNormalizer, UnitVectorNormalizer,
    VectorNormalizer,
};
use super::truncate::{
    Comparison, NoOpTruncator, ThresholdTruncator, TopNTruncator, VectorTruncator,
};
use crate::error::{Error, Result};

/// Which normalizer to build
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NormalizerConfig {
    #[default]
    Identity,
    MeanCentering,
    UnitVector {
        /// Reference norms at or below this are treated as zero
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
    MeanVariance {
        /// Pseudo-observations pulling the mean toward `global_mean`
        #[serde(default)]
        damping: f64,
        #[serde(default)]
        global_mean: f64,
    },
}

fn default_tolerance() -> f64 {
    UnitVectorNormalizer::DEFAULT_TOLERANCE
}

impl NormalizerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            NormalizerConfig::UnitVector { tolerance } if tolerance.is_nan() || tolerance < 0.0 => Err(
                Error::Config(format!("tolerance must be non-negative, got {}", tolerance)),
            ),
            NormalizerConfig::MeanVariance { damping, .. } if damping.is_nan() || damping < 0.0 => Err(
                Error::Config(format!("damping must be non-negative, got {}", damping)),
            ),
            NormalizerConfig::MeanVariance { global_mean, .. } if !global_mean.is_finite() => Err(
                Error::Config(format!("global_mean must be finite, got {}", global_mean)),
            ),
            _ => Ok(()),
        }
    }

    pub fn build(&self) -> Result<Box<dyn VectorNormalizer>> {
        self.validate()?;
        log::debug!("building normalizer from {:?}", self);
        Ok(match *self {
            NormalizerConfig::Identity => Box::new(IdentityNormalizer),
            NormalizerConfig::MeanCentering => Box::new(MeanCenteringNormalizer),
            NormalizerConfig::UnitVector { tolerance } => {
                Box::new(UnitVectorNormalizer::new(tolerance))
            }
            NormalizerConfig::MeanVariance {
                damping,
                global_mean,
            } => Box::new(MeanVarianceNormalizer::new(damping, global_mean)),
        })
    }
}

/// Which truncator to build
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TruncatorConfig {
    #[default]
    NoOp,
    TopN {
        n: usize,
    },
    Threshold {
        cutoff: f64,
        #[serde(default)]
        comparison: Comparison,
        /// Compare magnitudes instead of signed values
        #[serde(default)]
        absolute: bool,
    },
}

impl TruncatorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            TruncatorConfig::Threshold { cutoff, .. } if cutoff.is_nan() => {
                Err(Error::Config("threshold cutoff must not be NaN".to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn build(&self) -> Result<Box<dyn VectorTruncator>> {
        self.validate()?;
        log::debug!("building truncator from {:?}", self);
        Ok(match *self {
            TruncatorConfig::NoOp => Box::new(NoOpTruncator),
            TruncatorConfig::TopN { n } => Box::new(TopNTruncator::new(n)),
            TruncatorConfig::Threshold {
                cutoff,
                comparison,
                absolute,
            } => Box::new(ThresholdTruncator::with_comparison(cutoff, comparison).absolute(absolute)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::{SparseVector, VectorView};

    #[test]
    fn test_normalizer_from_json() {
        let config = NormalizerConfig::from_json(r#"{"type": "mean_variance", "damping": 2.0}"#)
            .unwrap();
        assert_eq!(
            config,
            NormalizerConfig::MeanVariance {
                damping: 2.0,
                global_mean: 0.0
            }
        );

        let config = NormalizerConfig::from_json(r#"{"type": "unit_vector"}"#).unwrap();
        assert_eq!(
            config,
            NormalizerConfig::UnitVector {
                tolerance: UnitVectorNormalizer::DEFAULT_TOLERANCE
            }
        );
    }

    #[test]
    fn test_normalizer_rejects_bad_values() {
        let err = NormalizerConfig::from_json(r#"{"type": "mean_variance", "damping": -1.0}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = NormalizerConfig::from_json(r#"{"type": "z_score"}"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_build_normalizer() {
        let normalizer = NormalizerConfig::MeanCentering.build().unwrap();
        let reference = SparseVector::wrap(vec![4, 5], vec![3.5, 2.5]).unwrap();
        let mut v = reference.copy();
        normalizer.normalize(&reference, &mut v);
        assert_eq!(v.get(4), 0.5);
        assert_eq!(v.get(5), -0.5);
    }

    #[test]
    fn test_truncator_from_json() {
        let config = TruncatorConfig::from_json(
            r#"{"type": "threshold", "cutoff": 2.0, "comparison": "at_least"}"#,
        )
        .unwrap();
        assert_eq!(
            config,
            TruncatorConfig::Threshold {
                cutoff: 2.0,
                comparison: Comparison::AtLeast,
                absolute: false
            }
        );
        assert_eq!(
            TruncatorConfig::from_json(r#"{"type": "top_n", "n": 3}"#).unwrap(),
            TruncatorConfig::TopN { n: 3 }
        );
        assert_eq!(
            TruncatorConfig::from_json(r#"{"type": "no_op"}"#).unwrap(),
            TruncatorConfig::default()
        );
    }

    #[test]
    fn test_build_truncator() {
        let v = SparseVector::wrap(vec![1, 2, 3, 4, 5], vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let top = TruncatorConfig::TopN { n: 3 }.build().unwrap();
        assert_eq!(top.truncate(&v).key_set(), vec![3, 4, 5]);

        let threshold = TruncatorConfig::Threshold {
            cutoff: 3.5,
            comparison: Comparison::Above,
            absolute: false,
        }
        .build()
        .unwrap();
        assert_eq!(threshold.truncate(&v).key_set(), vec![4, 5]);

        let four = SparseVector::wrap(vec![1, 2, 3, 4], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(
            threshold.truncate(&four).to_map(),
            std::collections::BTreeMap::from([(4, 4.0)])
        );
    }

    #[test]
    fn test_config_round_trip() {
        let config = TruncatorConfig::Threshold {
            cutoff: 0.25,
            comparison: Comparison::Below,
            absolute: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""type":"threshold""#));
        assert_eq!(TruncatorConfig::from_json(&json).unwrap(), config);
    }
}
