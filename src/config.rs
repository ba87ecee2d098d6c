use serde::{Deserialize, Serialize};

use crate::constants::defaults::{
    DEFAULT_CATEGORY_COLUMN, DEFAULT_MIN_SESSIONS, DEFAULT_PROPORTION, DEFAULT_SEED,
    DEFAULT_SESSION_COLUMN,
};
use crate::constants::sizing::{Z_SCORE_90, Z_SCORE_95, Z_SCORE_99};
use crate::errors::SamplerError;
use crate::types::ColumnName;

/// Confidence level used by the margin-of-error sizing mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    /// 90% confidence (z = 1.645).
    Ninety,
    /// 95% confidence (z = 1.96).
    #[default]
    NinetyFive,
    /// 99% confidence (z = 2.576).
    NinetyNine,
}

impl ConfidenceLevel {
    /// Fixed z-score for this level.
    pub fn z_score(self) -> f64 {
        match self {
            Self::Ninety => Z_SCORE_90,
            Self::NinetyFive => Z_SCORE_95,
            Self::NinetyNine => Z_SCORE_99,
        }
    }

    /// Level as a whole percentage (90, 95 or 99).
    pub fn percent(self) -> u8 {
        match self {
            Self::Ninety => 90,
            Self::NinetyFive => 95,
            Self::NinetyNine => 99,
        }
    }
}

/// How the per-category proportion is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SampleSizing {
    /// Fixed fraction of each category, in `(0, 1]`.
    Proportion(f64),
    /// Proportion derived from a finite-population sample size.
    MarginOfError {
        /// Half-width of the confidence interval, in `(0, 1)`.
        margin_of_error: f64,
        /// Confidence level mapped to a z-score.
        confidence: ConfidenceLevel,
    },
}

impl Default for SampleSizing {
    fn default() -> Self {
        Self::Proportion(DEFAULT_PROPORTION)
    }
}

/// Unit drawn inside each category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingUnit {
    /// Whole sessions; every row of a drawn session is kept.
    #[default]
    Sessions,
    /// Individual rows, ignoring session membership.
    Rows,
}

impl SamplingUnit {
    /// Lowercase plural label used in logs and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::Rows => "rows",
        }
    }
}

/// Top-level sampling configuration. Immutable for the duration of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Column holding the stratification key.
    pub category_column: ColumnName,
    /// Column holding the session identifier.
    pub session_column: ColumnName,
    /// Manual proportion or margin-of-error sizing.
    pub sizing: SampleSizing,
    /// Minimum number of units drawn per category (capped by the category size).
    pub min_sessions: usize,
    /// RNG seed that controls deterministic selection.
    pub seed: u64,
    /// Whether sessions or rows are drawn.
    pub unit: SamplingUnit,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
            session_column: DEFAULT_SESSION_COLUMN.to_string(),
            sizing: SampleSizing::default(),
            min_sessions: DEFAULT_MIN_SESSIONS,
            seed: DEFAULT_SEED,
            unit: SamplingUnit::default(),
        }
    }
}

impl SamplingConfig {
    /// Check parameter ranges before any data is touched.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if self.category_column.is_empty() {
            return Err(SamplerError::Configuration(
                "category column name must not be empty".to_string(),
            ));
        }
        if self.unit == SamplingUnit::Sessions && self.session_column.is_empty() {
            return Err(SamplerError::Configuration(
                "session column name must not be empty".to_string(),
            ));
        }
        if self.min_sessions == 0 {
            return Err(SamplerError::Configuration(
                "minimum per category must be at least 1".to_string(),
            ));
        }
        match self.sizing {
            SampleSizing::Proportion(proportion) => {
                if !(proportion > 0.0 && proportion <= 1.0) {
                    return Err(SamplerError::Configuration(format!(
                        "proportion must be in (0, 1], got {proportion}"
                    )));
                }
            }
            SampleSizing::MarginOfError {
                margin_of_error, ..
            } => {
                if !(margin_of_error > 0.0 && margin_of_error < 1.0) {
                    return Err(SamplerError::Configuration(format!(
                        "margin of error must be in (0, 1), got {margin_of_error}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_scores_match_standard_levels() {
        assert_eq!(ConfidenceLevel::Ninety.z_score(), 1.645);
        assert_eq!(ConfidenceLevel::NinetyFive.z_score(), 1.96);
        assert_eq!(ConfidenceLevel::NinetyNine.z_score(), 2.576);
        assert_eq!(ConfidenceLevel::default().percent(), 95);
    }

    #[test]
    fn default_config_is_valid() {
        let config = SamplingConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.min_sessions, 5);
        assert_eq!(config.session_column, "session_id");
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        for proportion in [0.0, -0.1, 1.5, f64::NAN] {
            let config = SamplingConfig {
                sizing: SampleSizing::Proportion(proportion),
                ..SamplingConfig::default()
            };
            assert!(config.validate().is_err(), "proportion {proportion}");
        }
        let full = SamplingConfig {
            sizing: SampleSizing::Proportion(1.0),
            ..SamplingConfig::default()
        };
        full.validate().unwrap();

        for margin_of_error in [0.0, 1.0, f64::NAN] {
            let config = SamplingConfig {
                sizing: SampleSizing::MarginOfError {
                    margin_of_error,
                    confidence: ConfidenceLevel::NinetyFive,
                },
                ..SamplingConfig::default()
            };
            assert!(config.validate().is_err(), "moe {margin_of_error}");
        }

        let zero_min = SamplingConfig {
            min_sessions: 0,
            ..SamplingConfig::default()
        };
        assert!(zero_min.validate().is_err());
    }

    #[test]
    fn rows_unit_does_not_need_session_column() {
        let config = SamplingConfig {
            session_column: String::new(),
            unit: SamplingUnit::Rows,
            ..SamplingConfig::default()
        };
        config.validate().unwrap();
    }
}
