//! Sample-size policies shared by the session and row samplers.
//!
//! Two pure functions live here:
//! - [`compute_sample_size`] turns a margin-of-error target into a required
//!   sample size using the finite population correction.
//! - [`target_count`] turns a population count and a proportion into the
//!   number of units to draw, honoring a per-category minimum.

use serde::{Deserialize, Serialize};

use crate::constants::sizing::DEFAULT_ASSUMED_PROPORTION;

/// Required sample size for `population` at the given margin of error and z-score,
/// assuming a population proportion of 0.5.
///
/// See [`compute_sample_size_with_proportion`] for the formula.
pub fn compute_sample_size(population: usize, margin_of_error: f64, z_score: f64) -> usize {
    compute_sample_size_with_proportion(
        population,
        margin_of_error,
        z_score,
        DEFAULT_ASSUMED_PROPORTION,
    )
}

/// Finite-population sample size.
///
/// `n0 = z² · p · (1 − p) / moe²`, then `n = floor(N · n0 / (n0 + N − 1))`,
/// clamped to `[1, N]`. An empty population needs no sample and returns 0.
/// When `n0` is not finite (for example `moe == 0`) the whole population is
/// required.
pub fn compute_sample_size_with_proportion(
    population: usize,
    margin_of_error: f64,
    z_score: f64,
    assumed_proportion: f64,
) -> usize {
    if population == 0 {
        return 0;
    }
    let n0 = z_score.powi(2) * assumed_proportion * (1.0 - assumed_proportion)
        / margin_of_error.powi(2);
    if !n0.is_finite() {
        return population;
    }
    let big_n = population as f64;
    let corrected = (big_n * n0 / (n0 + big_n - 1.0)).floor();
    // Saturating cast: NaN and negatives land on 0 and are lifted by the clamp.
    (corrected as usize).clamp(1, population)
}

/// Number of units to draw from a population of `population_count`.
///
/// `max(floor(n · p), min_count)`, never more than `n`. An empty population
/// always yields 0, regardless of the minimum.
pub fn target_count(population_count: usize, proportion: f64, min_count: usize) -> usize {
    if population_count == 0 {
        return 0;
    }
    let proportional = (population_count as f64 * proportion).floor() as usize;
    proportional.max(min_count).min(population_count)
}

/// Proportion actually fed to the per-category sizing, plus how it was derived.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectiveProportion {
    /// Fraction applied inside every category.
    pub proportion: f64,
    /// Distinct units across the whole dataset (sessions or rows).
    pub base_population: usize,
    /// Sample size from the margin-of-error formula; `None` in manual mode.
    pub required_size: Option<usize>,
}

impl EffectiveProportion {
    /// Manually supplied proportion.
    pub fn manual(proportion: f64, base_population: usize) -> Self {
        Self {
            proportion,
            base_population,
            required_size: None,
        }
    }

    /// Proportion derived from a margin of error: `n_req / N_base`, or 0 when
    /// the dataset holds no units.
    pub fn from_margin_of_error(base_population: usize, margin_of_error: f64, z_score: f64) -> Self {
        let required = compute_sample_size(base_population, margin_of_error, z_score);
        let proportion = if base_population == 0 {
            0.0
        } else {
            required as f64 / base_population as f64
        };
        Self {
            proportion,
            base_population,
            required_size: Some(required),
        }
    }
}
