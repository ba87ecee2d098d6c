use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::{SampleSizing, SamplingConfig, SamplingUnit};
use crate::constants::summary::{
    COLUMN_ACTUAL_ROWS, COLUMN_ACTUAL_SESSIONS, COLUMN_CATEGORY, COLUMN_POPULATION_ROWS,
    COLUMN_POPULATION_SESSIONS, COLUMN_TARGET_ROWS, COLUMN_TARGET_SESSIONS,
};
use crate::data::{Table, cell_value, row_of};
use crate::errors::SamplerError;
use crate::metrics::{CategoryShare, category_distribution};
use crate::rng::DeterministicRng;
use crate::rows::draw_rows;
use crate::session::{UnitDraw, draw_sessions};
use crate::sizing::{EffectiveProportion, target_count};
use crate::types::CategoryKey;

/// Population, target, and achieved counts for one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category key.
    pub category: CategoryKey,
    /// Units available in the category.
    pub population: usize,
    /// Units requested by the sizing policy.
    pub target: usize,
    /// Distinct units present in the sampled output.
    pub actual: usize,
}

/// Complete outcome of one stratified run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    /// Selected rows, same schema as the input.
    pub sampled: Table,
    /// One entry per category, ascending by key.
    pub summary: Vec<CategorySummary>,
    /// Unit the counts in `summary` refer to.
    pub unit: SamplingUnit,
    /// Proportion that drove the per-category sizing.
    pub effective: EffectiveProportion,
}

impl SampleResult {
    /// Summary as a table with one row per category.
    pub fn summary_table(&self) -> Table {
        let [population, target, actual] = match self.unit {
            SamplingUnit::Sessions => [
                COLUMN_POPULATION_SESSIONS,
                COLUMN_TARGET_SESSIONS,
                COLUMN_ACTUAL_SESSIONS,
            ],
            SamplingUnit::Rows => [
                COLUMN_POPULATION_ROWS,
                COLUMN_TARGET_ROWS,
                COLUMN_ACTUAL_ROWS,
            ],
        };
        let columns = vec![
            COLUMN_CATEGORY.to_string(),
            population.to_string(),
            target.to_string(),
            actual.to_string(),
        ];
        let rows = self
            .summary
            .iter()
            .map(|entry| {
                row_of([
                    entry.category.clone(),
                    entry.population.to_string(),
                    entry.target.to_string(),
                    entry.actual.to_string(),
                ])
            })
            .collect();
        Table::from_parts(columns, rows)
    }

    /// Sampled row counts per category, largest first.
    pub fn distribution(&self, category_column: &str) -> Result<Vec<CategoryShare>, SamplerError> {
        category_distribution(&self.sampled, category_column)
    }
}

/// Stratified sampler bound to one validated configuration.
#[derive(Clone, Debug)]
pub struct StratifiedSampler {
    config: SamplingConfig,
}

impl StratifiedSampler {
    /// Validate `config` and build a sampler.
    pub fn new(config: SamplingConfig) -> Result<Self, SamplerError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Resolve the effective proportion for `dataset`, then sample every category.
    pub fn sample(&self, dataset: &Table) -> Result<SampleResult, SamplerError> {
        let columns = self.required_columns();
        let indices = dataset.require_columns(&columns)?;
        let effective = resolve_effective_proportion(dataset, &self.config)?;
        info!(
            unit = self.config.unit.label(),
            proportion = effective.proportion,
            base_population = effective.base_population,
            required_size = ?effective.required_size,
            "resolved effective proportion"
        );
        let category_idx = indices[0];
        let unit_idx = match self.config.unit {
            SamplingUnit::Sessions => Some(indices[1]),
            SamplingUnit::Rows => None,
        };
        sample_partitioned(
            dataset,
            category_idx,
            unit_idx,
            effective,
            self.config.min_sessions,
            self.config.seed,
        )
    }

    fn required_columns(&self) -> Vec<&str> {
        match self.config.unit {
            SamplingUnit::Sessions => vec![
                self.config.category_column.as_str(),
                self.config.session_column.as_str(),
            ],
            SamplingUnit::Rows => vec![self.config.category_column.as_str()],
        }
    }
}

/// Session-based stratified sampling with an already-resolved proportion.
///
/// Both columns are validated before anything is sampled; all missing names
/// are reported together. Each category draws from its own generator keyed by
/// `(seed, category key)`, so one category's selection never depends on which
/// other categories exist or the order they are visited in.
pub fn run(
    dataset: &Table,
    category_column: &str,
    session_column: &str,
    proportion: f64,
    min_sessions: usize,
    seed: u64,
) -> Result<SampleResult, SamplerError> {
    let indices = dataset.require_columns(&[category_column, session_column])?;
    if !(0.0..=1.0).contains(&proportion) {
        return Err(SamplerError::Configuration(format!(
            "proportion must be in [0, 1], got {proportion}"
        )));
    }
    if min_sessions == 0 {
        return Err(SamplerError::Configuration(
            "minimum sessions per category must be at least 1".to_string(),
        ));
    }
    let all_rows: Vec<usize> = (0..dataset.len()).collect();
    let effective =
        EffectiveProportion::manual(proportion, dataset.distinct_count(&all_rows, indices[1]));
    sample_partitioned(
        dataset,
        indices[0],
        Some(indices[1]),
        effective,
        min_sessions,
        seed,
    )
}

/// Proportion the engine should apply for `config` on `dataset`.
///
/// Manual mode passes the configured proportion through. Margin-of-error mode
/// sizes against the distinct non-null sessions of the whole dataset (or the
/// categorized rows when sampling rows) and divides the required sample size
/// by that base.
pub fn resolve_effective_proportion(
    dataset: &Table,
    config: &SamplingConfig,
) -> Result<EffectiveProportion, SamplerError> {
    let base_population = match config.unit {
        SamplingUnit::Sessions => {
            let session_idx = dataset.require_columns(&[config.session_column.as_str()])?[0];
            let all_rows: Vec<usize> = (0..dataset.len()).collect();
            dataset.distinct_count(&all_rows, session_idx)
        }
        SamplingUnit::Rows => {
            let category_idx = dataset.require_columns(&[config.category_column.as_str()])?[0];
            dataset
                .rows()
                .iter()
                .filter(|row| cell_value(row, category_idx).is_some())
                .count()
        }
    };
    Ok(match config.sizing {
        SampleSizing::Proportion(proportion) => {
            EffectiveProportion::manual(proportion, base_population)
        }
        SampleSizing::MarginOfError {
            margin_of_error,
            confidence,
        } => EffectiveProportion::from_margin_of_error(
            base_population,
            margin_of_error,
            confidence.z_score(),
        ),
    })
}

fn sample_partitioned(
    dataset: &Table,
    category_idx: usize,
    session_idx: Option<usize>,
    effective: EffectiveProportion,
    min_count: usize,
    seed: u64,
) -> Result<SampleResult, SamplerError> {
    let (categories, uncategorized) = partition_by_category(dataset, category_idx);
    if uncategorized > 0 {
        debug!(rows = uncategorized, "skipping rows without a category");
    }

    let mut selected_rows = Vec::new();
    let mut summary = Vec::with_capacity(categories.len());
    for (category, row_indices) in &categories {
        let mut rng = DeterministicRng::for_key(seed, category);
        let draw = match session_idx {
            Some(session_idx) => draw_sessions(
                dataset,
                row_indices,
                session_idx,
                effective.proportion,
                min_count,
                &mut rng,
            ),
            None => draw_rows(row_indices, effective.proportion, min_count, &mut rng),
        };
        let entry = summarize(
            dataset,
            category,
            &draw,
            session_idx,
            effective.proportion,
            min_count,
        )?;
        if entry.population == 0 {
            debug!(category = %category, "category has no eligible units");
        } else {
            debug!(
                category = %category,
                population = entry.population,
                target = entry.target,
                actual = entry.actual,
                rows = draw.rows.len(),
                "sampled category"
            );
        }
        selected_rows.extend_from_slice(&draw.rows);
        summary.push(entry);
    }

    let sampled = dataset.select(&selected_rows);
    info!(
        categories = summary.len(),
        input_rows = dataset.len(),
        sampled_rows = sampled.len(),
        "stratified sampling completed"
    );
    Ok(SampleResult {
        sampled,
        summary,
        unit: match session_idx {
            Some(_) => SamplingUnit::Sessions,
            None => SamplingUnit::Rows,
        },
        effective,
    })
}

/// Bucket row positions by category key, ascending by key.
///
/// Returns the buckets and the number of rows whose category cell is null.
fn partition_by_category(
    dataset: &Table,
    category_idx: usize,
) -> (IndexMap<CategoryKey, Vec<usize>>, usize) {
    let mut buckets: IndexMap<CategoryKey, Vec<usize>> = IndexMap::new();
    let mut uncategorized = 0usize;
    for (row_idx, row) in dataset.rows().iter().enumerate() {
        match cell_value(row, category_idx) {
            Some(key) => buckets.entry(key.to_string()).or_default().push(row_idx),
            None => uncategorized += 1,
        }
    }
    buckets.sort_keys();
    (buckets, uncategorized)
}

fn summarize(
    dataset: &Table,
    category: &str,
    draw: &UnitDraw,
    session_idx: Option<usize>,
    proportion: f64,
    min_count: usize,
) -> Result<CategorySummary, SamplerError> {
    let target = target_count(draw.population, proportion, min_count);
    let actual = match session_idx {
        Some(session_idx) => draw
            .rows
            .iter()
            .filter_map(|idx| dataset.value(*idx, session_idx))
            .collect::<HashSet<_>>()
            .len(),
        None => draw.rows.len(),
    };
    if target != draw.target || actual != draw.selected {
        return Err(SamplerError::Processing(format!(
            "category '{category}' drew {actual} of {target} requested units (draw reported {} of {})",
            draw.selected, draw.target
        )));
    }
    Ok(CategorySummary {
        category: category.to_string(),
        population: draw.population,
        target,
        actual,
    })
}
