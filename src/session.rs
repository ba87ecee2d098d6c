use rand::seq::SliceRandom;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::data::Table;
use crate::errors::SamplerError;
use crate::rng::DeterministicRng;
use crate::sizing::target_count;

/// Outcome of one category draw, expressed as row positions in the source table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct UnitDraw {
    /// Selected row positions, ascending.
    pub(crate) rows: Vec<usize>,
    /// Units available in the category.
    pub(crate) population: usize,
    /// Units requested by the sizing policy.
    pub(crate) target: usize,
    /// Units actually drawn.
    pub(crate) selected: usize,
}

/// Draw whole sessions from a single category's table.
///
/// Distinct non-null session ids are sorted, then `target_count(total,
/// proportion, min_sessions)` of them are drawn without replacement using a
/// generator seeded with `seed`. Every row of a drawn session is returned, in
/// the original row order. Rows without a session id are never returned.
///
/// Fails with [`SamplerError::MissingColumn`] when `session_column` is absent.
pub fn sample_sessions(
    category_rows: &Table,
    session_column: &str,
    proportion: f64,
    min_sessions: usize,
    seed: u64,
) -> Result<Table, SamplerError> {
    let session_idx = category_rows.require_columns(&[session_column])?[0];
    let row_indices: Vec<usize> = (0..category_rows.len()).collect();
    let mut rng = DeterministicRng::new(seed);
    let draw = draw_sessions(
        category_rows,
        &row_indices,
        session_idx,
        proportion,
        min_sessions,
        &mut rng,
    );
    debug!(
        population = draw.population,
        target = draw.target,
        rows = draw.rows.len(),
        "sampled sessions"
    );
    Ok(category_rows.select(&draw.rows))
}

/// Session draw over the rows at `row_indices` of `table`.
pub(crate) fn draw_sessions(
    table: &Table,
    row_indices: &[usize],
    session_idx: usize,
    proportion: f64,
    min_sessions: usize,
    rng: &mut DeterministicRng,
) -> UnitDraw {
    // Sorted so the draw does not depend on input row order.
    let mut sessions: Vec<&str> = row_indices
        .iter()
        .filter_map(|idx| table.value(*idx, session_idx))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let total = sessions.len();
    let target = target_count(total, proportion, min_sessions);
    if target == 0 {
        return UnitDraw {
            population: total,
            ..UnitDraw::default()
        };
    }

    let (picked, _) = sessions.partial_shuffle(rng, target);
    let picked: HashSet<&str> = picked.iter().copied().collect();
    let rows = row_indices
        .iter()
        .copied()
        .filter(|idx| {
            table
                .value(*idx, session_idx)
                .is_some_and(|session| picked.contains(session))
        })
        .collect();
    UnitDraw {
        rows,
        population: total,
        target,
        selected: picked.len(),
    }
}
