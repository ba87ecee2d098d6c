use rand::seq::SliceRandom;
use tracing::debug;

use crate::data::Table;
use crate::rng::DeterministicRng;
use crate::session::UnitDraw;
use crate::sizing::target_count;

/// Draw individual rows from a single category's table.
///
/// `target_count(len, proportion, min_rows)` rows are drawn without
/// replacement with a generator seeded by `seed`; the returned rows keep their
/// original relative order.
pub fn sample_rows(category_rows: &Table, proportion: f64, min_rows: usize, seed: u64) -> Table {
    let row_indices: Vec<usize> = (0..category_rows.len()).collect();
    let mut rng = DeterministicRng::new(seed);
    let draw = draw_rows(&row_indices, proportion, min_rows, &mut rng);
    debug!(
        population = draw.population,
        target = draw.target,
        "sampled rows"
    );
    category_rows.select(&draw.rows)
}

/// Row draw over `row_indices`.
pub(crate) fn draw_rows(
    row_indices: &[usize],
    proportion: f64,
    min_rows: usize,
    rng: &mut DeterministicRng,
) -> UnitDraw {
    let total = row_indices.len();
    let target = target_count(total, proportion, min_rows);
    if target == 0 {
        return UnitDraw {
            population: total,
            ..UnitDraw::default()
        };
    }
    let mut positions = row_indices.to_vec();
    let (picked, _) = positions.partial_shuffle(rng, target);
    let mut rows = picked.to_vec();
    rows.sort_unstable();
    UnitDraw {
        rows,
        population: total,
        target,
        selected: target,
    }
}
