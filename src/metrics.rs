use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::data::{Table, cell_value};
use crate::errors::SamplerError;
use crate::types::CategoryKey;

/// Row count and share of one category within a table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    /// Category key.
    pub category: CategoryKey,
    /// Rows carrying this key.
    pub count: usize,
    /// `count` divided by the categorized row total.
    pub share: f64,
}

/// Aggregate balance metrics across categories.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistributionSkew {
    /// Rows across all categories.
    pub total: usize,
    /// Number of categories.
    pub categories: usize,
    /// Smallest category count.
    pub min: usize,
    /// Largest category count.
    pub max: usize,
    /// Mean count per category.
    pub mean: f64,
    /// `max / min`.
    pub ratio: f64,
}

/// Row counts per category in `table`, largest first (ties by key).
/// Rows with a null category are not counted.
pub fn category_distribution(
    table: &Table,
    category_column: &str,
) -> Result<Vec<CategoryShare>, SamplerError> {
    let category_idx = table.require_columns(&[category_column])?[0];
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in table.rows() {
        if let Some(category) = cell_value(row, category_idx) {
            *counts.entry(category).or_insert(0) += 1;
        }
    }
    let total: usize = counts.values().sum();
    let mut shares: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            category: category.to_string(),
            count,
            share: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            },
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    Ok(shares)
}

/// Skew of a distribution; `None` when there are no categories.
pub fn distribution_skew(shares: &[CategoryShare]) -> Option<DistributionSkew> {
    let min = shares.iter().map(|entry| entry.count).min()?;
    let max = shares.iter().map(|entry| entry.count).max()?;
    let total: usize = shares.iter().map(|entry| entry.count).sum();
    let categories = shares.len();
    Some(DistributionSkew {
        total,
        categories,
        min,
        max,
        mean: total as f64 / categories as f64,
        ratio: if min == 0 {
            f64::INFINITY
        } else {
            max as f64 / min as f64
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::row_of;

    fn table(categories: &[&str]) -> Table {
        Table::with_rows(
            ["kategori"],
            categories.iter().map(|category| row_of([*category])),
        )
        .unwrap()
    }

    #[test]
    fn distribution_is_sorted_by_count_then_key() {
        let shares =
            category_distribution(&table(&["b", "a", "c", "a", "b", "a"]), "kategori").unwrap();
        let order: Vec<(&str, usize)> = shares
            .iter()
            .map(|entry| (entry.category.as_str(), entry.count))
            .collect();
        assert_eq!(order, [("a", 3), ("b", 2), ("c", 1)]);
        assert!((shares[0].share - 0.5).abs() < 1e-9);
    }

    #[test]
    fn distribution_skips_nulls_and_checks_column() {
        let mut data = table(&["a"]);
        data.push_row(vec![None]).unwrap();
        let shares = category_distribution(&data, "kategori").unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].count, 1);

        assert!(matches!(
            category_distribution(&data, "missing"),
            Err(SamplerError::MissingColumn(_))
        ));
    }

    #[test]
    fn skew_reports_balance_and_imbalance() {
        let balanced = category_distribution(&table(&["a", "b"]), "kategori").unwrap();
        let skew = distribution_skew(&balanced).unwrap();
        assert_eq!(
            (skew.total, skew.categories, skew.min, skew.max),
            (2, 2, 1, 1)
        );
        assert!((skew.ratio - 1.0).abs() < 1e-9);

        let uneven =
            category_distribution(&table(&["a", "a", "a", "a", "b", "b"]), "kategori").unwrap();
        let skew = distribution_skew(&uneven).unwrap();
        assert!((skew.ratio - 2.0).abs() < 1e-9);
        assert!((skew.mean - 3.0).abs() < 1e-9);

        assert!(distribution_skew(&[]).is_none());
    }
}
