use qc_sampler::constants::defaults::DEFAULT_MARGIN_OF_ERROR;
use qc_sampler::data::row_of;
use qc_sampler::types::Row;
use qc_sampler::{
    ConfidenceLevel, SampleSizing, SamplingConfig, StratifiedSampler, Table, compute_sample_size,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for population in [50, 1_000, 100_000] {
        for confidence in [
            ConfidenceLevel::Ninety,
            ConfidenceLevel::NinetyFive,
            ConfidenceLevel::NinetyNine,
        ] {
            println!(
                "N={population:>6} confidence={}% moe={DEFAULT_MARGIN_OF_ERROR} -> n={}",
                confidence.percent(),
                compute_sample_size(population, DEFAULT_MARGIN_OF_ERROR, confidence.z_score())
            );
        }
    }

    let mut rows: Vec<Row> = Vec::new();
    for session in 0..1_000 {
        let category = if session % 5 < 3 { "A" } else { "B" };
        rows.push(row_of([category.to_string(), format!("s{session}")]));
    }
    let population = Table::with_rows(["category", "session_id"], rows)?;

    let sampler = StratifiedSampler::new(SamplingConfig {
        category_column: "category".to_string(),
        sizing: SampleSizing::MarginOfError {
            margin_of_error: DEFAULT_MARGIN_OF_ERROR,
            confidence: ConfidenceLevel::NinetyFive,
        },
        ..SamplingConfig::default()
    })?;
    let result = sampler.sample(&population)?;
    println!(
        "required {:?} of {} sessions, effective proportion {:.4}",
        result.effective.required_size,
        result.effective.base_population,
        result.effective.proportion
    );
    let summary = result.summary_table();
    println!("{}", summary.columns().join(","));
    for row in summary.rows() {
        let cells: Vec<&str> = row.iter().map(|cell| cell.as_deref().unwrap_or("")).collect();
        println!("{}", cells.join(","));
    }
    Ok(())
}
