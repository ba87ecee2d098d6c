use qc_sampler::data::row_of;
use qc_sampler::types::Row;
use qc_sampler::{SamplingConfig, StratifiedSampler, Table};

fn build_population() -> Result<Table, qc_sampler::SamplerError> {
    let mut rows: Vec<Row> = Vec::new();
    for (category, sessions) in [("billing", 12), ("complaint", 30), ("shipping", 3)] {
        for session in 0..sessions {
            for turn in 0..3 {
                rows.push(row_of([
                    category.to_string(),
                    format!("{category}-{session:03}"),
                    format!("turn {turn} of {category} session {session}"),
                ]));
            }
        }
    }
    Table::with_rows(["Kip - UID MainCategory", "session_id", "message"], rows)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let population = build_population()?;
    let sampler = StratifiedSampler::new(SamplingConfig {
        min_sessions: 2,
        ..SamplingConfig::default()
    })?;

    let result = sampler.sample(&population)?;
    println!(
        "Sampled {} of {} rows (proportion {:.2})",
        result.sampled.len(),
        population.len(),
        result.effective.proportion
    );
    for entry in &result.summary {
        println!(
            "  {:<10} population={:>3} target={:>3} actual={:>3}",
            entry.category, entry.population, entry.target, entry.actual
        );
    }

    let again = sampler.sample(&population)?;
    println!("Re-run identical: {}", again.sampled == result.sampled);
    Ok(())
}
