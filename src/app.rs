use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum, error::ErrorKind};
use serde::Serialize;

use crate::config::{ConfidenceLevel, SampleSizing, SamplingConfig, SamplingUnit};
use crate::constants::app::{OUTPUT_FILE_EXTENSION, OUTPUT_FILE_PREFIX, PREVIEW_ROWS};
use crate::constants::defaults::{
    DEFAULT_CATEGORY_COLUMN, DEFAULT_MIN_SESSIONS, DEFAULT_PROPORTION, DEFAULT_SEED,
    DEFAULT_SESSION_COLUMN,
};
use crate::data::Table;
use crate::engine::{CategorySummary, SampleResult, StratifiedSampler};
use crate::metrics::{CategoryShare, distribution_skew};
use crate::sizing::EffectiveProportion;
use crate::transport::csv::{read_table_from_path, write_table_to_path};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConfidenceArg {
    #[value(name = "90")]
    Ninety,
    #[value(name = "95")]
    NinetyFive,
    #[value(name = "99")]
    NinetyNine,
}

impl From<ConfidenceArg> for ConfidenceLevel {
    fn from(value: ConfidenceArg) -> Self {
        match value {
            ConfidenceArg::Ninety => ConfidenceLevel::Ninety,
            ConfidenceArg::NinetyFive => ConfidenceLevel::NinetyFive,
            ConfidenceArg::NinetyNine => ConfidenceLevel::NinetyNine,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitArg {
    Sessions,
    Rows,
}

impl From<UnitArg> for SamplingUnit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::Sessions => SamplingUnit::Sessions,
            UnitArg::Rows => SamplingUnit::Rows,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "qc-sampler",
    version,
    disable_help_subcommand = true,
    about = "Stratified, session-aware QC sampling",
    long_about = "Draw a reproducible sample of whole sessions from every category of a CSV population, sized by a manual proportion or by a margin-of-error target.",
    after_help = "Sizing defaults to --proportion 0.1. Pass --margin-of-error (and optionally --confidence) to derive the proportion from a finite-population sample size instead."
)]
/// CLI for `qc-sampler`.
///
/// Common usage:
/// - Manual proportion: `--input population.csv --proportion 0.2`
/// - Statistical sizing: `--input population.csv --margin-of-error 0.05 --confidence 95`
/// - Keep the summary: `--summary-output summary.csv`
struct SamplerCli {
    #[arg(long, value_name = "PATH", help = "Population CSV file with a header row")]
    input: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        help = "Where to write sampled rows (defaults to sample_stratified_min_<N>.csv beside the input)"
    )]
    output: Option<PathBuf>,
    #[arg(
        long = "summary-output",
        value_name = "PATH",
        help = "Optional CSV path for the per-category summary"
    )]
    summary_output: Option<PathBuf>,
    #[arg(
        long = "report-json",
        value_name = "PATH",
        help = "Optional JSON run report (configuration, sizing, summary, distribution)"
    )]
    report_json: Option<PathBuf>,
    #[arg(
        long = "category-column",
        value_name = "NAME",
        default_value = DEFAULT_CATEGORY_COLUMN,
        help = "Column used for stratification"
    )]
    category_column: String,
    #[arg(
        long = "session-column",
        value_name = "NAME",
        default_value = DEFAULT_SESSION_COLUMN,
        help = "Column holding the session identifier"
    )]
    session_column: String,
    #[arg(
        long,
        value_parser = parse_proportion,
        conflicts_with = "margin_of_error",
        help = "Manual proportion per category, in (0, 1] [default: 0.1]"
    )]
    proportion: Option<f64>,
    #[arg(
        long = "margin-of-error",
        value_parser = parse_margin_of_error,
        help = "Margin of error in (0, 1); derives the proportion from the sample-size formula"
    )]
    margin_of_error: Option<f64>,
    #[arg(
        long,
        value_enum,
        requires = "margin_of_error",
        help = "Confidence level for --margin-of-error [default: 95]"
    )]
    confidence: Option<ConfidenceArg>,
    #[arg(
        long = "min-sessions",
        default_value_t = DEFAULT_MIN_SESSIONS,
        value_parser = parse_positive_usize,
        help = "Minimum sessions (or rows) drawn per category"
    )]
    min_sessions: usize,
    #[arg(long, default_value_t = DEFAULT_SEED, help = "Deterministic seed")]
    seed: u64,
    #[arg(long, value_enum, default_value = "sessions", help = "Unit drawn per category")]
    unit: UnitArg,
}

impl SamplerCli {
    fn sampling_config(&self) -> SamplingConfig {
        let sizing = match self.margin_of_error {
            Some(margin_of_error) => SampleSizing::MarginOfError {
                margin_of_error,
                confidence: self
                    .confidence
                    .map(Into::into)
                    .unwrap_or(ConfidenceLevel::NinetyFive),
            },
            None => SampleSizing::Proportion(self.proportion.unwrap_or(DEFAULT_PROPORTION)),
        };
        SamplingConfig {
            category_column: self.category_column.clone(),
            session_column: self.session_column.clone(),
            sizing,
            min_sessions: self.min_sessions,
            seed: self.seed,
            unit: self.unit.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    generated_at: DateTime<Utc>,
    input: &'a Path,
    output: &'a Path,
    config: &'a SamplingConfig,
    input_rows: usize,
    sampled_rows: usize,
    effective: &'a EffectiveProportion,
    summary: &'a [CategorySummary],
    distribution: &'a [CategoryShare],
}

/// Run the sampler CLI over `args_iter` (program name excluded).
///
/// Reads the population CSV, samples it, prints the sizing line, the
/// distribution and the per-category summary, and writes the sampled rows.
pub fn run_sampler<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<SamplerCli, _>(std::iter::once("qc-sampler".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let config = cli.sampling_config();
    let sampler = StratifiedSampler::new(config.clone())?;

    println!("Reading population from {}", cli.input.display());
    let population = read_table_from_path(&cli.input)?;
    print_preview("population preview", &population);

    let result = sampler.sample(&population)?;
    print_effective(&config, &result.effective);

    let distribution = result.distribution(&config.category_column)?;
    print_distribution(&distribution);
    print_summary(&result);
    print_preview("sample preview", &result.sampled);

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input, config.min_sessions));
    write_table_to_path(&output, &result.sampled)?;
    println!(
        "Wrote {} sampled rows to {}",
        result.sampled.len(),
        output.display()
    );

    if let Some(path) = &cli.summary_output {
        write_table_to_path(path, &result.summary_table())?;
        println!("Wrote category summary to {}", path.display());
    }

    if let Some(path) = &cli.report_json {
        let report = RunReport {
            generated_at: Utc::now(),
            input: &cli.input,
            output: &output,
            config: &config,
            input_rows: population.len(),
            sampled_rows: result.sampled.len(),
            effective: &result.effective,
            summary: &result.summary,
            distribution: &distribution,
        };
        fs::write(path, serde_json::to_vec_pretty(&report)?)?;
        println!("Wrote run report to {}", path.display());
    }

    Ok(())
}

fn default_output_path(input: &Path, min_sessions: usize) -> PathBuf {
    input.with_file_name(format!(
        "{OUTPUT_FILE_PREFIX}{min_sessions}.{OUTPUT_FILE_EXTENSION}"
    ))
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse --min-sessions value '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("--min-sessions must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_proportion(raw: &str) -> Result<f64, String> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid proportion '{}': must be a float", raw.trim()))?;
    if !(parsed > 0.0 && parsed <= 1.0) {
        return Err(format!("proportion must be in (0, 1], got {parsed}"));
    }
    Ok(parsed)
}

fn parse_margin_of_error(raw: &str) -> Result<f64, String> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid margin of error '{}': must be a float", raw.trim()))?;
    if !(parsed > 0.0 && parsed < 1.0) {
        return Err(format!("margin of error must be in (0, 1), got {parsed}"));
    }
    Ok(parsed)
}

fn print_effective(config: &SamplingConfig, effective: &EffectiveProportion) {
    let unit = config.unit.label();
    match (config.sizing, effective.required_size) {
        (SampleSizing::MarginOfError { confidence, .. }, Some(required)) => println!(
            "target sample size: {} of {} {} (proportion {:.2}%, {}% confidence)",
            required,
            effective.base_population,
            unit,
            effective.proportion * 100.0,
            confidence.percent()
        ),
        _ => println!(
            "manual proportion: {:.2}% of {} {}",
            effective.proportion * 100.0,
            effective.base_population,
            unit
        ),
    }
}

fn print_distribution(distribution: &[CategoryShare]) {
    println!("=== sample distribution per category ===");
    if distribution.is_empty() {
        println!("(no rows sampled)");
        return;
    }
    for entry in distribution {
        println!(
            "{}: count={} share={:.2}",
            entry.category, entry.count, entry.share
        );
    }
    if let Some(skew) = distribution_skew(distribution) {
        println!(
            "skew: categories={} total={} min={} max={} mean={:.2} ratio={:.2}",
            skew.categories, skew.total, skew.min, skew.max, skew.mean, skew.ratio
        );
    }
}

fn print_summary(result: &SampleResult) {
    let unit = result.unit.label();
    println!("=== summary per category (unit: {unit}) ===");
    let width = result
        .summary
        .iter()
        .map(|entry| entry.category.chars().count())
        .max()
        .unwrap_or(0)
        .max("category".len());
    println!(
        "{:<width$}  {:>10}  {:>10}  {:>10}",
        "category", "population", "target", "actual"
    );
    for entry in &result.summary {
        println!(
            "{:<width$}  {:>10}  {:>10}  {:>10}",
            entry.category, entry.population, entry.target, entry.actual
        );
    }
}

fn print_preview(title: &str, table: &Table) {
    println!("=== {title} ({} rows) ===", table.len());
    println!("{}", table.columns().join(" | "));
    for row in table.rows().iter().take(PREVIEW_ROWS) {
        let cells: Vec<&str> = row
            .iter()
            .map(|cell| cell.as_deref().unwrap_or(""))
            .collect();
        println!("{}", cells.join(" | "));
    }
}
