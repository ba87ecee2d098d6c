#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// CLI runner shared by the `qc-sampler` binary and downstream tools.
pub mod app;
/// Sampling configuration types.
pub mod config;
/// Centralized constants used across sizing, sampling, and the CLI.
pub mod constants;
/// In-memory table type.
pub mod data;
/// Stratified sampling engine.
pub mod engine;
mod hash;
/// Category distribution metrics.
pub mod metrics;
mod rng;
/// Row-unit sampling within one category.
pub mod rows;
/// Session-unit sampling within one category.
pub mod session;
/// Sample size and per-category target formulas.
pub mod sizing;
/// Table transports (CSV today).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{ConfidenceLevel, SampleSizing, SamplingConfig, SamplingUnit};
pub use data::Table;
pub use engine::{
    CategorySummary, SampleResult, StratifiedSampler, resolve_effective_proportion, run,
};
pub use errors::SamplerError;
pub use metrics::{CategoryShare, DistributionSkew, category_distribution, distribution_skew};
pub use rows::sample_rows;
pub use session::sample_sessions;
pub use sizing::{
    EffectiveProportion, compute_sample_size, compute_sample_size_with_proportion, target_count,
};
