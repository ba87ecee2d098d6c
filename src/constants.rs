/// Defaults applied when a sampling configuration leaves a value unset.
pub mod defaults {
    /// Default stratification column.
    pub const DEFAULT_CATEGORY_COLUMN: &str = "Kip - UID MainCategory";
    /// Default session identifier column.
    pub const DEFAULT_SESSION_COLUMN: &str = "session_id";
    /// Default manual proportion (10%).
    pub const DEFAULT_PROPORTION: f64 = 0.1;
    /// Default minimum number of sessions drawn per category.
    pub const DEFAULT_MIN_SESSIONS: usize = 5;
    /// Default margin of error for the statistical sizing mode.
    pub const DEFAULT_MARGIN_OF_ERROR: f64 = 0.05;
    /// Fixed RNG seed so repeated runs select the same sessions.
    pub const DEFAULT_SEED: u64 = 42;
}

/// Constants used by the sample-size formula.
pub mod sizing {
    /// Population proportion assumed when none is known (maximizes variance).
    pub const DEFAULT_ASSUMED_PROPORTION: f64 = 0.5;
    /// z-score for a 90% confidence level.
    pub const Z_SCORE_90: f64 = 1.645;
    /// z-score for a 95% confidence level.
    pub const Z_SCORE_95: f64 = 1.96;
    /// z-score for a 99% confidence level.
    pub const Z_SCORE_99: f64 = 2.576;
}

/// Constants used by stable hashing for per-category seed derivation.
pub mod hash {
    /// FNV-1a 64-bit offset basis.
    pub const FNV1A64_OFFSET: u64 = 0xcbf29ce484222325;
    /// FNV-1a 64-bit prime.
    pub const FNV1A64_PRIME: u64 = 0x100000001b3;
}

/// Column names of the per-category summary table.
pub mod summary {
    /// Category key column.
    pub const COLUMN_CATEGORY: &str = "category";
    /// Population count column when sampling sessions.
    pub const COLUMN_POPULATION_SESSIONS: &str = "population_session_count";
    /// Target count column when sampling sessions.
    pub const COLUMN_TARGET_SESSIONS: &str = "target_session_count";
    /// Actual count column when sampling sessions.
    pub const COLUMN_ACTUAL_SESSIONS: &str = "actual_session_count";
    /// Population count column when sampling rows.
    pub const COLUMN_POPULATION_ROWS: &str = "population_row_count";
    /// Target count column when sampling rows.
    pub const COLUMN_TARGET_ROWS: &str = "target_row_count";
    /// Actual count column when sampling rows.
    pub const COLUMN_ACTUAL_ROWS: &str = "actual_row_count";
}

/// Constants used by the command-line runner.
pub mod app {
    /// Output filename prefix; the minimum session count and `.csv` are appended.
    pub const OUTPUT_FILE_PREFIX: &str = "sample_stratified_min_";
    /// Extension of files written by the CSV transport.
    pub const OUTPUT_FILE_EXTENSION: &str = "csv";
    /// Number of preview rows printed after sampling.
    pub const PREVIEW_ROWS: usize = 5;
}
