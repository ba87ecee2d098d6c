use std::io;

use thiserror::Error;

use crate::types::ColumnName;

/// Error type for sampling configuration, processing, and transport failures.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// One or more configured columns are absent from the dataset.
    #[error("column(s) not found in dataset: {}", .0.join(", "))]
    MissingColumn(Vec<ColumnName>),
    /// Grouping or sampling failed; no partial result is produced.
    #[error("sampling failed: {0}")]
    Processing(String),
    /// Sampling parameters or table shape are invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Filesystem failure while reading or writing a table.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// CSV decoding or encoding failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_message_lists_every_name() {
        let err = SamplerError::MissingColumn(vec!["category".into(), "session_id".into()]);
        assert_eq!(
            err.to_string(),
            "column(s) not found in dataset: category, session_id"
        );
    }
}
