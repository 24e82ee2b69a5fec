//! Error types for linebench operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for linebench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing benchmark data
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSONL line failed to parse in a strict context
    #[error("malformed JSON in {path} at line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A required record field was absent
    #[error("missing required field '{field}' on record {id}")]
    MissingField { field: &'static str, id: String },

    /// An annotation id does not follow the `<split>_<x>-<y>_...` convention
    #[error("unparseable annotation id '{id}': {reason}")]
    BadLineId { id: String, reason: String },

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
