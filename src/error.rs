use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a query. Nothing here is retried.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("invalid date {input:?}: expected DD/MM/YYYY")]
    InvalidDateInput { input: String },

    #[error("no API token configured (pass --token or set ACESSO_TOKEN)")]
    MissingToken,

    #[error("the request exceeded the time limit")]
    RequestTimeout,

    #[error("HTTP failure: {0}")]
    NetworkFailure(String),

    #[error("response could not be read as JSON: {reason}")]
    MalformedResponse { reason: String, raw: String },

    #[error("could not read response file {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not save CSV to {path}: {source}")]
    ExportFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl QueryError {
    pub fn malformed(reason: impl Into<String>, raw: impl Into<String>) -> Self {
        QueryError::MalformedResponse {
            reason: reason.into(),
            raw: raw.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
