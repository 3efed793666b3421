use serde_json::Value;
use thiserror::Error;

/// Failure of a single site's analytics query. Soft: recorded in the report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("{0} must not be empty")]
    InvalidInput(&'static str),

    #[error("{0}")]
    Transport(String),

    #[error("Analytics query returned {} error(s)", .0.len())]
    Rejected(Vec<Value>),
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        QueryError::Transport(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0}")]
    Transport(String),

    #[error("status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Failure of the whole run. Hard: nothing durable was produced.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Serializing stats failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("GitHub commit failed: {0}")]
    Commit(#[source] StoreError),
}
