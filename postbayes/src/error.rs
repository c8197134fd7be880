use std::path::PathBuf;

/// Errors raised while reading a corpus, training, or querying a model.
///
/// Every variant is terminal for the operation that produced it.
#[derive(Debug, thiserror::Error)]
pub enum BayesError {
    #[error("error opening file: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed input: record {record} is missing field `{field}`")]
    MalformedInput { record: u64, field: String },

    #[error("label not found in training data: {label}")]
    UnknownLabel { label: String },

    #[error("degenerate ratio: {denominator} is zero")]
    DivisionDegenerate { denominator: String },

    #[error("no model: prediction requires at least one trained label")]
    NoModel,

    #[error("unreadable record: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, BayesError>;
