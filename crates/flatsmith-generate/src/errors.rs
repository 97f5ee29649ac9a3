use thiserror::Error;

/// Errors emitted by generation and the CSV helpers.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("unknown record kind: {0}")]
    UnknownKind(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
