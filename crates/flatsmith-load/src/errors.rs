use thiserror::Error;

/// Errors emitted by the load pipeline.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("source file not found: {0}")]
    MissingSource(String),
    #[error("invalid load config: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
