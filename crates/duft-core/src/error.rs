use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Division by zero: maximum possible score must be positive, got {0}")]
    DivisionByZero(i64),

    #[error("Oil not found: {0}")]
    OilNotFound(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
