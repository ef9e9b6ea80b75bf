//! Error handling for the ATS analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Text processing error: {0}")]
    TextProcessing(String),

    #[error("Benchmark error: {0}")]
    Benchmark(String),

    #[error("Score history error: {0}")]
    History(String),

    #[error("Batch execution error: {0}")]
    Batch(String),
}

pub type Result<T> = std::result::Result<T, AtsError>;
