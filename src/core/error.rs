use std::time::Duration;
use thiserror::Error;

use crate::oracle::OracleError;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Rule base error: {0}")]
    RuleBase(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Verification run exceeded {0:?}")]
    Timeout(Duration),

    #[error("Verification worker failed: {0}")]
    Join(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VerifierError>;
