//! Error types shared by the gbfeat front-ends

use thiserror::Error;

/// Result type alias for gbfeat operations outside the parsing core
pub type Result<T> = std::result::Result<T, GbfeatError>;

/// Main error type for gbfeat tooling
#[derive(Error, Debug)]
pub enum GbfeatError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GbfeatError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
