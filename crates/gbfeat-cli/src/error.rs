//! Error types for the gbfeat CLI
//!
//! Messages are user-facing and say what to check next.

use gbfeat_common::GbfeatError;
use gbfeat_parser::ParseError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// Input has no feature table
    #[error("No feature table found in '{0}'. Expected a GenBank FEATURES section or EMBL FT lines.")]
    NoFeatureTable(String),

    /// A feature block failed to parse (only surfaced with --fail-fast)
    #[error("Feature {id} of record '{accession}' failed to parse: {source}")]
    Feature {
        accession: String,
        id: usize,
        #[source]
        source: ParseError,
    },

    /// A location expression given on the command line is invalid
    #[error("Invalid location: {0}")]
    Location(#[from] ParseError),

    /// Error from the shared gbfeat layer
    #[error(transparent)]
    Common(#[from] GbfeatError),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions.")]
    Io(#[from] std::io::Error),

    /// JSON output failed
    #[error("Failed to write JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn no_feature_table(path: impl Into<String>) -> Self {
        Self::NoFeatureTable(path.into())
    }

    pub fn feature(accession: impl Into<String>, id: usize, source: ParseError) -> Self {
        Self::Feature {
            accession: accession.into(),
            id,
            source,
        }
    }
}
