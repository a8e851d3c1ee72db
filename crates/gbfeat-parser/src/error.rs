//! Error types for feature table parsing

use thiserror::Error;

/// Result type alias for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Every way a single feature (or a bare location) can fail to parse.
///
/// Parsing is all-or-nothing: a failure never comes with a partially built
/// [`Feature`](crate::Feature).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The raw block was empty or has no feature key
    #[error("Malformed feature block: {0}")]
    MalformedBlock(String),

    /// A qualifier line cannot yield a name
    #[error("Malformed qualifier: {0}")]
    MalformedQualifier(String),

    /// The location expression does not match the location grammar
    ///
    /// `position` is a byte offset into the text handed to the location parser.
    #[error("Location syntax error at position {position}: {reason}")]
    LocationSyntax { position: usize, reason: String },
}

impl ParseError {
    pub fn malformed_block(msg: impl Into<String>) -> Self {
        Self::MalformedBlock(msg.into())
    }

    pub fn malformed_qualifier(msg: impl Into<String>) -> Self {
        Self::MalformedQualifier(msg.into())
    }

    pub fn location_syntax(position: usize, reason: impl Into<String>) -> Self {
        Self::LocationSyntax {
            position,
            reason: reason.into(),
        }
    }
}
