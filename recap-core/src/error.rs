//! Error types for recap-core

use thiserror::Error;

/// Main error type for the recap-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error outside the stats codec (e.g. loading record files)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stats payload could not be decoded or failed validation
    #[error("failed to parse {target}: {cause}")]
    Parse {
        target: &'static str,
        #[source]
        cause: ParseCause,
    },

    /// Invalid parameter passed to a calculator (e.g. a zero limit)
    #[error("invalid parameter: {0}")]
    Configuration(String),

    /// Configuration file error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Why a stats payload was rejected.
#[derive(Error, Debug)]
pub enum ParseCause {
    /// The text is not valid JSON
    #[error("syntax error: {0}")]
    Syntax(#[source] serde_json::Error),

    /// Valid JSON that does not match the expected shape
    #[error("shape error: {0}")]
    Shape(#[source] serde_json::Error),

    /// Top-level value is not a JSON object
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// Object carries neither `userId` nor `totalUsers`
    #[error("object has neither a `userId` nor a `totalUsers` field")]
    MissingDiscriminant,

    /// Well-shaped payload that violates a value invariant
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    /// Build a parse error for `target`.
    pub fn parse(target: &'static str, cause: ParseCause) -> Self {
        Error::Parse { target, cause }
    }

    /// Build a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// True if this is a stats-payload parse failure.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }

    /// True if this is an invalid calculator parameter.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Result type alias for recap-core
pub type Result<T> = std::result::Result<T, Error>;
