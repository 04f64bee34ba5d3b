//! Error types for route configuration and token decoding

use thiserror::Error;

/// Errors raised while building a resolver from configuration
///
/// Resolution itself never fails; only malformed configuration does.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid override pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Why a segment that looks like a state token could not be decoded
///
/// These never reach callers: the offending token is dropped and logged.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("empty value")]
    EmptyValue,

    #[error("number out of range: {0}")]
    InvalidNumber(String),

    #[error("invalid percent-encoding")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),

    #[error("malformed JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
