//! Error type shared by the URL model and the request builder.
//!
//! # Design
//! One variant per failure kind. Every variant is raised synchronously by the
//! call that detects it. The response model never produces an error: lines it
//! cannot interpret are skipped and unknown status codes yield an empty reason
//! phrase.
//!
//! `Transport` carries the transport's own message verbatim. A timeout is not
//! a separate variant because the transport's message is the only signal
//! available and it is not reliable enough to classify.

use thiserror::Error;

/// Errors returned by `Url` and `HttpRequest` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The input has no scheme delimiter, no authority, no host, or an
    /// unparseable port.
    #[error("malformed url: {0}")]
    MalformedUrl(String),

    /// The scheme is not one of the supported schemes.
    #[error("scheme is not supported: {0}")]
    UnsupportedScheme(String),

    /// The scheme needs a capability this build does not have.
    #[error("missing capability: {0}")]
    MissingCapability(String),

    /// Only GET and POST are implemented.
    #[error("method not implemented: {0}")]
    UnsupportedMethod(String),

    /// A header name or value that would not fit on one header line.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// `send` was called before any URL was set.
    #[error("no valid url provided")]
    NoUrl,

    /// Unknown configuration key, bad configuration value, or a debug
    /// channel that could not be opened.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The transport failed or produced no data.
    #[error("transport failure: {0}")]
    Transport(String),
}
