//! Domain error types for the routing core.
//!
//! Every condition here is recoverable and local to one request or one
//! registration call; nothing in this module is process-fatal. The demo
//! binary wraps these into `eyre::Report` at its boundary.
use thiserror::Error;

/// A route pattern whose custom parameter sub-expression failed to compile.
///
/// Compilation is lazy, so this surfaces on the first match attempt against
/// the offending pattern rather than at registration time.
#[derive(Debug, Error)]
#[error("invalid route pattern '{pattern}': {source}")]
pub struct PatternError {
    /// The original pattern string as registered.
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// Failures raised by [`crate::http::Response`] mutation.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The status code is not a recognized HTTP status. No default is
    /// substituted; the caller must pick a valid code.
    #[error("invalid status code {0}")]
    InvalidStatus(u16),
    /// The response was already emitted once; the `sent` flag is write-once.
    #[error("response has already been sent")]
    AlreadySent,
    #[error("failed to encode JSON body")]
    Json(#[from] serde_json::Error),
}

/// An HTTP method token that is not one of the supported verbs.
#[derive(Debug, Error)]
#[error("unsupported HTTP method '{0}'")]
pub struct MethodParseError(pub String);

/// Request-level failures produced by the dispatch loop.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// The middleware chain ran out of layers without any of them producing
    /// a response. Distinct from a 404: candidate routes may still remain,
    /// but the chain for the matched one yielded nothing.
    #[error("middleware chain exhausted without producing a response")]
    NoResponseProduced,
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
}
