//! The handler capability: invoke with positional arguments, produce a
//! typed response or raw output.
//!
//! Handlers come in two styles. A handler may build and return a full
//! [`Response`] (status, headers, body, `complete` flag), or it may return
//! plain output and let the terminal dispatch layer wrap it into a default
//! 200 response. The [`HandlerOutcome`] variants model exactly those two
//! cases, so both styles share one trait object type.
use crate::{core::route::MatchedRoute, http::request::Request, http::response::Response};

/// Error type handlers may fail with; surfaced to the dispatch caller as a
/// request-level failure.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// What a handler produced.
#[derive(Debug)]
pub enum HandlerOutcome {
    /// An explicit, fully formed response.
    Response(Response),
    /// Raw output; the terminal dispatch layer writes it into the body of a
    /// default 200 response.
    Output(String),
}

impl HandlerOutcome {
    /// Shorthand for the raw-output style.
    pub fn output(text: impl Into<String>) -> Self {
        HandlerOutcome::Output(text.into())
    }
}

impl From<Response> for HandlerOutcome {
    fn from(response: Response) -> Self {
        HandlerOutcome::Response(response)
    }
}

/// One positional argument in a handler invocation.
///
/// The dispatch loop builds the list from the matched parameters in
/// pattern-declaration order; middleware layers may append synthetic
/// entries, and `pass_route` appends the matched route itself.
#[derive(Debug, Clone)]
pub enum Arg {
    /// A matched, URL-decoded named parameter.
    Value(String),
    /// A parameter declared in the pattern but absent from this match.
    Absent,
    /// A flag injected by a middleware layer.
    Flag(bool),
    /// The matched route, appended when `pass_route` is truthy.
    Route(MatchedRoute),
}

impl Arg {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Arg::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_route(&self) -> Option<&MatchedRoute> {
        match self {
            Arg::Route(matched) => Some(matched),
            _ => None,
        }
    }
}

/// A route callback.
pub trait Handler: Send + Sync {
    fn call(&self, request: &Request, args: &[Arg]) -> Result<HandlerOutcome, HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&Request, &[Arg]) -> Result<HandlerOutcome, HandlerError> + Send + Sync,
{
    fn call(&self, request: &Request, args: &[Arg]) -> Result<HandlerOutcome, HandlerError> {
        self(request, args)
    }
}

/// Identity helper that pins a closure to the handler signature, so plain
/// closures can be registered without type annotations.
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&Request, &[Arg]) -> Result<HandlerOutcome, HandlerError> + Send + Sync,
{
    f
}
