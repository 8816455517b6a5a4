//! Switchyard - an HTTP request-routing and middleware-dispatch engine.
//!
//! Switchyard maps URL patterns to handlers and threads every request
//! through an onion of middleware layers before the matched handler runs.
//! The routing core is synchronous and transport-agnostic; a hyper-based
//! adapter puts it on the wire. This library exposes the building blocks so
//! you can embed the engine or compose parts of it inside your own
//! application.
//!
//! # Features
//! - URL patterns with named parameters (`@id`), per-parameter regex
//!   constraints (`@id:[0-9]+`), optional segments (`(/@page)`) and a
//!   trailing `*` wildcard with splat capture
//! - Method-bucketed route table; one registration may span several verbs
//! - Monotonic per-request match cursor: an incomplete response falls
//!   through to the next matching route, never revisiting a rejected one
//! - LIFO middleware chain with an explicit continuation; a layer may
//!   short-circuit, observe, or rewrite the response on the way out
//! - Handlers return either a full typed [`Response`] or raw output that
//!   the terminal dispatch layer wraps into a default 200
//! - Response conveniences: JSON bodies, redirects, cache headers, ETag
//!   and Last-Modified revalidation
//! - Configuration loading (TOML / YAML / JSON) with validation, and
//!   structured tracing via `tracing`
//!
//! # Quick Example
//! ```
//! use switchyard::{Engine, HandlerOutcome, Method, Request, RouteConfig, handler_fn};
//!
//! let mut engine = Engine::new();
//! engine
//!     .table_mut()
//!     .get(
//!         "/hello/@name",
//!         handler_fn(|_request, args| {
//!             let name = args[0].as_str().unwrap_or("world");
//!             Ok(HandlerOutcome::output(format!("Hello {name}!")))
//!         }),
//!         RouteConfig::new(),
//!     )
//!     .unwrap();
//!
//! let response = engine.dispatch(&Request::new(Method::Get, "/hello/ada")).unwrap();
//! assert_eq!(response.body(), b"Hello ada!");
//! ```
//!
//! # Architecture
//! The crate separates **ports** (traits) from **adapters**
//! (implementations) while keeping the routing logic inside `core`. End
//! users should prefer the re-exports documented below instead of reaching
//! into internal modules directly.
//!
//! # Error Handling
//! Binary-facing APIs return `eyre::Result<T>` with context attached via
//! `WrapErr`; the core reports failures through domain-specific error
//! types in [`error`].
pub mod config;
pub mod ports;
pub mod tracing_setup;

// These modules are implementation details and should not be directly used by users
pub mod adapters;
pub mod core;
pub mod error;
pub mod http;

// Re-export the types most embedders need
pub use crate::{
    core::{
        Engine, MatchCursor, MatchedRoute, MiddlewareChain, Next, Route, RouteConfig, RouteMatch,
        RoutePattern, RouteTable, layers,
    },
    error::{DispatchError, MethodParseError, PatternError, ResponseError},
    http::{Method, Request, Response},
    ports::{Arg, Handler, HandlerOutcome, handler_fn},
};
