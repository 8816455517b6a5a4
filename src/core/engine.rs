//! The dispatch loop: route selection, retry across candidates, and chain
//! invocation for one request.
//!
//! Data flow for one inbound request:
//! * URL-decode the request target once
//! * walk the method bucket with a fresh [`MatchCursor`]
//! * for each matching candidate, build the positional argument list and
//!   run the middleware chain
//! * the first response flagged complete wins; an incomplete response
//!   falls through to the next candidate; exhaustion yields a synthetic 404
//!
//! The cursor is created per request and advances monotonically, so a
//! rejected or fallen-through route is never re-tested within the same
//! request.
use crate::{
    config::models::EngineConfig,
    core::{
        chain::MiddlewareChain,
        route::{MatchedRoute, Route},
        table::RouteTable,
    },
    error::{DispatchError, PatternError, ResponseError},
    http::{request::Request, response::Response},
    ports::handler::Arg,
};
use std::sync::Arc;

/// Per-request iteration state over one candidate bucket.
#[derive(Debug, Default)]
pub struct MatchCursor {
    position: usize,
}

impl MatchCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Yield the next candidate whose pattern matches the path, advancing
    /// past every rejected route. The position never moves backwards.
    pub fn next_match(
        &mut self,
        candidates: &[Arc<Route>],
        path: &str,
        case_sensitive: bool,
    ) -> Result<Option<MatchedRoute>, PatternError> {
        while self.position < candidates.len() {
            let route = &candidates[self.position];
            self.position += 1;
            if let Some(matched) = route.pattern().match_path(path, case_sensitive)? {
                return Ok(Some(MatchedRoute::new(route.clone(), matched)));
            }
        }
        Ok(None)
    }

    /// Index of the next candidate to test.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The request-dispatch orchestrator: a route table plus a middleware
/// chain ending in the terminal dispatch layer.
#[derive(Debug)]
pub struct Engine {
    table: RouteTable,
    chain: MiddlewareChain,
    base_url: Option<String>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            table: RouteTable::new(),
            chain: MiddlewareChain::with_dispatch(),
            base_url: None,
        }
    }

    /// Build an engine from a loaded configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut engine = Self::new();
        engine.table.set_case_sensitive(config.case_sensitive);
        engine.base_url = config.base_url.clone();
        engine
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Mutable access for route registration.
    pub fn table_mut(&mut self) -> &mut RouteTable {
        &mut self.table
    }

    pub fn chain(&self) -> &MiddlewareChain {
        &self.chain
    }

    /// Mutable access for pushing middleware layers. Layers pushed here
    /// wrap the terminal dispatch layer and everything pushed before them.
    pub fn chain_mut(&mut self) -> &mut MiddlewareChain {
        &mut self.chain
    }

    /// Route and dispatch one request, producing either a handler response
    /// or the synthetic 404.
    pub fn dispatch(&self, request: &Request) -> Result<Response, DispatchError> {
        let path = decode_target(request.url());
        let candidates = self.table.candidates(request.method());
        let mut cursor = MatchCursor::new();

        loop {
            let Some(matched) =
                cursor.next_match(candidates, &path, self.table.case_sensitive())?
            else {
                tracing::debug!(method = %request.method(), url = %request.url(), "no route matched");
                return Ok(Response::not_found());
            };

            tracing::trace!(
                pattern = matched.route().pattern().as_str(),
                "dispatching matched route"
            );

            let mut args: Vec<Arg> = matched
                .params()
                .iter()
                .map(|(_, value)| match value {
                    Some(value) => Arg::Value(value.clone()),
                    None => Arg::Absent,
                })
                .collect();

            if matched.route().pass_route() {
                args.push(Arg::Route(matched.clone()));
            }

            let Some(response) = self.chain.dispatch(&matched, request, args)? else {
                return Err(DispatchError::NoResponseProduced);
            };

            if response.is_complete() {
                return Ok(response);
            }
            // Incomplete response: fall through to the next candidate.
        }
    }

    /// Build a redirect response, resolving relative targets against the
    /// configured base URL. The conventional code is 303.
    pub fn redirect(&self, url: &str, code: u16) -> Result<Response, ResponseError> {
        let target = match &self.base_url {
            Some(base) if base != "/" && !url.contains("://") => {
                format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
            }
            _ => url.to_string(),
        };

        let mut response = Response::with_status(code)?;
        response.set_header("Location", target);
        Ok(response)
    }
}

/// URL-decode the request target once; undecodable sequences are kept
/// as-is so matching still gets a chance.
fn decode_target(url: &str) -> String {
    match urlencoding::decode(url) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => url.to_string(),
    }
}
