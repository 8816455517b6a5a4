//! The middleware chain: an ordered stack of interceptor layers executed
//! in LIFO order.
//!
//! Layers are pushed innermost-first: the last layer pushed runs first and
//! wraps everything pushed before it. Each invocation receives a [`Next`]
//! continuation for the remaining chain; calling it consumes it, so a layer
//! can hand control inward at most once and re-entrant double-dispatch is
//! unrepresentable. A layer that returns without calling `next` simply
//! short-circuits the layers beneath it.
//!
//! The chain itself is immutable during dispatch; every dispatch builds a
//! fresh continuation, so one chain value can serve concurrent requests.
use std::sync::Arc;

use crate::{
    core::route::MatchedRoute,
    error::DispatchError,
    http::{request::Request, response::Response},
    ports::handler::{Arg, HandlerOutcome},
};

/// The uniform layer signature. `None` means the layer produced no
/// response, which the dispatch loop treats as a distinct condition from a
/// 404.
pub type Layer = dyn Fn(&MatchedRoute, &Request, Vec<Arg>, Next<'_>) -> Result<Option<Response>, DispatchError>
    + Send
    + Sync;

/// An ordered stack of middleware layers.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    layers: Vec<Arc<Layer>>,
}

impl MiddlewareChain {
    /// An empty chain. Dispatching through it yields no response.
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain seeded with the terminal dispatch layer, which invokes the
    /// matched route's handler. Layers pushed afterwards wrap it.
    pub fn with_dispatch() -> Self {
        let mut chain = Self::new();
        chain.push(dispatch_layer);
        chain
    }

    /// Push a layer onto the stack. The most recently pushed layer executes
    /// first on dispatch.
    pub fn push<F>(&mut self, layer: F)
    where
        F: Fn(&MatchedRoute, &Request, Vec<Arg>, Next<'_>) -> Result<Option<Response>, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        self.layers.push(Arc::new(layer));
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Run the full chain for one matched route.
    pub fn dispatch(
        &self,
        matched: &MatchedRoute,
        request: &Request,
        args: Vec<Arg>,
    ) -> Result<Option<Response>, DispatchError> {
        Next {
            remaining: &self.layers,
        }
        .run(matched, request, args)
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("layers", &self.layers.len())
            .finish()
    }
}

/// The continuation handed to each layer: the not-yet-executed remainder
/// of the chain. Consumed by [`Next::run`], so it can be called once.
pub struct Next<'a> {
    remaining: &'a [Arc<Layer>],
}

impl Next<'_> {
    /// Invoke the next layer inward, or yield `None` when the chain is
    /// exhausted without a response.
    pub fn run(
        self,
        matched: &MatchedRoute,
        request: &Request,
        args: Vec<Arg>,
    ) -> Result<Option<Response>, DispatchError> {
        match self.remaining.split_last() {
            Some((layer, rest)) => layer(matched, request, args, Next { remaining: rest }),
            None => Ok(None),
        }
    }
}

/// The terminal layer: invokes the matched handler and adapts its outcome.
/// Raw output becomes the body of a default 200 response.
fn dispatch_layer(
    matched: &MatchedRoute,
    request: &Request,
    args: Vec<Arg>,
    _next: Next<'_>,
) -> Result<Option<Response>, DispatchError> {
    let outcome = matched
        .route()
        .handler()
        .call(request, &args)
        .map_err(DispatchError::Handler)?;

    let response = match outcome {
        HandlerOutcome::Response(response) => response,
        HandlerOutcome::Output(text) => {
            let mut response = Response::new();
            response.write(text);
            response
        }
    };

    Ok(Some(response))
}
