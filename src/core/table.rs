//! The method-indexed route table.
//!
//! Each supported verb owns an ordered bucket of routes; registration
//! order is match order, and duplicate patterns are never merged. A route
//! registered for several verbs is one shared record appearing in each
//! bucket.
use std::{collections::HashMap, sync::Arc};

use crate::{
    core::{
        pattern::RoutePattern,
        route::{Route, RouteConfig},
    },
    error::MethodParseError,
    http::method::Method,
    ports::handler::Handler,
};

/// A registry of routes, bucketed by HTTP method.
#[derive(Debug)]
pub struct RouteTable {
    buckets: HashMap<Method, Vec<Arc<Route>>>,
    case_sensitive: bool,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            buckets: Method::ALL
                .iter()
                .map(|method| (*method, Vec::new()))
                .collect(),
            case_sensitive: false,
        }
    }

    /// Whether match attempts compare paths case-sensitively. Applies
    /// globally, at match time.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    /// Map a URL pattern to a handler.
    ///
    /// The pattern may carry a space-delimited method spec prefix, e.g.
    /// `"GET /users"` or `"GET|POST /form"`; without one the route is
    /// registered under every supported verb. Returns the created route.
    pub fn register<H>(
        &mut self,
        spec: &str,
        handler: H,
        config: RouteConfig,
    ) -> Result<Arc<Route>, MethodParseError>
    where
        H: Handler + 'static,
    {
        let spec = spec.trim();
        let (methods, pattern) = match spec.split_once(' ') {
            Some((method_spec, pattern)) => (Method::parse_spec(method_spec)?, pattern.trim()),
            None => (Method::ALL.to_vec(), spec),
        };

        let route = Arc::new(Route::new(
            RoutePattern::new(pattern),
            Arc::new(handler),
            methods.clone(),
            config,
        ));

        tracing::debug!(pattern, methods = ?route.methods(), "registered route");

        for method in methods {
            if let Some(bucket) = self.buckets.get_mut(&method) {
                bucket.push(route.clone());
            }
        }

        Ok(route)
    }

    /// Shorthand for `register("GET <pattern>", ..)`.
    pub fn get<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
        config: RouteConfig,
    ) -> Result<Arc<Route>, MethodParseError> {
        self.register(&format!("GET {pattern}"), handler, config)
    }

    /// Shorthand for `register("POST <pattern>", ..)`.
    pub fn post<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
        config: RouteConfig,
    ) -> Result<Arc<Route>, MethodParseError> {
        self.register(&format!("POST {pattern}"), handler, config)
    }

    /// Shorthand for `register("PUT <pattern>", ..)`.
    pub fn put<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
        config: RouteConfig,
    ) -> Result<Arc<Route>, MethodParseError> {
        self.register(&format!("PUT {pattern}"), handler, config)
    }

    /// Shorthand for `register("PATCH <pattern>", ..)`.
    pub fn patch<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
        config: RouteConfig,
    ) -> Result<Arc<Route>, MethodParseError> {
        self.register(&format!("PATCH {pattern}"), handler, config)
    }

    /// Shorthand for `register("DELETE <pattern>", ..)`.
    pub fn delete<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
        config: RouteConfig,
    ) -> Result<Arc<Route>, MethodParseError> {
        self.register(&format!("DELETE {pattern}"), handler, config)
    }

    /// Shorthand for `register("OPTIONS <pattern>", ..)`.
    pub fn options<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
        config: RouteConfig,
    ) -> Result<Arc<Route>, MethodParseError> {
        self.register(&format!("OPTIONS {pattern}"), handler, config)
    }

    /// Shorthand for `register("HEAD <pattern>", ..)`.
    pub fn head<H: Handler + 'static>(
        &mut self,
        pattern: &str,
        handler: H,
        config: RouteConfig,
    ) -> Result<Arc<Route>, MethodParseError> {
        self.register(&format!("HEAD {pattern}"), handler, config)
    }

    /// The candidate routes for a method, in registration order.
    pub fn candidates(&self, method: Method) -> &[Arc<Route>] {
        self.buckets
            .get(&method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Remove every registered route.
    pub fn clear(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
    }

    /// Total number of registrations across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }
}
