//! The route registration record and its per-request match pairing.
//!
//! A [`Route`] is immutable after registration: per-match data never flows
//! back into it, so one route instance can serve any number of concurrent
//! dispatches without locking. The per-request view is [`MatchedRoute`],
//! which pairs the shared record with the [`RouteMatch`] produced for one
//! path.
use std::{collections::HashMap, fmt, sync::Arc};

use crate::{
    core::pattern::{RouteMatch, RoutePattern},
    http::method::Method,
    ports::handler::Handler,
};

/// Arbitrary per-route options. The core consumes only `pass_route`; every
/// other key is opaque and meaningful solely to middleware layers that
/// choose to read it.
pub type RouteConfig = HashMap<String, serde_json::Value>;

/// One registered route: pattern, handler, method set and configuration.
pub struct Route {
    pattern: RoutePattern,
    handler: Arc<dyn Handler>,
    methods: Vec<Method>,
    config: RouteConfig,
}

impl Route {
    pub(crate) fn new(
        pattern: RoutePattern,
        handler: Arc<dyn Handler>,
        methods: Vec<Method>,
        config: RouteConfig,
    ) -> Self {
        Self {
            pattern,
            handler,
            methods,
            config,
        }
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Truthiness of a config key, with the loose semantics middleware
    /// expects: missing keys, `false`, `null`, `0`, empty strings and empty
    /// collections are all false.
    pub fn flag(&self, key: &str) -> bool {
        self.config.get(key).is_some_and(is_truthy)
    }

    /// Whether the dispatch loop should append this route to the handler's
    /// argument list.
    pub fn pass_route(&self) -> bool {
        self.flag("pass_route")
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .field("methods", &self.methods)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64() != Some(0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

/// A route paired with the match data produced for one request.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    route: Arc<Route>,
    matched: RouteMatch,
}

impl MatchedRoute {
    pub(crate) fn new(route: Arc<Route>, matched: RouteMatch) -> Self {
        Self { route, matched }
    }

    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    /// Named parameters in pattern-declaration order; `None` marks a
    /// declared-but-absent optional.
    pub fn params(&self) -> &[(String, Option<String>)] {
        self.matched.params()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.matched.param(name)
    }

    pub fn splat(&self) -> &str {
        self.matched.splat()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ports::handler::{HandlerOutcome, handler_fn};

    fn dummy_route(config: RouteConfig) -> Route {
        Route::new(
            RoutePattern::new("/x"),
            Arc::new(handler_fn(|_, _| Ok(HandlerOutcome::output("ok")))),
            vec![Method::Get],
            config,
        )
    }

    #[test]
    fn test_flag_truthiness() {
        let mut config = RouteConfig::new();
        config.insert("pass_route".to_string(), json!(true));
        config.insert("empty".to_string(), json!(""));
        config.insert("zero".to_string(), json!(0));
        config.insert("name".to_string(), json!("auth"));
        config.insert("count".to_string(), json!(2));

        let route = dummy_route(config);
        assert!(route.pass_route());
        assert!(!route.flag("empty"));
        assert!(!route.flag("zero"));
        assert!(!route.flag("missing"));
        assert!(route.flag("name"));
        assert!(route.flag("count"));
    }
}
