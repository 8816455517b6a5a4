//! Stock middleware layers.
//!
//! These are ordinary chain layers: push them onto an engine's chain in
//! the order you want them to wrap the dispatch (last pushed runs first).
use std::time::Instant;

use crate::{
    core::{chain::Next, route::MatchedRoute},
    error::DispatchError,
    http::{method::Method, request::Request, response::Response},
    ports::handler::Arg,
};

/// A layer that appends a boolean argument when the matched route's config
/// carries a truthy value under `key`. Routes without the key are passed
/// through untouched.
pub fn inject_flag(
    key: impl Into<String>,
) -> impl Fn(&MatchedRoute, &Request, Vec<Arg>, Next<'_>) -> Result<Option<Response>, DispatchError>
+ Send
+ Sync
+ 'static {
    let key = key.into();
    move |matched, request, mut args, next| {
        if matched.route().flag(&key) {
            args.push(Arg::Flag(true));
        }
        next.run(matched, request, args)
    }
}

/// Log start and completion of a dispatch, including latency.
pub fn request_timing(
    matched: &MatchedRoute,
    request: &Request,
    args: Vec<Arg>,
    next: Next<'_>,
) -> Result<Option<Response>, DispatchError> {
    let start = Instant::now();
    tracing::info!(
        method = %request.method(),
        url = %request.url(),
        pattern = matched.route().pattern().as_str(),
        "started processing request"
    );

    let result = next.run(matched, request, args);
    let elapsed = start.elapsed();

    match &result {
        Ok(Some(response)) => tracing::info!(
            method = %request.method(),
            url = %request.url(),
            status = response.status(),
            ?elapsed,
            "completed request"
        ),
        Ok(None) => tracing::warn!(
            method = %request.method(),
            url = %request.url(),
            ?elapsed,
            "chain produced no response"
        ),
        Err(error) => tracing::warn!(
            method = %request.method(),
            url = %request.url(),
            ?elapsed,
            "dispatch failed: {error}"
        ),
    }

    result
}

/// Reflect the caller's origin into CORS response headers, with OPTIONS
/// preflight handling.
///
/// The origin and fetch metadata are read from explicit [`Request`] fields;
/// requests carrying neither are passed through untouched.
pub fn allow_cross_origin(
    matched: &MatchedRoute,
    request: &Request,
    args: Vec<Arg>,
    next: Next<'_>,
) -> Result<Option<Response>, DispatchError> {
    let Some(mut response) = next.run(matched, request, args)? else {
        return Ok(None);
    };

    if let Some(origin) = request.header("origin") {
        response.set_header("Access-Control-Allow-Origin", origin);
        response.set_header("Access-Control-Allow-Credentials", "true");
        response.set_header("Access-Control-Max-Age", "86400");
    } else if request.header("sec-fetch-site").is_some() {
        response.set_header("Access-Control-Allow-Origin", "*");
        response.set_header("Access-Control-Allow-Credentials", "true");
        response.set_header("Access-Control-Max-Age", "86400");
    }

    // Access-Control request headers arrive on OPTIONS preflights.
    if request.method() == Method::Options {
        if request.header("access-control-request-method").is_some() {
            response.set_header(
                "Access-Control-Allow-Methods",
                "GET, POST, PUT, DELETE, OPTIONS",
            );
        }
        if let Some(requested) = request.header("access-control-request-headers") {
            response.set_header("Access-Control-Allow-Headers", requested.to_string());
        }
        response.set_status(200)?;
    }

    Ok(Some(response))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        core::{
            chain::MiddlewareChain,
            pattern::RoutePattern,
            route::{Route, RouteConfig},
        },
        ports::handler::{HandlerOutcome, handler_fn},
    };

    fn chain_for(config: RouteConfig) -> (MiddlewareChain, MatchedRoute) {
        let route = Arc::new(Route::new(
            RoutePattern::new("/x"),
            Arc::new(handler_fn(|_request, args| {
                let flagged = args.iter().any(|arg| arg.as_flag() == Some(true));
                Ok(HandlerOutcome::output(if flagged { "flagged" } else { "plain" }))
            })),
            vec![Method::Get],
            config,
        ));
        let matched = route.pattern().match_path("/x", false).unwrap().unwrap();
        (MiddlewareChain::with_dispatch(), MatchedRoute::new(route, matched))
    }

    #[test]
    fn test_inject_flag_reads_route_config() {
        let mut config = RouteConfig::new();
        config.insert("authorized".to_string(), json!(true));
        let (mut chain, matched) = chain_for(config);
        chain.push(inject_flag("authorized"));

        let request = Request::new(Method::Get, "/x");
        let response = chain
            .dispatch(&matched, &request, Vec::new())
            .unwrap()
            .unwrap();
        assert_eq!(response.body(), b"flagged");
    }

    #[test]
    fn test_inject_flag_skips_unconfigured_routes() {
        let (mut chain, matched) = chain_for(RouteConfig::new());
        chain.push(inject_flag("authorized"));

        let request = Request::new(Method::Get, "/x");
        let response = chain
            .dispatch(&matched, &request, Vec::new())
            .unwrap()
            .unwrap();
        assert_eq!(response.body(), b"plain");
    }

    #[test]
    fn test_allow_cross_origin_reflects_origin() {
        let (mut chain, matched) = chain_for(RouteConfig::new());
        chain.push(allow_cross_origin);

        let request =
            Request::new(Method::Get, "/x").with_header("Origin", "https://example.com");
        let response = chain
            .dispatch(&matched, &request, Vec::new())
            .unwrap()
            .unwrap();
        assert_eq!(
            response.header_values("access-control-allow-origin").next(),
            Some("https://example.com")
        );
        assert_eq!(
            response
                .header_values("access-control-allow-credentials")
                .next(),
            Some("true")
        );
    }

    #[test]
    fn test_allow_cross_origin_without_origin_headers() {
        let (mut chain, matched) = chain_for(RouteConfig::new());
        chain.push(allow_cross_origin);

        let request = Request::new(Method::Get, "/x");
        let response = chain
            .dispatch(&matched, &request, Vec::new())
            .unwrap()
            .unwrap();
        assert!(
            response
                .header_values("access-control-allow-origin")
                .next()
                .is_none()
        );
    }

    #[test]
    fn test_allow_cross_origin_preflight() {
        let (mut chain, matched) = chain_for(RouteConfig::new());
        chain.push(allow_cross_origin);

        let request = Request::new(Method::Options, "/x")
            .with_header("Origin", "https://example.com")
            .with_header("Access-Control-Request-Method", "POST")
            .with_header("Access-Control-Request-Headers", "X-Custom");
        let response = chain
            .dispatch(&matched, &request, Vec::new())
            .unwrap()
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response
                .header_values("access-control-allow-methods")
                .next(),
            Some("GET, POST, PUT, DELETE, OPTIONS")
        );
        assert_eq!(
            response
                .header_values("access-control-allow-headers")
                .next(),
            Some("X-Custom")
        );
    }
}
