// Tests for the middleware chain as seen through the engine: execution
// order, short-circuiting, response rewriting and the stock layers.
#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use switchyard::{
        Arg, DispatchError, Engine, HandlerOutcome, Method, Request, Response, RouteConfig,
        core::layers, handler_fn, ports::handler::HandlerError,
    };

    fn text(body: &'static str) -> impl Fn(&Request, &[Arg]) -> Result<HandlerOutcome, HandlerError>
    + Send
    + Sync
    + 'static {
        move |_request, _args| Ok(HandlerOutcome::output(body))
    }

    #[test]
    fn test_layers_execute_in_lifo_order_around_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut engine = Engine::new();
        let handler_log = log.clone();
        engine
            .table_mut()
            .get(
                "/x",
                handler_fn(move |_request, _args| {
                    handler_log.lock().unwrap().push("handler");
                    Ok(HandlerOutcome::output("done"))
                }),
                RouteConfig::new(),
            )
            .unwrap();

        for name in ["inner", "outer"] {
            let layer_log = log.clone();
            engine.chain_mut().push(move |matched, request, args, next| {
                layer_log.lock().unwrap().push(name);
                let result = next.run(matched, request, args);
                layer_log.lock().unwrap().push(name);
                result
            });
        }

        engine.dispatch(&Request::new(Method::Get, "/x")).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer", "inner", "handler", "inner", "outer"]
        );
    }

    #[test]
    fn test_short_circuit_denies_without_running_handler() {
        let ran = Arc::new(Mutex::new(false));

        let mut engine = Engine::new();
        let handler_ran = ran.clone();
        engine
            .table_mut()
            .get(
                "/secret",
                handler_fn(move |_request, _args| {
                    *handler_ran.lock().unwrap() = true;
                    Ok(HandlerOutcome::output("secret"))
                }),
                RouteConfig::new(),
            )
            .unwrap();

        engine.chain_mut().push(|_matched, request, _args, _next| {
            if request.header("authorization").is_none() {
                let mut response = Response::with_status(403)?;
                response.write("Forbidden");
                return Ok(Some(response));
            }
            unreachable!("test request carries no authorization header")
        });

        let response = engine
            .dispatch(&Request::new(Method::Get, "/secret"))
            .unwrap();
        assert_eq!(response.status(), 403);
        assert!(!*ran.lock().unwrap());
    }

    #[test]
    fn test_layer_rewrites_response_on_the_way_out() {
        let mut engine = Engine::new();
        engine
            .table_mut()
            .get("/x", text("body"), RouteConfig::new())
            .unwrap();

        engine.chain_mut().push(|matched, request, args, next| {
            let response = next.run(matched, request, args)?;
            Ok(response.map(|mut response| {
                response.set_header("X-Served-By", "switchyard");
                response
            }))
        });

        let response = engine.dispatch(&Request::new(Method::Get, "/x")).unwrap();
        assert_eq!(
            response.header_values("x-served-by").next(),
            Some("switchyard")
        );
        assert_eq!(response.body(), b"body");
    }

    #[test]
    fn test_swallowed_response_is_a_dispatch_error_not_a_404() {
        let mut engine = Engine::new();
        engine
            .table_mut()
            .get("/x", text("eaten"), RouteConfig::new())
            .unwrap();

        engine
            .chain_mut()
            .push(|_matched, _request, _args, _next| Ok(None));

        let err = engine
            .dispatch(&Request::new(Method::Get, "/x"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::NoResponseProduced));
    }

    #[test]
    fn test_inject_flag_end_to_end() {
        let mut config = RouteConfig::new();
        config.insert("audited".to_string(), serde_json::json!(true));

        let mut engine = Engine::new();
        engine
            .table_mut()
            .get(
                "/billing",
                handler_fn(|_request, args| {
                    let audited = args.iter().any(|arg| arg.as_flag() == Some(true));
                    Ok(HandlerOutcome::output(if audited { "audited" } else { "plain" }))
                }),
                config,
            )
            .unwrap();
        engine
            .table_mut()
            .get(
                "/status",
                handler_fn(|_request, args| {
                    let audited = args.iter().any(|arg| arg.as_flag() == Some(true));
                    Ok(HandlerOutcome::output(if audited { "audited" } else { "plain" }))
                }),
                RouteConfig::new(),
            )
            .unwrap();

        engine.chain_mut().push(layers::inject_flag("audited"));

        let response = engine
            .dispatch(&Request::new(Method::Get, "/billing"))
            .unwrap();
        assert_eq!(response.body(), b"audited");

        let response = engine
            .dispatch(&Request::new(Method::Get, "/status"))
            .unwrap();
        assert_eq!(response.body(), b"plain");
    }

    #[test]
    fn test_allow_cross_origin_preflight_through_engine() {
        let mut engine = Engine::new();
        engine
            .table_mut()
            .options("/api/items", text(""), RouteConfig::new())
            .unwrap();
        engine.chain_mut().push(layers::allow_cross_origin);

        let request = Request::new(Method::Options, "/api/items")
            .with_header("Origin", "https://app.example.com")
            .with_header("Access-Control-Request-Method", "PUT")
            .with_header("Access-Control-Request-Headers", "Content-Type");

        let response = engine.dispatch(&request).unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.header_values("access-control-allow-origin").next(),
            Some("https://app.example.com")
        );
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
            Some("Content-Type")
        );
    }

    #[test]
    fn test_incomplete_fallthrough_runs_chain_per_candidate() {
        // Every candidate gets its own pass through the chain.
        let hits = Arc::new(Mutex::new(0usize));

        let mut engine = Engine::new();
        engine
            .table_mut()
            .get(
                "/page",
                handler_fn(|_request, _args| {
                    let mut response = Response::new();
                    response.write("draft").set_complete(false);
                    Ok(response.into())
                }),
                RouteConfig::new(),
            )
            .unwrap();
        engine
            .table_mut()
            .get("/page", text("final"), RouteConfig::new())
            .unwrap();

        let counter = hits.clone();
        engine.chain_mut().push(move |matched, request, args, next| {
            *counter.lock().unwrap() += 1;
            next.run(matched, request, args)
        });

        let response = engine.dispatch(&Request::new(Method::Get, "/page")).unwrap();
        assert_eq!(response.body(), b"final");
        assert_eq!(*hits.lock().unwrap(), 2);
    }
}
