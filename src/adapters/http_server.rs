//! Hyper-based transport adapter.
//!
//! Bridges wire requests into the synchronous core: collects the body,
//! translates into the core's [`Request`], runs [`Engine::dispatch`] and
//! renders the resulting [`Response`] back onto the wire. All HTTP framing
//! stays on this side of the boundary; the core never sees hyper types.
use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use bytes::Bytes;
use eyre::{Result, WrapErr};
use http_body_util::{BodyExt, Full};
use hyper::{
    StatusCode,
    body::Incoming,
    header::{HeaderName, HeaderValue},
    service::service_fn,
};
use hyper_util::rt::{TokioExecutor, TokioIo};
use tokio::net::TcpListener;

use crate::{
    core::engine::Engine,
    http::{method::Method, request::Request, response::Response},
};

/// Accept connections on `addr` and dispatch every request through the
/// engine. Runs until the enclosing task is cancelled.
pub async fn serve(engine: Arc<Engine>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    loop {
        let (stream, peer) = listener.accept().await.wrap_err("Accept failed")?;
        let engine = engine.clone();

        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| handle(engine.clone(), req));

            if let Err(error) = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new())
                .serve_connection(io, service)
                .await
            {
                tracing::debug!(%peer, "connection error: {error}");
            }
        });
    }
}

/// Translate one wire request, dispatch it, and render the result.
async fn handle(
    engine: Arc<Engine>,
    req: hyper::Request<Incoming>,
) -> Result<hyper::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let Ok(method) = parts.method.as_str().parse::<Method>() else {
        return Ok(plain_response(
            StatusCode::NOT_IMPLEMENTED,
            "Not Implemented",
        ));
    };

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let mut request = Request::new(method, target);
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            request.set_header(name.as_str(), value);
        }
    }

    match body.collect().await {
        Ok(collected) => {
            request.set_body(collected.to_bytes().to_vec());
        }
        Err(error) => {
            tracing::debug!("failed to read request body: {error}");
            return Ok(plain_response(StatusCode::BAD_REQUEST, "Bad Request"));
        }
    }

    match engine.dispatch(&request) {
        Ok(response) => Ok(to_wire(response).await),
        Err(error) => {
            tracing::error!(
                method = %request.method(),
                url = %request.url(),
                "dispatch failed: {error}"
            );
            Ok(plain_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
            ))
        }
    }
}

/// Render a core response onto the wire, honoring the file-path override
/// and the write-once `sent` guard.
async fn to_wire(mut response: Response) -> hyper::Response<Full<Bytes>> {
    if let Err(error) = response.mark_sent() {
        tracing::warn!("refusing double emission: {error}");
        return plain_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        );
    }

    let body = match response.file_path() {
        Some(path) => match tokio::fs::read(path).await {
            Ok(contents) => contents,
            Err(error) => {
                tracing::warn!(path = %path.display(), "failed to read response file: {error}");
                return plain_response(StatusCode::NOT_FOUND, "Not Found");
            }
        },
        None => response.body().to_vec(),
    };

    let mut wire = hyper::Response::new(Full::new(Bytes::from(body)));
    *wire.status_mut() =
        StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    for (name, value) in response.headers() {
        match (
            name.parse::<HeaderName>(),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                wire.headers_mut().append(name, value);
            }
            _ => tracing::warn!("invalid response header: {name} = {value}"),
        }
    }

    wire
}

fn plain_response(status: StatusCode, text: &'static str) -> hyper::Response<Full<Bytes>> {
    let mut wire = hyper::Response::new(Full::new(Bytes::from_static(text.as_bytes())));
    *wire.status_mut() = status;
    wire
}
