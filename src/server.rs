//! Standalone HTTP/1 server exposing the schema at `/graphql`.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CONTENT_TYPE,
};
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Body;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use juniper::DefaultScalarValue;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::context::Context;
use crate::request::{self, GraphQLRequest, Reply};
use crate::schema::Schema;

pub const GRAPHQL_PATH: &str = "/graphql";
pub const PLAYGROUND_PATH: &str = "/playground";

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

/// Pause after a failed accept, e.g. when the process is out of descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accepts connections until `shutdown` resolves, serving each one on its own
/// task.
///
/// Failed accepts are logged and retried; only `shutdown` ends the loop.
pub async fn serve<F>(listener: TcpListener, root_node: Arc<Schema>, context: Arc<Context>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let listener = &listener;
    loop {
        let (stream, peer) = tokio::select! {
            accepted = accept_with_backoff(move || listener.accept()) => accepted,
            () = &mut shutdown => {
                info!("shutting down");
                return;
            }
        };
        let root_node = Arc::clone(&root_node);
        let context = Arc::clone(&context);
        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let root_node = Arc::clone(&root_node);
                let context = Arc::clone(&context);
                async move { Ok::<_, Infallible>(handle(&root_node, &context, req).await) }
            });
            if let Err(err) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!(%peer, error = %err, "connection closed with error");
            }
        });
    }
}

/// Retries `accept` until it yields a connection.
async fn accept_with_backoff<A, Fut, T>(mut accept: A) -> T
where
    A: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<T>>,
{
    loop {
        match accept().await {
            Ok(accepted) => return accepted,
            Err(err) => {
                warn!(error = %err, "failed to accept connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

/// Routes one request.
pub async fn handle<B>(root_node: &Schema, context: &Context, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let reply = match (method.clone(), path.as_str()) {
        (Method::OPTIONS, GRAPHQL_PATH) => return preflight(),
        (Method::GET, GRAPHQL_PATH) => match req.uri().query() {
            Some(query) if !query.is_empty() => match query_pairs(query) {
                Ok(pairs) => match GraphQLRequest::<DefaultScalarValue>::from_query_params(pairs) {
                    Ok(gql_req) => gql_req.execute(root_node, context).await,
                    Err(err) => request::rejected(&err),
                },
                Err(reply) => reply,
            },
            _ => request::graphiql_source(GRAPHQL_PATH),
        },
        (Method::POST, GRAPHQL_PATH) => match read_body(req.into_body()).await {
            Ok(body) => match GraphQLRequest::<DefaultScalarValue>::from_json_body(&body) {
                Ok(gql_req) => gql_req.execute(root_node, context).await,
                Err(err) => request::rejected(&err),
            },
            Err(reply) => reply,
        },
        (_, GRAPHQL_PATH) => Reply {
            allow: Some(ALLOWED_METHODS),
            ..request::custom(
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "errors": [{ "message": format!("Method {method} is not allowed") }] }),
            )
        },
        (Method::GET, PLAYGROUND_PATH) => request::playground_source(GRAPHQL_PATH),
        _ => request::custom(
            StatusCode::NOT_FOUND,
            json!({ "errors": [{ "message": format!("No route for {path}") }] }),
        ),
    };
    debug!(%method, %path, status = reply.status.as_u16(), "request served");
    into_response(reply)
}

async fn read_body<B>(body: B) -> Result<String, Reply>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let bytes = Limited::new(body, MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|err| {
            warn!(error = %err, "failed to read request body");
            request::custom(
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "errors": [{ "message": format!("Unreadable body: {err}") }] }),
            )
        })?
        .to_bytes();
    String::from_utf8(bytes.to_vec()).map_err(|_| {
        request::custom(
            StatusCode::BAD_REQUEST,
            json!({ "errors": [{ "message": "Body is not valid UTF-8" }] }),
        )
    })
}

/// Decodes an `application/x-www-form-urlencoded` query string, keeping
/// repeated keys.
fn query_pairs(query: &str) -> Result<Vec<(String, String)>, Reply> {
    serde_urlencoded::from_str(query).map_err(|err| {
        request::custom(
            StatusCode::BAD_REQUEST,
            json!({ "errors": [{ "message": format!("Invalid query string: {err}") }] }),
        )
    })
}

fn preflight() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}

fn into_response(reply: Reply) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(reply.body)));
    *response.status_mut() = reply.status;
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(reply.content_type));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    if let Some(allow) = reply.allow {
        headers.insert(ALLOW, HeaderValue::from_static(allow));
    }
    response
}
