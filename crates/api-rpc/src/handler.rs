//! HTTP Handlers
//!
//! Translate between axum requests and the dispatcher's
//! [`RpcRequest`]/[`RpcResult`] values.

use crate::types::{HealthResponse, TraceId, TRACE_ID_HEADER};
use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use webrpc_core::port::cancel_channel;
use webrpc_core::{RequestContext, RpcRequest, RpcResult, Service, WebrpcError};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Vec<Arc<Service<RequestContext>>>>,
    pub max_body_bytes: usize,
}

impl AppState {
    fn service_for(&self, path: &str) -> Option<&Arc<Service<RequestContext>>> {
        self.services.iter().find(|s| path.starts_with(s.prefix()))
    }
}

/// Fallback handler: every path not claimed by another route.
pub async fn rpc(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();

    let Some(service) = state.service_for(&path) else {
        debug!(path = %path, "No service for path");
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };

    let raw_body = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let err = WebrpcError::bad_request().with_cause(format!("read body: {}", e));
            return into_response(service.error_result(err));
        }
    };

    // POST is canonical; GET only for argument-less calls.
    let verb_ok = match parts.method {
        Method::POST => true,
        Method::GET => raw_body.iter().all(u8::is_ascii_whitespace),
        _ => false,
    };
    if !verb_ok {
        let err = WebrpcError::bad_method()
            .with_cause(format!("unsupported HTTP method {} for {}", parts.method, path));
        return into_response(service.error_result(err));
    }

    let trace_id = parts
        .extensions
        .get::<TraceId>()
        .map(|t| t.0.clone())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let (trigger, signal) = cancel_channel();
    let guard = trigger.cancel_on_drop();
    let ctx = RequestContext::with_cancel(signal).with_trace_id(trace_id);

    let Some(request) = RpcRequest::parse(service.prefix(), &path, &raw_body) else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };
    let result = service.serve(&request, &ctx).await;
    guard.disarm();

    let elapsed_ms = ctx.elapsed().as_millis() as u64;
    if result.is_success() {
        info!(
            request_id = %ctx.request_id,
            service = service.definition().name,
            prefix = request.service_path(),
            method = request.method_name(),
            status = result.status,
            elapsed_ms,
            "RPC call"
        );
    } else {
        warn!(
            request_id = %ctx.request_id,
            service = service.definition().name,
            prefix = request.service_path(),
            method = request.method_name(),
            status = result.status,
            code = result.body.get("code").and_then(|c| c.as_i64()),
            elapsed_ms,
            "RPC call failed"
        );
    }

    into_response(result)
}

/// Write an [`RpcResult`] as an HTTP response.
pub fn into_response(result: RpcResult) -> Response {
    let status = StatusCode::from_u16(result.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut headers = HeaderMap::new();
    for (name, value) in &result.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!(header = %name, "Dropping invalid response header"),
        }
    }

    let body = match serde_json::to_vec(&result.body) {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to serialize response body");
            return (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response();
        }
    };
    (status, headers, Body::from(Bytes::from(body))).into_response()
}

/// GET /
pub async fn index() -> &'static str {
    "webrpc server\n"
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: webrpc_core::VERSION.to_string(),
        request_id: uuid::Uuid::new_v4().to_string(),
    })
}

/// Middleware: accept or mint a trace id and echo it on the response.
pub async fn trace_id(mut request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(TraceId(trace_id.clone()));
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
    }
    response
}
