//! HTTP-side types shared by the handlers

use serde::{Deserialize, Serialize};

/// Correlation header echoed (or minted) on every response
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Trace id attached to the request by the trace middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

/// GET /health
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub request_id: String,
}
