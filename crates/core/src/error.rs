//! webrpc Error Type
//!
//! One error type for every failure a caller can observe. The taxonomy
//! table (see [`crate::domain::error_kind`]) decides the class; the fields
//! are what travels on the wire.

use crate::domain::{ErrorKind, ErrorTable, ProtocolError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which table row (if any) an error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Protocol-reserved kind (codes 0..=-6)
    Protocol(ProtocolError),
    /// Schema-defined kind (codes >= 1)
    Schema(&'static ErrorKind),
    /// Code not present in the local table; fields kept verbatim
    Unknown,
}

/// webrpc error (server and client side)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name} (code {code}): {message}{}", cause_suffix(.cause))]
pub struct WebrpcError {
    pub class: ErrorClass,
    pub code: i32,
    pub name: String,
    pub message: String,
    pub status: u16,
    pub cause: Option<String>,
}

fn cause_suffix(cause: &Option<String>) -> String {
    match cause {
        Some(c) => format!(" ({})", c),
        None => String::new(),
    }
}

/// Result type alias using WebrpcError
pub type Result<T> = std::result::Result<T, WebrpcError>;

impl WebrpcError {
    /// Error of a protocol-reserved kind with its default fields
    pub fn protocol(kind: ProtocolError) -> Self {
        let row = kind.kind();
        Self {
            class: ErrorClass::Protocol(kind),
            code: row.code,
            name: row.name.to_string(),
            message: row.message.to_string(),
            status: row.status,
            cause: None,
        }
    }

    /// Error of a schema-defined kind with its default fields
    pub fn schema(kind: &'static ErrorKind) -> Self {
        let class = match ProtocolError::from_code(kind.code) {
            Some(p) => ErrorClass::Protocol(p),
            None => ErrorClass::Schema(kind),
        };
        Self {
            class,
            code: kind.code,
            name: kind.name.to_string(),
            message: kind.message.to_string(),
            status: kind.status,
            cause: None,
        }
    }

    pub fn endpoint() -> Self {
        Self::protocol(ProtocolError::Endpoint)
    }

    pub fn request_failed() -> Self {
        Self::protocol(ProtocolError::RequestFailed)
    }

    pub fn bad_route() -> Self {
        Self::protocol(ProtocolError::BadRoute)
    }

    pub fn bad_method() -> Self {
        Self::protocol(ProtocolError::BadMethod)
    }

    pub fn bad_request() -> Self {
        Self::protocol(ProtocolError::BadRequest)
    }

    pub fn bad_response() -> Self {
        Self::protocol(ProtocolError::BadResponse)
    }

    pub fn server_panic() -> Self {
        Self::protocol(ProtocolError::ServerPanic)
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn protocol_kind(&self) -> Option<ProtocolError> {
        match self.class {
            ErrorClass::Protocol(p) => Some(p),
            _ => None,
        }
    }

    pub fn is(&self, kind: &ErrorKind) -> bool {
        self.code == kind.code
    }

    /// HTTP status for sending this error; falls back to the host default
    /// when the error carries status 0.
    pub fn http_status(&self) -> u16 {
        if self.status != 0 {
            return self.status;
        }
        match self.class {
            ErrorClass::Protocol(p) => p.fallback_status(),
            ErrorClass::Schema(_) | ErrorClass::Unknown => 400,
        }
    }

    /// Convert any handler failure into a wire error.
    ///
    /// A `WebrpcError` anywhere in the chain is forwarded unchanged;
    /// everything else becomes ServerPanic with the failure text as cause.
    pub fn from_failure(err: &anyhow::Error) -> Self {
        match err.chain().find_map(|e| e.downcast_ref::<WebrpcError>()) {
            Some(e) => e.clone(),
            None => Self::server_panic().with_cause(format!("{:#}", err)),
        }
    }

    /// Rebuild a typed error from a payload (client side).
    ///
    /// Known codes produce their specific class; unknown codes keep every
    /// field verbatim under [`ErrorClass::Unknown`].
    pub fn from_payload(payload: ErrorPayload, table: &ErrorTable) -> Self {
        let known = table.by_code(payload.code);
        let class = match known {
            Some(kind) => match ProtocolError::from_code(kind.code) {
                Some(p) => ErrorClass::Protocol(p),
                None => ErrorClass::Schema(kind),
            },
            None => ErrorClass::Unknown,
        };

        let name = match (payload.name.is_empty(), known) {
            (false, _) => payload.name,
            (true, Some(kind)) => kind.name.to_string(),
            (true, None) => "WebrpcError".to_string(),
        };
        let message = match (payload.message.is_empty(), known) {
            (false, _) => payload.message,
            (true, Some(kind)) => kind.message.to_string(),
            (true, None) => format!("endpoint error {}", payload.code),
        };

        Self {
            class,
            code: payload.code,
            name,
            message,
            status: payload.status,
            cause: payload.cause,
        }
    }

    /// Parse a non-success response body into a typed error.
    ///
    /// Bodies that are not JSON objects with a numeric `code` become
    /// BadResponse carrying the raw text as cause.
    pub fn from_response_body(http_status: u16, text: &str, table: &ErrorTable) -> Self {
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                return Self::bad_response()
                    .with_status(http_status)
                    .with_cause(format!("invalid JSON: {}: response text: {}", e, text));
            }
        };

        match ErrorPayload::from_value(&value) {
            Some(payload) => Self::from_payload(payload, table),
            None => Self::bad_response()
                .with_status(http_status)
                .with_cause(format!("malformed error payload: response text: {}", text)),
        }
    }
}

/// Wire form of a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: i32,
    pub name: String,
    pub message: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ErrorPayload {
    /// JSON body for this payload; `cause` is omitted when absent.
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "code": self.code,
            "name": self.name,
            "message": self.message,
            "status": self.status,
        });
        if let (Some(cause), Some(obj)) = (&self.cause, body.as_object_mut()) {
            obj.insert("cause".to_string(), serde_json::Value::String(cause.clone()));
        }
        body
    }

    /// Lenient extraction from an arbitrary JSON value.
    ///
    /// `code` must be an integer; `error`/`msg` are accepted for
    /// `name`/`message`; other fields default when missing.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let code = i32::try_from(obj.get("code")?.as_i64()?).ok()?;

        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
                .unwrap_or_default()
                .to_string()
        };

        let status = obj
            .get("status")
            .and_then(|v| v.as_u64())
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(0);

        let cause = obj
            .get("cause")
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Some(Self {
            code,
            name: text(&["name", "error"]),
            message: text(&["message", "msg"]),
            status,
            cause,
        })
    }
}

impl From<&WebrpcError> for ErrorPayload {
    fn from(err: &WebrpcError) -> Self {
        Self {
            code: err.code,
            name: err.name.clone(),
            message: err.message.clone(),
            status: err.status,
            cause: err.cause.clone(),
        }
    }
}

impl From<WebrpcError> for ErrorPayload {
    fn from(err: WebrpcError) -> Self {
        Self {
            code: err.code,
            name: err.name,
            message: err.message,
            status: err.status,
            cause: err.cause,
        }
    }
}

/// Server side: turn any failure into its wire payload
pub fn to_payload(err: &anyhow::Error) -> ErrorPayload {
    ErrorPayload::from(WebrpcError::from_failure(err))
}
