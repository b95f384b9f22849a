// Error Kind Table (protocol-reserved + schema-defined)

use std::collections::HashMap;
use thiserror::Error;

/// One row of the error taxonomy: code, symbolic name, default message and
/// default HTTP status.
///
/// A `status` of `0` means "no status fixed by the schema"; hosts pick a
/// default (see [`ProtocolError::fallback_status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorKind {
    pub code: i32,
    pub name: &'static str,
    pub message: &'static str,
    pub status: u16,
}

impl ErrorKind {
    pub const fn new(code: i32, name: &'static str, message: &'static str, status: u16) -> Self {
        Self {
            code,
            name,
            message,
            status,
        }
    }
}

/// Protocol-reserved error kinds (codes 0 through -6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolError {
    Endpoint,
    RequestFailed,
    BadRoute,
    BadMethod,
    BadRequest,
    BadResponse,
    ServerPanic,
}

pub const ENDPOINT: ErrorKind = ErrorKind::new(0, "WebrpcEndpoint", "endpoint error", 400);
pub const REQUEST_FAILED: ErrorKind =
    ErrorKind::new(-1, "WebrpcRequestFailed", "request failed", 0);
pub const BAD_ROUTE: ErrorKind = ErrorKind::new(-2, "WebrpcBadRoute", "bad route", 0);
pub const BAD_METHOD: ErrorKind = ErrorKind::new(-3, "WebrpcBadMethod", "bad method", 0);
pub const BAD_REQUEST: ErrorKind = ErrorKind::new(-4, "WebrpcBadRequest", "bad request", 0);
pub const BAD_RESPONSE: ErrorKind = ErrorKind::new(-5, "WebrpcBadResponse", "bad response", 0);
pub const SERVER_PANIC: ErrorKind = ErrorKind::new(-6, "WebrpcServerPanic", "server panic", 0);

/// All protocol-reserved kinds, in code order.
pub const PROTOCOL_KINDS: [ProtocolError; 7] = [
    ProtocolError::Endpoint,
    ProtocolError::RequestFailed,
    ProtocolError::BadRoute,
    ProtocolError::BadMethod,
    ProtocolError::BadRequest,
    ProtocolError::BadResponse,
    ProtocolError::ServerPanic,
];

impl ProtocolError {
    pub const fn kind(self) -> &'static ErrorKind {
        match self {
            ProtocolError::Endpoint => &ENDPOINT,
            ProtocolError::RequestFailed => &REQUEST_FAILED,
            ProtocolError::BadRoute => &BAD_ROUTE,
            ProtocolError::BadMethod => &BAD_METHOD,
            ProtocolError::BadRequest => &BAD_REQUEST,
            ProtocolError::BadResponse => &BAD_RESPONSE,
            ProtocolError::ServerPanic => &SERVER_PANIC,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        PROTOCOL_KINDS.into_iter().find(|p| p.kind().code == code)
    }

    /// HTTP status used by hosts when the kind itself carries status 0.
    pub const fn fallback_status(self) -> u16 {
        match self {
            ProtocolError::Endpoint => 400,
            ProtocolError::RequestFailed => 400,
            ProtocolError::BadRoute => 404,
            ProtocolError::BadMethod => 405,
            ProtocolError::BadRequest => 400,
            ProtocolError::BadResponse => 500,
            ProtocolError::ServerPanic => 500,
        }
    }
}

/// Table construction errors (raised at startup, never per request)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Duplicate error code {code} ({first} and {second})")]
    DuplicateCode {
        code: i32,
        first: &'static str,
        second: &'static str,
    },

    #[error("Duplicate error name {name} (codes {first} and {second})")]
    DuplicateName {
        name: &'static str,
        first: i32,
        second: i32,
    },

    #[error("Schema error {name} uses reserved code {code} (schema codes must be >= 1)")]
    ReservedCode { code: i32, name: &'static str },
}

/// Lookup table over protocol-reserved and schema-defined kinds.
///
/// Built once at startup; code -> kind and name -> kind are both unique.
#[derive(Debug, Clone)]
pub struct ErrorTable {
    by_code: HashMap<i32, &'static ErrorKind>,
    by_name: HashMap<&'static str, &'static ErrorKind>,
}

impl ErrorTable {
    /// Build a table from the schema's error kinds.
    pub fn new(schema: &'static [ErrorKind]) -> Result<Self, TableError> {
        let mut by_code: HashMap<i32, &'static ErrorKind> = HashMap::new();
        let mut by_name: HashMap<&'static str, &'static ErrorKind> = HashMap::new();

        let reserved = PROTOCOL_KINDS.iter().map(|p| p.kind());
        for kind in reserved.chain(schema.iter()) {
            if let Some(existing) = by_code.insert(kind.code, kind) {
                return Err(TableError::DuplicateCode {
                    code: kind.code,
                    first: existing.name,
                    second: kind.name,
                });
            }
            if let Some(existing) = by_name.insert(kind.name, kind) {
                return Err(TableError::DuplicateName {
                    name: kind.name,
                    first: existing.code,
                    second: kind.code,
                });
            }
        }

        if let Some(kind) = schema.iter().find(|k| k.code < 1) {
            return Err(TableError::ReservedCode {
                code: kind.code,
                name: kind.name,
            });
        }

        Ok(Self {
            by_code,
            by_name,
        })
    }

    /// Table with only the protocol-reserved kinds.
    pub fn protocol_only() -> Self {
        let mut by_code = HashMap::new();
        let mut by_name = HashMap::new();
        for kind in PROTOCOL_KINDS.iter().map(|p| p.kind()) {
            by_code.insert(kind.code, kind);
            by_name.insert(kind.name, kind);
        }
        Self {
            by_code,
            by_name,
        }
    }

    pub fn by_code(&self, code: i32) -> Option<&'static ErrorKind> {
        self.by_code.get(&code).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&'static ErrorKind> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl Default for ErrorTable {
    fn default() -> Self {
        Self::protocol_only()
    }
}
