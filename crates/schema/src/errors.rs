// Example schema error kinds

use std::sync::OnceLock;
use webrpc_core::domain::TableError;
use webrpc_core::{ErrorKind, ErrorTable};

pub const UNAUTHORIZED: ErrorKind = ErrorKind::new(1, "Unauthorized", "unauthorized", 401);
pub const EXPIRED_TOKEN: ErrorKind = ErrorKind::new(2, "ExpiredToken", "expired token", 401);
pub const INVALID_TOKEN: ErrorKind = ErrorKind::new(3, "InvalidToken", "invalid token", 401);
pub const DEACTIVATED: ErrorKind = ErrorKind::new(4, "Deactivated", "account deactivated", 403);
pub const CONFIRM_ACCOUNT: ErrorKind =
    ErrorKind::new(5, "ConfirmAccount", "confirm your email", 403);
pub const ACCESS_DENIED: ErrorKind = ErrorKind::new(6, "AccessDenied", "access denied", 403);
pub const MISSING_ARGUMENT: ErrorKind =
    ErrorKind::new(7, "MissingArgument", "missing argument", 400);
pub const UNEXPECTED_VALUE: ErrorKind =
    ErrorKind::new(8, "UnexpectedValue", "unexpected value", 400);
pub const RATE_LIMITED: ErrorKind = ErrorKind::new(100, "RateLimited", "too many requests", 429);
pub const DATABASE_DOWN: ErrorKind = ErrorKind::new(101, "DatabaseDown", "service outage", 503);
pub const ELASTIC_DOWN: ErrorKind = ErrorKind::new(102, "ElasticDown", "search is degraded", 503);
pub const NOT_IMPLEMENTED: ErrorKind =
    ErrorKind::new(103, "NotImplemented", "not implemented", 501);
pub const USER_NOT_FOUND: ErrorKind = ErrorKind::new(200, "UserNotFound", "user not found", 400);
pub const USER_BUSY: ErrorKind = ErrorKind::new(201, "UserBusy", "user busy", 400);
pub const INVALID_USERNAME: ErrorKind =
    ErrorKind::new(202, "InvalidUsername", "invalid username", 400);
pub const FILE_TOO_BIG: ErrorKind =
    ErrorKind::new(300, "FileTooBig", "file is too big (max 1GB)", 400);
pub const FILE_INFECTED: ErrorKind = ErrorKind::new(301, "FileInfected", "file is infected", 400);
pub const FILE_TYPE: ErrorKind = ErrorKind::new(302, "FileType", "unsupported file type", 400);

pub static SCHEMA_ERRORS: [ErrorKind; 18] = [
    UNAUTHORIZED,
    EXPIRED_TOKEN,
    INVALID_TOKEN,
    DEACTIVATED,
    CONFIRM_ACCOUNT,
    ACCESS_DENIED,
    MISSING_ARGUMENT,
    UNEXPECTED_VALUE,
    RATE_LIMITED,
    DATABASE_DOWN,
    ELASTIC_DOWN,
    NOT_IMPLEMENTED,
    USER_NOT_FOUND,
    USER_BUSY,
    INVALID_USERNAME,
    FILE_TOO_BIG,
    FILE_INFECTED,
    FILE_TYPE,
];

static TABLE: OnceLock<Result<ErrorTable, TableError>> = OnceLock::new();

/// Protocol plus schema error table, validated on first use.
pub fn error_table() -> Result<&'static ErrorTable, TableError> {
    TABLE
        .get_or_init(|| ErrorTable::new(&SCHEMA_ERRORS))
        .as_ref()
        .map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use webrpc_core::{ErrorClass, ErrorPayload, WebrpcError};

    #[test]
    fn test_table_is_valid() {
        let table = error_table().unwrap();
        assert_eq!(table.len(), 7 + SCHEMA_ERRORS.len());
        assert_eq!(table.by_name("FileTooBig").unwrap().code, 300);
    }

    #[test]
    fn test_every_schema_error_round_trips() {
        let table = error_table().unwrap();
        for kind in SCHEMA_ERRORS.iter() {
            let err = WebrpcError::schema(kind).with_cause("because");
            let back = WebrpcError::from_payload(ErrorPayload::from(&err), table);
            assert_eq!(back, err);
            assert_eq!(back.class, ErrorClass::Schema(kind));
            assert_eq!(back.http_status(), kind.status);
        }
    }

    #[test]
    fn test_schema_error_from_body() {
        let body = r#"{"code":302,"name":"FileType","message":"unsupported file type","status":400,"cause":".wav is not supported"}"#;
        let err = WebrpcError::from_response_body(400, body, error_table().unwrap());
        assert!(err.is(&FILE_TYPE));
        assert_eq!(err.cause.as_deref(), Some(".wav is not supported"));
    }
}
