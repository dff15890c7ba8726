//! Error body returned by every failing request.

use serde::{Deserialize, Serialize};

/// Wire shape of an error response: `{ httpCode, errorCode, message }`.
///
/// `errorCode` values are stable application codes, one per failure
/// condition, so clients and tests can dispatch on them without parsing
/// messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub http_code: u16,
    pub error_code: u16,
    pub message: String,
}

impl ErrorBody {
    pub fn new(http_code: u16, error_code: u16, message: impl Into<String>) -> Self {
        Self {
            http_code,
            error_code,
            message: message.into(),
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(401, codes::UNAUTHENTICATED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, codes::NOT_FOUND, message)
    }

    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::new(412, codes::INVALID_RANGE, message)
    }

    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::new(400, codes::INVALID_FILTER, message)
    }

    pub fn too_many_tags(message: impl Into<String>) -> Self {
        Self::new(400, codes::TOO_MANY_TAGS, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(403, codes::FORBIDDEN, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, codes::BAD_REQUEST, message)
    }

    pub fn internal() -> Self {
        Self::new(500, codes::INTERNAL, "Internal server error")
    }
}

/// Stable application error codes.
pub mod codes {
    pub const BAD_REQUEST: u16 = 101;
    pub const INTERNAL: u16 = 103;
    pub const UNAUTHENTICATED: u16 = 1001;
    pub const NOT_FOUND: u16 = 1002;
    pub const INVALID_RANGE: u16 = 1003;
    pub const INVALID_FILTER: u16 = 1004;
    pub const TOO_MANY_TAGS: u16 = 1005;
    pub const FORBIDDEN: u16 = 1006;
}
