// Error types for the supplier client
use thiserror::Error;

use crate::booking::RATE_UNAVAILABLE_MESSAGE;
use crate::supplier::STALE_RATE_ERRORS;

// Coarse failure category, used by callers to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotConfigured,
    InvalidRequest,
    Network,
    SupplierRejected,
    InvalidResponse,
}

/// Failure of a single supplier operation.
///
/// Constructed per failed call and handed back to the caller; nothing inside
/// the client retries or downgrades it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SupplierError {
    #[error("Supplier client not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Supplier rejected request: {message}")]
    SupplierRejected {
        status_code: Option<u16>,
        message: String,
    },

    #[error("Invalid supplier response: {0}")]
    InvalidResponse(String),
}

impl SupplierError {
    pub fn not_configured() -> Self {
        SupplierError::NotConfigured("SUPPLIER_API_KEY and SUPPLIER_KEY_ID must be set".to_string())
    }

    pub fn rejected(status_code: Option<u16>, message: impl Into<String>) -> Self {
        SupplierError::SupplierRejected {
            status_code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SupplierError::NotConfigured(_) => ErrorKind::NotConfigured,
            SupplierError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            SupplierError::Network(_) | SupplierError::Timeout(_) => ErrorKind::Network,
            SupplierError::SupplierRejected { .. } => ErrorKind::SupplierRejected,
            SupplierError::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }

    // HTTP status the supplier answered with, if the failure came from a response
    pub fn http_status(&self) -> Option<u16> {
        match self {
            SupplierError::SupplierRejected { status_code, .. } => *status_code,
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SupplierError::NotConfigured(msg)
            | SupplierError::InvalidRequest(msg)
            | SupplierError::Network(msg)
            | SupplierError::InvalidResponse(msg) => msg.clone(),
            SupplierError::Timeout(ms) => format!("request timed out after {}ms", ms),
            SupplierError::SupplierRejected { message, .. } => message.clone(),
        }
    }

    /// Status code the route layer should answer with.
    ///
    /// Credential and server-side failures on the supplier end are reported
    /// as a bad gateway; a 404 and other client errors are passed through;
    /// a business-level decline inside a 2xx body becomes a conflict.
    pub fn status_code(&self) -> u16 {
        match self {
            SupplierError::NotConfigured(_) => 503,
            SupplierError::InvalidRequest(_) => 400,
            SupplierError::Network(_) => 502,
            SupplierError::Timeout(_) => 504,
            SupplierError::SupplierRejected { status_code, .. } => match status_code {
                None => 409,
                Some(401) | Some(403) => 502,
                Some(code) if (400..500).contains(code) => *code,
                Some(_) => 502,
            },
            SupplierError::InvalidResponse(_) => 502,
        }
    }

    // A decline that means the rate was taken or repriced since the search
    pub fn is_stale_rate(&self) -> bool {
        match self {
            SupplierError::SupplierRejected {
                status_code: Some(409),
                ..
            } => true,
            SupplierError::SupplierRejected {
                status_code: None,
                message,
            } => {
                message == RATE_UNAVAILABLE_MESSAGE
                    || STALE_RATE_ERRORS.contains(&message.as_str())
            }
            _ => false,
        }
    }

    // Text suitable for showing to an end user; follows status_code()
    pub fn user_message(&self) -> &'static str {
        if self.is_stale_rate() {
            return "This rate is no longer available, please search again.";
        }
        match self.status_code() {
            503 => "Hotel booking is temporarily unavailable.",
            404 => "We could not find what you were looking for.",
            code if (400..500).contains(&code) && code != 409 => {
                "Please check the details you entered and try again."
            }
            _ => "Something went wrong, please try again later.",
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(SupplierError::not_configured(), ErrorKind::NotConfigured, 503; "not configured")]
    #[test_case(SupplierError::InvalidRequest("x".into()), ErrorKind::InvalidRequest, 400; "invalid request")]
    #[test_case(SupplierError::Network("reset".into()), ErrorKind::Network, 502; "network")]
    #[test_case(SupplierError::Timeout(30_000), ErrorKind::Network, 504; "timeout")]
    #[test_case(SupplierError::rejected(None, "rate_not_found"), ErrorKind::SupplierRejected, 409; "declined in body")]
    #[test_case(SupplierError::rejected(Some(404), "hotel h1 not found"), ErrorKind::SupplierRejected, 404; "not found")]
    #[test_case(SupplierError::rejected(Some(422), "bad guests"), ErrorKind::SupplierRejected, 422; "client error")]
    #[test_case(SupplierError::rejected(Some(401), "unauthorized"), ErrorKind::SupplierRejected, 502; "bad credentials")]
    #[test_case(SupplierError::rejected(Some(500), "boom"), ErrorKind::SupplierRejected, 502; "server error")]
    #[test_case(SupplierError::InvalidResponse("missing data".into()), ErrorKind::InvalidResponse, 502; "invalid response")]
    fn test_kind_and_status_code(error: SupplierError, kind: ErrorKind, status: u16) {
        assert_eq!(error.kind(), kind);
        assert_eq!(error.status_code(), status);
    }

    #[test]
    fn test_http_status_only_for_rejections() {
        assert_eq!(SupplierError::rejected(Some(409), "stale").http_status(), Some(409));
        assert_eq!(SupplierError::Timeout(10).http_status(), None);
        assert_eq!(SupplierError::Network("dns".into()).http_status(), None);
    }

    const UNAVAILABLE: &str = "Hotel booking is temporarily unavailable.";
    const STALE: &str = "This rate is no longer available, please search again.";
    const CHECK_DETAILS: &str = "Please check the details you entered and try again.";
    const NOT_FOUND: &str = "We could not find what you were looking for.";
    const TRY_LATER: &str = "Something went wrong, please try again later.";

    #[test_case(SupplierError::not_configured(), UNAVAILABLE; "not configured")]
    #[test_case(SupplierError::InvalidRequest("x".into()), CHECK_DETAILS; "invalid request")]
    #[test_case(SupplierError::rejected(None, "rate_not_found"), STALE; "stale code in body")]
    #[test_case(SupplierError::rejected(None, "sold_out"), STALE; "sold out in body")]
    #[test_case(SupplierError::rejected(None, RATE_UNAVAILABLE_MESSAGE), STALE; "stale before booking")]
    #[test_case(SupplierError::rejected(Some(409), "conflict"), STALE; "conflict status")]
    #[test_case(SupplierError::rejected(None, "invalid_params"), TRY_LATER; "other decline in body")]
    #[test_case(SupplierError::rejected(Some(401), "unauthorized"), TRY_LATER; "bad credentials")]
    #[test_case(SupplierError::rejected(Some(403), "forbidden"), TRY_LATER; "forbidden")]
    #[test_case(SupplierError::rejected(Some(400), "invalid_params"), CHECK_DETAILS; "bad request")]
    #[test_case(SupplierError::rejected(Some(422), "bad guests"), CHECK_DETAILS; "unprocessable")]
    #[test_case(SupplierError::rejected(Some(404), "hotel h1 not found"), NOT_FOUND; "not found")]
    #[test_case(SupplierError::rejected(Some(503), "maintenance"), TRY_LATER; "supplier down")]
    #[test_case(SupplierError::Timeout(100), TRY_LATER; "timeout")]
    #[test_case(SupplierError::InvalidResponse("bad json".into()), TRY_LATER; "invalid response")]
    fn test_user_messages(error: SupplierError, expected: &str) {
        assert_eq!(error.user_message(), expected);
    }

    #[test]
    fn test_display_carries_message() {
        let error = SupplierError::rejected(Some(500), "internal error");
        assert_eq!(error.to_string(), "Supplier rejected request: internal error");
        assert_eq!(error.message(), "internal error");
        assert_eq!(SupplierError::Timeout(250).message(), "request timed out after 250ms");
    }
}
