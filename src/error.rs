/******************************************************************************
   Project: edupredict-client
   Date: 16/10/26
******************************************************************************/

use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::{fmt, io};

/// A failed API call, normalized into one shape.
///
/// `status == 0` means no HTTP response was received at all (connection
/// refused, DNS failure, timeout). Any other value is the status code the
/// server answered with. `detail` keeps the decoded body (or the raw text when
/// it was not JSON) for callers that need more than the message.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub detail: Value,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16, detail: Value) -> Self {
        Self {
            message: message.into(),
            status,
            detail,
        }
    }

    pub fn is_network(&self) -> bool {
        self.status == 0
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug)]
pub enum AppError {
    Api(ApiError),
    NoRefreshToken,
    Config(String),
    Json(serde_json::Error),
    Io(io::Error),
    InvalidRequest(String),
}

impl AppError {
    /// HTTP status of the failure, `Some(0)` for transport failures, `None`
    /// for errors that never reached the network layer.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            AppError::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "{e}"),
            AppError::NoRefreshToken => write!(f, "No refresh token available"),
            AppError::Config(msg) => write!(f, "configuration error: {msg}"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
            AppError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Api(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError::Api(e)
    }
}
impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}
impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e)
    }
}

#[cfg(test)]
mod tests_error {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_api_error_displays_message_only() {
        let err = ApiError::new("no model", 503, json!({"detail": "no model"}));
        assert_eq!(err.to_string(), "no model");
        assert!(!err.is_network());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_app_error_status() {
        let api: AppError = ApiError::new("Request failed: 401", 401, Value::Null).into();
        assert_eq!(api.status(), Some(401));
        assert!(api.is_unauthorized());

        let network: AppError = ApiError::new("offline", 0, Value::Null).into();
        assert_eq!(network.status(), Some(0));
        assert!(network.as_api().unwrap().is_network());

        assert_eq!(AppError::NoRefreshToken.status(), None);
        assert!(!AppError::NoRefreshToken.is_unauthorized());
    }

    #[test]
    fn test_session_absent_message() {
        assert_eq!(
            AppError::NoRefreshToken.to_string(),
            "No refresh token available"
        );
    }
}
