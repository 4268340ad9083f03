//! Typed API failures and their classification.
//!
//! ERROR HANDLING
//! ==============
//! Every transport or HTTP failure is classified exactly once, at the client
//! boundary, into an [`ApiError`]. Stores branch on [`ApiErrorKind`] and read
//! `server_message` when deciding what to show; they never re-inspect raw
//! responses.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::transport::TransportError;

/// Failure taxonomy shared by the HTTP client and the stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Rejected client-side before any network call.
    Validation,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    NetworkUnavailable,
    Timeout,
    /// Superseded by a duplicate request. Never surfaced to the user.
    Cancelled,
    Unknown,
}

impl ApiErrorKind {
    /// Map an HTTP status code to a kind. Callers only pass non-2xx codes.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// User-facing text used when the server gives no better message.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Validation => "Please check the form and try again",
            Self::BadRequest => "Invalid request parameters",
            Self::Unauthorized => "Session expired, please sign in again",
            Self::Forbidden => "You do not have permission to do that",
            Self::NotFound => "The requested resource does not exist",
            Self::ServerError => "Internal server error",
            Self::NetworkUnavailable => "Network connection failed, please check your network",
            Self::Timeout => "Request timed out, please try again later",
            Self::Cancelled => "Request cancelled",
            Self::Unknown => "Request failed",
        }
    }

    /// Notification title for this kind.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Validation => "Invalid input",
            Self::Unauthorized => "Signed out",
            Self::Forbidden => "Access denied",
            Self::NetworkUnavailable | Self::Timeout => "Connection problem",
            _ => "Request failed",
        }
    }
}

/// A classified API failure.
///
/// `message` is always presentable; `server_message` is only set when the
/// response body carried one.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
    pub server_message: Option<String>,
    pub cause: Option<String>,
}

impl ApiError {
    /// Build an error carrying only the kind's default message.
    #[must_use]
    pub fn new(kind: ApiErrorKind) -> Self {
        Self {
            kind,
            status: None,
            message: kind.default_message().to_owned(),
            server_message: None,
            cause: None,
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ApiErrorKind::Validation,
            status: None,
            message: message.clone(),
            server_message: None,
            cause: Some(message),
        }
    }

    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ApiErrorKind::Cancelled)
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Classify a non-2xx response.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let kind = ApiErrorKind::from_status(status);
        let server_message = extract_server_message(body);
        let message = match kind {
            ApiErrorKind::Unknown => format!("Request failed: {status}"),
            _ => kind.default_message().to_owned(),
        };
        Self {
            kind,
            status: Some(status),
            message,
            server_message,
            cause: None,
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.kind == ApiErrorKind::Cancelled
    }

    /// Text a store records as its `error`: the server's own words when
    /// present, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind {
            ApiErrorKind::Validation => self.message.clone(),
            _ => self
                .server_message
                .clone()
                .unwrap_or_else(|| fallback.to_owned()),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        let kind = match err {
            TransportError::Timeout => ApiErrorKind::Timeout,
            TransportError::Network(_) => ApiErrorKind::NetworkUnavailable,
        };
        Self::new(kind).with_cause(err.to_string())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": "..."}`, FastAPI-style `{"detail": "..."}` and
/// validation lists `{"detail": [{"msg": "..."}]}`.
#[must_use]
pub fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let text = value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .or_else(|| match value.get("detail")? {
            serde_json::Value::String(detail) => Some(detail.as_str()),
            serde_json::Value::Array(items) => items
                .first()?
                .get("msg")
                .and_then(serde_json::Value::as_str),
            _ => None,
        })?;
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_owned()) }
}
