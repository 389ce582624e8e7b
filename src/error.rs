use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::error::Error;

/// Failure to hand a [`LogRecord`](crate::record::LogRecord) to its backend.
///
/// Only ever logged by the dispatcher; it never reaches the request flow.
#[derive(thiserror::Error, Debug)]
pub enum DeliveryError {
    #[error("failed to marshal error details: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to send error details: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to send error details, status code: {0}")]
    UnexpectedStatus(u16),

    #[error("log sink failed: {0}")]
    Backend(Box<dyn Error + Send + Sync>),
}

/// Error value returned by a handler.
///
/// Carries an optional status preset by the handler; when it is absent the
/// response falls back to `500 Internal Server Error`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    status: Option<StatusCode>,
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { status: None, message: message.into() }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Wrap any error, keeping its `Display` text as the message.
    pub fn from_error(err: &dyn Error) -> Self {
        Self::new(err.to_string())
    }

    /// Status the client will see.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn to_response(&self) -> Response {
        (self.status(), Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let mut response = self.to_response();
        // Tag the response so the reporting middleware can tell an explicit
        // error apart from a plain failure status.
        response.extensions_mut().insert(self);
        response
    }
}

/// Something that went wrong while a single request was being handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFault {
    /// The handler panicked; holds the classified panic message.
    Panic(String),
    /// The handler returned an error value.
    Returned(HandlerError),
    /// The handler completed with a failure status and no error value.
    Status(StatusCode),
}

impl RequestFault {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestFault::Panic(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RequestFault::Returned(err) => err.status(),
            RequestFault::Status(status) => *status,
        }
    }

    /// Message recorded under `data.error`.
    pub fn message(&self) -> String {
        match self {
            RequestFault::Panic(message) => message.clone(),
            RequestFault::Returned(err) => err.message().to_string(),
            RequestFault::Status(status) => reason_phrase(*status),
        }
    }
}

/// Standard reason phrase for a status code, e.g. `Service Unavailable`.
pub fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unknown Status {}", status.as_u16()))
}
