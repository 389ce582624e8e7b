use crate::dispatcher::Dispatcher;
use crate::error::{HandlerError, RequestFault};
use crate::ingest::IngestSink;
use crate::record::LogRecord;
use crate::sink::LogSink;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::any::Any;
use std::error::Error;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::error;

/// Message recorded when a panic payload is neither a string nor an error.
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Body returned to the client after a panic.
pub const INTERNAL_SERVER_ERROR_BODY: &str = "Internal Server Error";

/// Turns request failures into [`LogRecord`]s and dispatches them.
///
/// Cheap to clone; clones share the same dispatcher and identifiers, so a
/// single reporter can be handed to axum as middleware state.
#[derive(Clone)]
pub struct ErrorReporter {
    app_id: Arc<str>,
    stream_id: Arc<str>,
    dispatcher: Dispatcher,
}

impl ErrorReporter {
    /// Reporter shipping records to the ingestion endpoint.
    pub fn new(app_id: impl Into<String>, stream_id: impl Into<String>) -> Self {
        Self::with_sink(app_id, stream_id, Arc::new(IngestSink::default()))
    }

    /// Reporter shipping records to a custom [`LogSink`].
    pub fn with_sink(
        app_id: impl Into<String>,
        stream_id: impl Into<String>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            app_id: Arc::from(app_id.into()),
            stream_id: Arc::from(stream_id.into()),
            dispatcher: Dispatcher::new(sink),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    /// Log `fault` locally and dispatch a record for it.
    ///
    /// The returned handle is only useful to tests; the request path drops
    /// it without awaiting.
    pub fn report(&self, path: Option<&str>, fault: &RequestFault) -> Option<JoinHandle<()>> {
        let status = fault.status().as_u16();
        let message = fault.message();

        match fault {
            RequestFault::Panic(_) => {
                error!(path, status, error = %message, "recovered from panic while handling request");
            }
            _ => {
                error!(path, status, error = %message, "request failed");
            }
        }

        let record = LogRecord::error(&self.app_id, &self.stream_id, &message, status, path);
        self.dispatcher.send(record)
    }

    /// Error-handler hook: report an error returned by a handler and build
    /// the response the client sees.
    ///
    /// The response carries the error's preset status (or 500) and the body
    /// `{"error": "<message>"}`.
    pub fn handle_error(&self, path: &str, err: HandlerError) -> Response {
        let response = err.to_response();
        self.report(Some(path), &RequestFault::Returned(err));
        response
    }

    /// Report a panic caught while handling `path` and return the generic
    /// `500` response that replaces whatever the handler would have sent.
    pub fn recover_panic(&self, path: &str, payload: &(dyn Any + Send)) -> Response {
        let message = panic_message(payload);
        self.report(Some(path), &RequestFault::Panic(message));
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": INTERNAL_SERVER_ERROR_BODY })),
        )
            .into_response()
    }

    /// Inspect a response produced without panicking.
    ///
    /// A response tagged with a [`HandlerError`] already carries the error
    /// status and body; the tag is stripped and the error reported. Any
    /// other response with a status of 400 or above is reported as a bare
    /// failure status. Either way the response goes back unchanged, headers
    /// and extensions from inner layers included.
    pub fn inspect_response(&self, path: &str, mut response: Response) -> Response {
        if let Some(err) = response.extensions_mut().remove::<HandlerError>() {
            self.report(Some(path), &RequestFault::Returned(err));
            return response;
        }

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            self.report(Some(path), &RequestFault::Status(status));
        }
        response
    }
}

/// Classify a panic payload into the message recorded under `data.error`.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    if let Some(e) = payload.downcast_ref::<Box<dyn Error + Send + Sync>>() {
        return e.to_string();
    }
    if let Some(e) = payload.downcast_ref::<Box<dyn Error + Send>>() {
        return e.to_string();
    }
    if let Some(e) = payload.downcast_ref::<HandlerError>() {
        return e.to_string();
    }
    if let Some(e) = payload.downcast_ref::<std::io::Error>() {
        return e.to_string();
    }
    UNKNOWN_ERROR.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use tokio::sync::mpsc;

    struct ChannelSink {
        tx: mpsc::UnboundedSender<LogRecord>,
    }

    #[async_trait]
    impl LogSink for ChannelSink {
        async fn send(&self, record: &LogRecord) -> Result<(), DeliveryError> {
            let _ = self.tx.send(record.clone());
            Ok(())
        }
    }

    fn reporter() -> (ErrorReporter, mpsc::UnboundedReceiver<LogRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let reporter = ErrorReporter::with_sink("2345", "12345", Arc::new(ChannelSink { tx }));
        (reporter, rx)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_panic_message_static_str() {
        let payload: Box<dyn Any + Send> = Box::new("disk full");
        assert_eq!(panic_message(payload.as_ref()), "disk full");
    }

    #[test]
    fn test_panic_message_string() {
        let payload: Box<dyn Any + Send> = Box::new(format!("disk {}", "full"));
        assert_eq!(panic_message(payload.as_ref()), "disk full");
    }

    #[test]
    fn test_panic_message_error() {
        let err: Box<dyn Error + Send + Sync> = "socket closed".into();
        let payload: Box<dyn Any + Send> = Box::new(err);
        assert_eq!(panic_message(payload.as_ref()), "socket closed");

        let io = std::io::Error::new(std::io::ErrorKind::Other, "read failed");
        let payload: Box<dyn Any + Send> = Box::new(io);
        assert_eq!(panic_message(payload.as_ref()), "read failed");
    }

    #[test]
    fn test_panic_message_unknown() {
        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(payload.as_ref()), "unknown error");
    }

    #[test]
    fn test_panic_message_from_catch_unwind() {
        let payload = std::panic::catch_unwind(|| {
            panic!("worker {} died", 3);
        })
        .unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "worker 3 died");
    }

    #[tokio::test]
    async fn test_recover_panic_returns_generic_500() {
        let (reporter, mut rx) = reporter();
        let payload: Box<dyn Any + Send> = Box::new("disk full");

        let response = reporter.recover_panic("/upload", payload.as_ref());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Internal Server Error" })
        );

        let record = rx.recv().await.unwrap();
        assert_eq!(record.message(), Some("disk full"));
        assert_eq!(record.status(), Some(500));
        assert_eq!(record.data["path"], "/upload");
        assert_eq!(record.app_id, "2345");
        assert_eq!(record.stream_id, "12345");
    }

    #[tokio::test]
    async fn test_handle_error_echoes_message() {
        let (reporter, mut rx) = reporter();
        let err = HandlerError::new("user not found").with_status(StatusCode::NOT_FOUND);

        let response = reporter.handle_error("/users/7", err);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "user not found" })
        );

        let record = rx.recv().await.unwrap();
        assert_eq!(record.status(), Some(404));
        assert_eq!(record.message(), Some("user not found"));
    }

    #[tokio::test]
    async fn test_inspect_response_passes_failure_status_through() {
        let (reporter, mut rx) = reporter();
        let original = (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response();

        let response = reporter.inspect_response("/health", original);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"try later");

        let record = rx.recv().await.unwrap();
        assert_eq!(record.message(), Some("Service Unavailable"));
        assert_eq!(record.status(), Some(503));
    }

    #[tokio::test]
    async fn test_inspect_response_ignores_success() {
        let (reporter, mut rx) = reporter();

        let response = reporter.inspect_response("/", (StatusCode::OK, "hi").into_response());
        assert_eq!(response.status(), StatusCode::OK);

        drop(reporter);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_inspect_response_keeps_tagged_error_response() {
        let (reporter, mut rx) = reporter();
        let err = HandlerError::new("user not found").with_status(StatusCode::NOT_FOUND);
        let mut original = err.into_response();
        original
            .headers_mut()
            .insert("x-request-id", "abc".parse().unwrap());

        let response = reporter.inspect_response("/users/7", original);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-request-id"], "abc");
        assert!(response.extensions().get::<HandlerError>().is_none());
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "user not found" })
        );

        let record = rx.recv().await.unwrap();
        assert_eq!(record.status(), Some(404));
        assert_eq!(record.message(), Some("user not found"));
    }
}
