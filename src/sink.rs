use crate::error::DeliveryError;
use crate::record::LogRecord;
use async_trait::async_trait;

/// Asynchronous destination for [`LogRecord`]s produced by the reporter.
///
/// Implementations transport records to a concrete backend (the ingestion
/// endpoint, a test channel, nothing at all). The dispatcher calls `send`
/// from a detached background task and never awaits it on the request path.
#[async_trait]
pub trait LogSink: Send + Sync {
    /// Send a single log record to the underlying backend.
    ///
    /// **Parameters**
    /// - `record`: fully-populated [`LogRecord`] built by the reporter.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was accepted by the backend.
    /// - `Err(..)` if the backend failed (serialization, network, or an
    ///   unexpected acknowledgment). The dispatcher logs it and moves on;
    ///   there is no retry.
    async fn send(&self, record: &LogRecord) -> Result<(), DeliveryError>;
}
