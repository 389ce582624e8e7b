use crate::error::DeliveryError;
use crate::record::LogRecord;
use crate::sink::LogSink;
use async_trait::async_trait;

/// A sink that simply drops all records.
///
/// Useful for running the middleware without any external I/O, and for
/// tests that only care about the client-visible response.
#[derive(Clone, Default)]
pub struct NoopSink;

#[async_trait]
impl LogSink for NoopSink {
    async fn send(&self, _record: &LogRecord) -> Result<(), DeliveryError> {
        Ok(())
    }
}
