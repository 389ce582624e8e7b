use crate::error::DeliveryError;
use crate::record::LogRecord;
use crate::sink::LogSink;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Fire-and-forget delivery of [`LogRecord`]s to a [`LogSink`].
///
/// Every call to [`Dispatcher::send`] spawns its own detached task, so the
/// request that produced the record never waits on network I/O. Delivery
/// failures are logged locally and dropped.
#[derive(Clone)]
pub struct Dispatcher {
    sink: Arc<dyn LogSink>,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Spawn delivery of `record` on the current tokio runtime.
    ///
    /// **Returns**
    /// - `Some(handle)` for the spawned task. Callers on the request path
    ///   drop it; it exists so tests can wait for delivery.
    /// - `None` if there is no runtime to spawn on, in which case the record
    ///   is dropped with a warning.
    pub fn send(&self, record: LogRecord) -> Option<JoinHandle<()>> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "no tokio runtime available, dropping error record");
                return None;
            }
        };

        let sink = Arc::clone(&self.sink);
        Some(handle.spawn(async move {
            deliver(&*sink, &record).await;
        }))
    }

    /// Deliver `record` on the current task and log the outcome.
    pub async fn deliver(&self, record: &LogRecord) {
        deliver(&*self.sink, record).await;
    }
}

async fn deliver(sink: &dyn LogSink, record: &LogRecord) {
    info!(
        app_id = %record.app_id,
        stream_id = %record.stream_id,
        "dispatching error record"
    );

    match sink.send(record).await {
        Ok(()) => {}
        Err(DeliveryError::UnexpectedStatus(status)) => {
            warn!(status, "ingest endpoint returned unexpected status");
        }
        Err(e) => {
            error!(error = %e, "error record was not delivered");
        }
    }
}
