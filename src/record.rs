use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Level attached to every record shipped by the reporter.
pub const ERROR_LEVEL: &str = "error";

/// Error event as accepted by the ingestion endpoint.
///
/// Built from plain values at the moment a failure is observed; nothing
/// in here points back at the request that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub level: String,
    pub data: BTreeMap<String, serde_json::Value>,
    pub timestamp: DateTime<Utc>,
    pub app_id: String,
    pub stream_id: String,
}

impl LogRecord {
    /// Build an `error` level record stamped with the current time.
    ///
    /// **Parameters**
    /// - `message`: human readable description, stored under `data.error`.
    /// - `status`: HTTP status code, stored under `data.status`.
    /// - `path`: request path, stored under `data.path` when known.
    pub fn error(
        app_id: &str,
        stream_id: &str,
        message: &str,
        status: u16,
        path: Option<&str>,
    ) -> Self {
        let mut data = BTreeMap::new();
        data.insert("error".to_string(), serde_json::Value::from(message));
        data.insert("status".to_string(), serde_json::Value::from(status));
        if let Some(path) = path {
            data.insert("path".to_string(), serde_json::Value::from(path));
        }

        Self {
            level: ERROR_LEVEL.to_string(),
            data,
            timestamp: Utc::now(),
            app_id: app_id.to_string(),
            stream_id: stream_id.to_string(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.data.get("error").and_then(|v| v.as_str())
    }

    pub fn status(&self) -> Option<u16> {
        self.data
            .get("status")
            .and_then(|v| v.as_u64())
            .and_then(|s| u16::try_from(s).ok())
    }
}
