//! Environment variable names for wiring a reporter from a service's
//! `main`.
//!
//! These are purely helpers; the reporter itself only takes the two
//! identifiers as constructor arguments.

/// Application identifier sent as `appId`.
pub const LOGBUNNY_APP_ID_ENV: &str = "LOGBUNNY_APP_ID";

/// Log stream identifier sent as `streamId`.
pub const LOGBUNNY_STREAM_ID_ENV: &str = "LOGBUNNY_STREAM_ID";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
