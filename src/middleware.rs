//! Axum integration.
//!
//! Wire the reporter in as the outermost layer so panics from every route
//! and inner middleware are caught:
//!
//! ```no_run
//! use axum::{middleware, routing::get, Router};
//! use logbunny::{middleware::report_errors, reporter::ErrorReporter};
//!
//! let reporter = ErrorReporter::new("2345", "12345");
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "Hello, World!" }))
//!     .layer(middleware::from_fn_with_state(reporter, report_errors));
//! ```

use crate::reporter::ErrorReporter;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

/// Middleware for `axum::middleware::from_fn_with_state`.
///
/// Runs the rest of the stack, recovering any panic into the generic `500`
/// response, then hands the response to
/// [`ErrorReporter::inspect_response`]. Records are dispatched in the
/// background; the response is never held back by delivery.
pub async fn report_errors(
    State(reporter): State<ErrorReporter>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => reporter.inspect_response(&path, response),
        Err(payload) => reporter.recover_panic(&path, payload.as_ref()),
    }
}
