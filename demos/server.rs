use axum::http::StatusCode;
use axum::{middleware, routing::get, Router};
use logbunny::env::{env_or, LOGBUNNY_APP_ID_ENV, LOGBUNNY_STREAM_ID_ENV};
use logbunny::error::HandlerError;
use logbunny::init::init_tracing;
use logbunny::middleware::report_errors;
use logbunny::reporter::ErrorReporter;
use tracing::info;

async fn hello() -> &'static str {
    "Hello, World!"
}

async fn missing_user() -> Result<String, HandlerError> {
    Err(HandlerError::new("user not found").with_status(StatusCode::NOT_FOUND))
}

async fn unavailable() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance")
}

async fn crash() -> &'static str {
    panic!("disk full")
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = init_tracing() {
        eprintln!("tracing already initialised: {}", e);
    }

    let reporter = ErrorReporter::new(
        env_or(LOGBUNNY_APP_ID_ENV, "2345"),
        env_or(LOGBUNNY_STREAM_ID_ENV, "12345"),
    );

    let app = Router::new()
        .route("/", get(hello))
        .route("/users/missing", get(missing_user))
        .route("/unavailable", get(unavailable))
        .route("/crash", get(crash))
        .layer(middleware::from_fn_with_state(reporter, report_errors));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}
