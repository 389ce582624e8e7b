pub mod record;
pub mod error;
pub mod sink;
pub mod ingest;
pub mod dispatcher;
pub mod reporter;
pub mod middleware;

pub mod env;
pub mod init;
pub mod noop_sink;
