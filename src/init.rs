use tracing::dispatcher::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Local diagnostic logging configuration.
///
/// **Fields**
/// - `level`: most verbose level printed. `INFO` and below show every
///   dispatch attempt, `ERROR` only failed requests and failed deliveries.
/// - `with_target`: include the module path of each event in the output.
#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: Level,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_target: true,
        }
    }
}

/// Install a `fmt` subscriber as the global default.
///
/// **Returns**
/// - `Err(..)` if a global subscriber was already installed; the existing
///   one stays in place.
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), SetGlobalDefaultError> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(config.with_target);
    let subscriber = Registry::default()
        .with(LevelFilter::from_level(config.level))
        .with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
}

/// Equivalent to [`init_tracing_with_config`] with [`LogConfig::default`].
pub fn init_tracing() -> Result<(), SetGlobalDefaultError> {
    init_tracing_with_config(LogConfig::default())
}
