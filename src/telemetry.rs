use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log level/filter '{value}'")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Filter precedence: RUST_LOG, then `--verbose` (debug), then the config level.
pub fn resolve_filter(verbose: bool, config_level: &str) -> Result<EnvFilter, TelemetryError> {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok(), verbose, config_level)
}

/// An unparsable `rust_log` is skipped in favour of the next source.
fn filter_from(
    rust_log: Option<String>,
    verbose: bool,
    config_level: &str,
) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = rust_log.and_then(|value| EnvFilter::try_new(value).ok()) {
        return Ok(filter);
    }
    let value = if verbose { "debug" } else { config_level };
    EnvFilter::try_new(value).map_err(|source| TelemetryError::EnvFilter {
        value: value.to_string(),
        source,
    })
}

/// Install the stderr subscriber. Stdout is reserved for command output.
pub fn init(verbose: bool, config_level: &str) -> Result<(), TelemetryError> {
    let env_filter = resolve_filter(verbose, config_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
