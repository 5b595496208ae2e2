use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ConfigError, LogFormat, LogLevel};

/// Default filter directives for the agent.
///
/// The configured level applies to the agent's own crates; the AMQP and
/// MongoDB driver internals are pinned to `warn` so an `info` or `debug`
/// run is not flooded with connection chatter.
fn default_directives(level: LogLevel) -> String {
    format!("{level},lapin=warn,mongodb=warn")
}

/// Initialize structured logging to stdout.
///
/// - `LogFormat::Json`: flattened JSON lines for log aggregators.
/// - `LogFormat::Text`: human-readable colored output (the default).
///
/// A `RUST_LOG` value replaces the whole directive list; otherwise the
/// filter falls back to [`default_directives`] at the given `level`.
/// Must be called exactly once at startup.
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<(), ConfigError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(false),
            )
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().pretty().with_target(true).with_ansi(true))
            .init(),
    }

    Ok(())
}
