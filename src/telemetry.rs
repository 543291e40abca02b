//! Logging setup
//!
//! Installs a `tracing-subscriber` registry. `RUST_LOG` wins over the
//! configured level. Output goes to stderr so stdout stays free for charts.

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::LoggingConfig;

/// Filter directive for a configured level
fn default_directive(level: &str) -> String {
    format!("sentiment_dashboard={}", level.trim().to_lowercase())
}

/// True when the config asks for JSON lines
fn wants_json(config: &LoggingConfig) -> bool {
    config.format.eq_ignore_ascii_case("json")
}

/// Subscriber used before the configured one is installed
fn bootstrap_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
}

/// Run `f` with warnings going to stderr.
///
/// Config loading happens before [`init`], so its warnings would
/// otherwise be dropped.
pub fn with_bootstrap<T>(f: impl FnOnce() -> T) -> T {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive("warn")));
    let subscriber = bootstrap_subscriber(filter, std::io::stderr);
    tracing::subscriber::with_default(subscriber, f)
}

/// Initialize the global subscriber
pub fn init(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.level)));

    let (pretty, json) = if wants_json(config) {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()
}
