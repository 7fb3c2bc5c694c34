//! Tracing setup. The terminal belongs to the kiosk UI, so events go to a log
//! file in the data directory instead of stdout.

use anyhow::{anyhow, Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Install the global subscriber. Keep the returned guard alive for the whole
/// process; dropping it flushes and stops the writer thread.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    std::fs::create_dir_all(config.log_dir()).context("failed to create data directory")?;

    let appender = tracing_appender::rolling::never(config.log_dir(), config.log_file_name());
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = build_filter(
        std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        &config.log_level,
    )?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    Ok(guard)
}

/// `RUST_LOG` wins over the configured level when it is set, and a malformed
/// value is an error rather than a silent fallback.
fn build_filter(from_env: Option<&str>, fallback: &str) -> Result<EnvFilter> {
    match from_env {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {} filter {directives:?}", EnvFilter::DEFAULT_ENV)),
        None => EnvFilter::try_new(fallback)
            .with_context(|| format!("invalid log level {fallback:?}")),
    }
}
