//! Tracing subscriber installation for hosts embedding the backbone.
//!
//! The library only emits `tracing` events. Binaries and test harnesses call
//! [`try_init_tracing`] once at startup to print them.

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
};

/// Environment variable consulted for the log filter.
pub const LOG_FILTER_ENV: &str = "RUST_LOG";

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("invalid log filter '{filter}': {source}")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Parser error.
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error(transparent)]
    AlreadyInstalled(#[from] TryInitError),
}

/// Installs a formatted subscriber filtered by `RUST_LOG`.
///
/// `default_filter` applies when `RUST_LOG` is unset or empty, for example
/// `"info"` or `"corebank_backbone=debug"`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the effective directive
/// cannot be parsed, or [`TelemetryError::AlreadyInstalled`] when another
/// global subscriber is already set.
pub fn try_init_tracing(default_filter: &str) -> Result<(), TelemetryError> {
    let from_env = std::env::var(LOG_FILTER_ENV).ok();
    let filter = build_filter(from_env.as_deref(), default_filter)?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()?;
    Ok(())
}

fn build_filter(from_env: Option<&str>, default_filter: &str) -> Result<EnvFilter, TelemetryError> {
    let directive = from_env
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default_filter);
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::InvalidFilter {
        filter: directive.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "info")]
    #[case(Some(""), "info")]
    #[case(Some("  "), "warn")]
    #[case(Some("corebank_backbone=debug"), "info")]
    fn effective_filter_prefers_a_non_empty_environment_value(
        #[case] from_env: Option<&str>,
        #[case] default_filter: &str,
    ) {
        assert!(build_filter(from_env, default_filter).is_ok());
    }

    #[rstest]
    fn invalid_directive_is_reported() {
        let result = build_filter(Some("corebank_backbone=loud"), "info");

        match result {
            Err(TelemetryError::InvalidFilter { filter, .. }) => {
                assert_eq!(filter, "corebank_backbone=loud");
            }
            other => panic!("expected invalid filter error, got {other:?}"),
        }
    }
}
