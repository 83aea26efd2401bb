//! Observability utilities.

use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::types::ObservabilityConfig;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Initialize tracing subscriber once for the process.
///
/// Filter comes from `RUST_LOG`, falling back to the configured level. Log
/// format is plain text unless `json_logs` is set or
/// `ASTRO_LOG_FORMAT=json`.
pub fn init_tracing(config: &ObservabilityConfig) {
    TRACING_INIT.get_or_init(|| {
        if let Err(err) = subscriber(config).try_init() {
            eprintln!("tracing init skipped: {err}");
        }
    });
}

fn subscriber(config: &ObservabilityConfig) -> Box<dyn Subscriber + Send + Sync> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json = config.json_logs
        || std::env::var("ASTRO_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

    if json {
        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json()),
        )
    } else {
        Box::new(
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact()),
        )
    }
}
