//! # Logging
//!
//! All output goes through `tracing`. The subscriber is a registry with:
//!
//! - an [`EnvFilter`] read from `RUST_LOG` (default `info`)
//! - a `fmt` layer with thread ids, file/line locations and local RFC 3339
//!   timestamps, rendered either pretty or as JSON lines
//!
//! Per-request spans come from `tower_http::trace::TraceLayer` on the router.

use tracing_subscriber::{
    EnvFilter, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::server::config::LogFormat;

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    let layer = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_line_number(true)
        .with_target(false)
        .with_timer(ChronoLocal::rfc_3339())
        .with_file(true);

    match format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init()?,
        LogFormat::Json => registry.with(layer.json()).try_init()?,
    }

    Ok(())
}
