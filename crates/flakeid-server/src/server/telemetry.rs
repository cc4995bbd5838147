//! Log output for the server.
//!
//! Events go to stdout through `tracing_subscriber::fmt`. The filter defaults
//! to `info` and is overridden by `RUST_LOG`, e.g.:
//!
//! ```bash
//! RUST_LOG=flakeid=trace,tower_http=debug cargo run -p flakeid-server
//! ```
//!
//! The library's generation spans are only emitted at `trace` level.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true),
        )
        .try_init()?;
    Ok(())
}
