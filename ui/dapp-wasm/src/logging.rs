//! Sends `tracing` output from every crate to the browser console.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};

const DEFAULT_FILTER: &str = "info";

fn filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// `directives` uses `EnvFilter` syntax (`?log=wv_view=debug`); invalid or
/// missing directives fall back to `info`.
pub fn init(directives: Option<&str>) {
    let console = WASMLayerConfigBuilder::new()
        .set_report_logs_in_timings(false)
        .set_max_level(Level::TRACE)
        .build();

    let installed = tracing_subscriber::registry()
        .with(filter(directives))
        .with(WASMLayer::new(console))
        .try_init();

    if let Err(err) = installed {
        tracing::warn!("logging already initialised: {}", err);
    }
}
