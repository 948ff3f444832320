pub mod cli;
pub mod collector;
pub mod config;
pub mod dedup;
pub mod envelope;
pub mod image_reference;
pub mod mock_server;
pub mod pipeline;
pub mod sink;
pub mod state;

use tracing_subscriber::EnvFilter;

/// Single-line logs with timestamp, level, target and message; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();
}
