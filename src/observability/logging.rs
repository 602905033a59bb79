//! Structured logging.
//!
//! Uses the tracing crate; `RUST_LOG` overrides the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber once at startup.
pub fn init(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("proxy_control_plane={default_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
