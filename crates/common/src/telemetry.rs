//! Tracing initialization for Querygate binaries and tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber: env-filtered fmt output.
///
/// Filtering follows `RUST_LOG` (e.g. `RUST_LOG=querygate_guard=debug`).
/// Safe to call once per process; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
