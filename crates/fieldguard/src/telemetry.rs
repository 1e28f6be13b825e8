//! Tracing setup for host applications
//!
//! Fieldguard only emits `tracing` events. Applications without a subscriber
//! of their own can install the default one here.

use crate::{Error, Result};

/// Initialize the global tracing subscriber
///
/// Sets up:
/// - Environment filter from `RUST_LOG` (defaults to INFO level)
/// - Stderr output
///
/// # Errors
/// Returns [`Error::Telemetry`] if a global subscriber is already installed
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::Telemetry(format!("Failed to initialize tracing subscriber: {e}")))
}
