//! Product Gateway Library
//!
//! A thin caching proxy in front of a third-party product-catalog API.
//!
//! # Features
//!
//! - **TTL Response Cache**: in-memory, per-route durations, manual clear
//! - **Transparent Proxying**: upstream payloads replayed verbatim
//! - **Introspection**: health endpoint reporting cache size and keys
//! - **Graceful Shutdown**: Ctrl+C / SIGTERM handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod upstream;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => {
            subscriber.with(fmt::layer().json()).init();
        }
        _ => {
            subscriber.with(fmt::layer()).init();
        }
    }

    Ok(())
}
