//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

/// Caching proxy for a product-catalog REST API
#[derive(Parser, Debug)]
#[command(name = "product-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "PRODUCT_GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PRODUCT_GATEWAY_PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "PRODUCT_GATEWAY_HOST")]
    pub host: Option<String>,

    /// Base URL of the upstream product API
    #[arg(long, env = "PRODUCT_GATEWAY_UPSTREAM")]
    pub upstream: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "PRODUCT_GATEWAY_LOG_LEVEL")]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "PRODUCT_GATEWAY_LOG_FORMAT")]
    pub log_format: Option<String>,
}
