//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal
//! - `PORT` overrides only the port of the configured bind address

use std::net::SocketAddr;
use std::path::Path;

use crate::config::validation::validate_config;
use crate::config::{load_config, ConfigError, ServiceConfig};

/// Resolve the effective configuration.
///
/// Loads `path` when given (defaults otherwise), applies the `port` override
/// and validates the result.
pub fn resolve_config(path: Option<&Path>, port: Option<&str>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(raw) = port {
        apply_port_override(&mut config, raw)?;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_port_override(config: &mut ServiceConfig, raw: &str) -> Result<(), ConfigError> {
    let port: u16 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;

    // A malformed bind address is left for validation to report.
    if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }
    Ok(())
}
