//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting version prefixes and names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address: {0}")]
    BindAddress(String),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(String),

    #[error("at least one version must be configured")]
    NoVersions,

    #[error("version {name}: prefix {prefix:?} must start with '/' and not end with '/'")]
    MalformedPrefix { name: String, prefix: String },

    #[error("duplicate version prefix: {0}")]
    DuplicatePrefix(String),

    #[error("duplicate version name: {0}")]
    DuplicateName(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.versions.is_empty() {
        errors.push(ValidationError::NoVersions);
    }

    let mut prefixes = HashSet::new();
    let mut names = HashSet::new();
    for version in config.versions.iter() {
        let prefix = version.prefix.as_str();
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            errors.push(ValidationError::MalformedPrefix {
                name: version.name.clone(),
                prefix: version.prefix.clone(),
            });
        }
        if !prefixes.insert(prefix) {
            errors.push(ValidationError::DuplicatePrefix(version.prefix.clone()));
        }
        if !names.insert(version.name.as_str()) {
            errors.push(ValidationError::DuplicateName(version.name.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
