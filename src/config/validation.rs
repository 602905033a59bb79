//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (non-zero intervals, parseable addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the decoded config
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ControlPlaneConfig;

/// A single semantic violation in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("source.path must not be empty")]
    EmptySourcePath,

    #[error("reconcile.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("reconcile.cluster_name_prefix must not be empty")]
    EmptyClusterNamePrefix,

    #[error("server.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("server.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Validate the decoded configuration, reporting every violation.
pub fn validate_config(config: &ControlPlaneConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.source.path.trim().is_empty() {
        errors.push(ValidationError::EmptySourcePath);
    }

    if config.reconcile.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    if config.reconcile.cluster_name_prefix.trim().is_empty() {
        errors.push(ValidationError::EmptyClusterNamePrefix);
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.server.enabled && config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.server.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&ControlPlaneConfig::default()).is_ok());
    }

    #[test]
    fn test_all_violations_reported() {
        let mut config = ControlPlaneConfig::default();
        config.source.path = " ".to_string();
        config.reconcile.interval_secs = 0;
        config.reconcile.cluster_name_prefix = String::new();
        config.server.bind_address = "not-an-address".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_disabled_server_skips_address_check() {
        let mut config = ControlPlaneConfig::default();
        config.server.enabled = false;
        config.server.bind_address = "not-an-address".to_string();

        assert!(validate_config(&config).is_ok());
    }
}
