//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Tier B thresholds must not be below tier A thresholds
//! - Minimum versions must be numeric
//! - Polling must fit inside the timeout
//! - The tool must be able to receive its output path

use crate::assessment::report::NumericVersion;
use crate::config::schema::FleetConfig;
use crate::error::{FleetError, Result};

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &FleetConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_profile(config));
    errors.extend(validate_invoker(config));

    if config.settings.parallelism == 0 {
        errors.push(ValidationError::new(
            "zero-parallelism",
            "settings.parallelism must be at least 1",
        ));
    }

    errors
}

fn validate_profile(config: &FleetConfig) -> Vec<ValidationError> {
    let profile = &config.profile;
    let mut errors = Vec::new();

    if profile.tier_b_memory_gb < profile.tier_a_memory_gb {
        errors.push(ValidationError::new(
            "tier-order",
            format!(
                "tier_b_memory_gb ({}) is below tier_a_memory_gb ({})",
                profile.tier_b_memory_gb, profile.tier_a_memory_gb
            ),
        ));
    }
    if profile.tier_b_disk_gb < profile.tier_a_disk_gb {
        errors.push(ValidationError::new(
            "tier-order",
            format!(
                "tier_b_disk_gb ({}) is below tier_a_disk_gb ({})",
                profile.tier_b_disk_gb, profile.tier_a_disk_gb
            ),
        ));
    }

    for (field, value) in [
        ("min_interface_version", &profile.min_interface_version),
        ("min_driver_model", &profile.min_driver_model),
    ] {
        if NumericVersion::parse(value).is_none() {
            errors.push(ValidationError::new(
                "non-numeric-version",
                format!("{} '{}' is not a numeric version", field, value),
            ));
        }
    }

    errors
}

fn validate_invoker(config: &FleetConfig) -> Vec<ValidationError> {
    let invoker = &config.invoker;
    let mut errors = Vec::new();

    if invoker.tool.trim().is_empty() {
        errors.push(ValidationError::new("empty-tool", "invoker.tool is empty"));
    }
    if !invoker.args.iter().any(|a| a.contains("{output}")) {
        errors.push(ValidationError::new(
            "missing-output-placeholder",
            "invoker.args must contain '{output}'",
        ));
    }
    if invoker.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "zero-poll-interval",
            "invoker.poll_interval_ms must be greater than zero",
        ));
    } else if invoker.poll_interval() > invoker.timeout() {
        errors.push(ValidationError::new(
            "poll-exceeds-timeout",
            format!(
                "invoker.poll_interval_ms ({}) exceeds invoker.timeout_secs ({})",
                invoker.poll_interval_ms, invoker.timeout_secs
            ),
        ));
    }

    errors
}

/// Validate and fail with the first error, if any.
pub fn validate(config: &FleetConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        let message = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Err(FleetError::ConfigValidationError { message })
    }
}
