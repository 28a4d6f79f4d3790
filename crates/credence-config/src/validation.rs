// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde attributes cannot express: unique handler
//! names, fields that only apply to some handler types, and hash formats.

use std::collections::HashSet;

use credence_core::{ComparatorKind, EvaluationMode};

use crate::diagnostic::ConfigError;
use crate::model::{CredenceConfig, HandlerConfig, HandlerType};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns every failed check, not just the first.
pub fn validate_config(config: &CredenceConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.engine.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "engine.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.engine.log_level
        )));
    }

    if config.engine.concurrent && config.engine.evaluation != EvaluationMode::Exhaustive {
        errors.push(ConfigError::validation(
            "engine.concurrent requires engine.evaluation = \"exhaustive\"",
        ));
    }

    if config.handlers.is_empty() {
        errors.push(ConfigError::validation(
            "at least one [[handlers]] entry is required",
        ));
    }

    let mut seen_names = HashSet::new();
    for (i, handler) in config.handlers.iter().enumerate() {
        if handler.name.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "handlers[{i}].name must not be empty"
            )));
        } else if !seen_names.insert(handler.name.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate handler name `{}` in [[handlers]] array",
                handler.name
            )));
        }
        validate_handler(i, handler, &mut errors);
    }

    if config.aup.attribute.trim().is_empty() {
        errors.push(ConfigError::validation("aup.attribute must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_handler(i: usize, handler: &HandlerConfig, errors: &mut Vec<ConfigError>) {
    let kind = handler.handler_type;

    if handler.timeout_ms == Some(0) {
        errors.push(ConfigError::validation(format!(
            "handlers[{i}].timeout_ms must be greater than 0"
        )));
    }

    let mut not_applicable = |field: &str, set: bool| {
        if set {
            errors.push(ConfigError::validation(format!(
                "handlers[{i}].{field} does not apply to {kind} handlers"
            )));
        }
    };
    match kind {
        HandlerType::AcceptUsers => {
            not_applicable("blocked", !handler.blocked.is_empty());
            not_applicable("allowed_services", !handler.allowed_services.is_empty());
        }
        HandlerType::RejectUsers => {
            not_applicable("users", !handler.users.is_empty());
            not_applicable("allowed_services", !handler.allowed_services.is_empty());
            not_applicable("comparator", handler.comparator != ComparatorKind::Exact);
            not_applicable("attributes", !handler.attributes.is_empty());
        }
        HandlerType::Service => {
            not_applicable("users", !handler.users.is_empty());
            not_applicable("blocked", !handler.blocked.is_empty());
            not_applicable("comparator", handler.comparator != ComparatorKind::Exact);
            not_applicable("attributes", !handler.attributes.is_empty());
        }
    }

    let required = match kind {
        HandlerType::AcceptUsers => ("users", handler.users.is_empty()),
        HandlerType::RejectUsers => ("blocked", handler.blocked.is_empty()),
        HandlerType::Service => ("allowed_services", handler.allowed_services.is_empty()),
    };
    if required.1 {
        errors.push(ConfigError::validation(format!(
            "handlers[{i}].{} must not be empty for {kind} handlers",
            required.0
        )));
    }

    if kind == HandlerType::AcceptUsers && handler.comparator == ComparatorKind::Argon2 {
        for (username, stored) in &handler.users {
            if !stored.starts_with("$argon2") {
                errors.push(ConfigError::validation(format!(
                    "handlers[{i}].users.{username} must be an Argon2 PHC string when comparator = \"argon2\""
                )));
            }
        }
    }
}
