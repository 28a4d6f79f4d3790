// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Credence authentication engine.
//!
//! TOML parsing with strict validation (`deny_unknown_fields`), XDG file
//! hierarchy lookup, environment variable overrides, and miette diagnostics
//! with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use credence_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("{} handlers", config.handlers.len());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

use tracing::{debug, warn};

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{AupConfig, CredenceConfig, EngineConfig, HandlerConfig, HandlerType};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Figment errors become diagnostics with source spans and suggestions;
/// validation errors are all reported together.
pub fn load_and_validate() -> Result<CredenceConfig, Vec<ConfigError>> {
    validated(loader::load_config(), collect_toml_sources)
}

/// Load configuration from one file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<CredenceConfig, Vec<ConfigError>> {
    if !path.exists() {
        return Err(vec![ConfigError::Other(format!(
            "config file {} does not exist",
            path.display()
        ))]);
    }
    validated(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<CredenceConfig, Vec<ConfigError>> {
    validated(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Sources are only read when extraction failed and spans are needed.
fn validated(
    loaded: Result<CredenceConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<CredenceConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| {
        let errors = diagnostic::figment_to_config_errors(err, &sources());
        warn!(errors = errors.len(), "configuration could not be parsed");
        errors
    })?;
    if let Err(errors) = validation::validate_config(&config) {
        warn!(errors = errors.len(), "configuration rejected by validation");
        return Err(errors);
    }
    debug!(
        handlers = config.handlers.len(),
        policy = %config.engine.policy,
        evaluation = %config.engine.evaluation,
        "configuration loaded"
    );
    Ok(config)
}

fn read_source(path: &Path) -> Option<(String, String)> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| (path.display().to_string(), content))
}

/// TOML source contents for error span resolution, most specific first.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path() {
        sources.extend(read_source(&path));
    }

    sources.extend(read_source(Path::new(loader::SYSTEM_CONFIG)));

    sources
}
