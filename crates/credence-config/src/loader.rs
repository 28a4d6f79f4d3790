// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./credence.toml` > `~/.config/credence/credence.toml`
//! > `/etc/credence/credence.toml` with environment variable overrides via the
//! `CREDENCE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::CredenceConfig;

pub const SYSTEM_CONFIG: &str = "/etc/credence/credence.toml";
pub const LOCAL_CONFIG: &str = "credence.toml";

/// `~/.config/credence/credence.toml`, when a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("credence/credence.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/credence/credence.toml` (system-wide)
/// 3. `~/.config/credence/credence.toml` (user XDG config)
/// 4. `./credence.toml` (local directory)
/// 5. `CREDENCE_*` environment variables
pub fn load_config() -> Result<CredenceConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<CredenceConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CredenceConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CredenceConfig, figment::Error> {
    debug!(path = %path.display(), "loading explicit config file");
    Figment::new()
        .merge(Serialized::defaults(CredenceConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The layered Figment before extraction.
pub fn build_figment() -> Figment {
    let user = user_config_path().unwrap_or_default();
    for layer in [Path::new(SYSTEM_CONFIG), user.as_path(), Path::new(LOCAL_CONFIG)] {
        if layer.is_file() {
            debug!(path = %layer.display(), "config layer found");
        }
    }

    Figment::new()
        .merge(Serialized::defaults(CredenceConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(&user))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `CREDENCE_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys such as
/// `log_level` contain underscores. `[[handlers]]` is an array and cannot be
/// set from the environment.
fn env_provider() -> Env {
    Env::prefixed("CREDENCE_").map(|key| {
        key.as_str()
            .replacen("engine_", "engine.", 1)
            .replacen("aup_", "aup.", 1)
            .into()
    })
}
