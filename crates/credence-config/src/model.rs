// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Credence authentication engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]`; an unrecognized key is a
//! load error.

use std::collections::BTreeMap;

use credence_core::{ComparatorKind, EvaluationMode, PolicyKind};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Credence configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredenceConfig {
    /// How handler verdicts combine.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Registered handlers, in invocation order.
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,

    /// Acceptable usage policy settings.
    #[serde(default)]
    pub aup: AupConfig,
}

/// Policy and evaluation settings for the manager.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub policy: PolicyKind,

    #[serde(default)]
    pub evaluation: EvaluationMode,

    /// Run handlers concurrently. Requires exhaustive evaluation.
    #[serde(default)]
    pub concurrent: bool,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            evaluation: EvaluationMode::default(),
            concurrent: false,
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Which handler implementation a `[[handlers]]` entry builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Deserialize, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum HandlerType {
    /// Username/password against the `users` map.
    AcceptUsers,
    /// Deny list of usernames in `blocked`.
    RejectUsers,
    /// Service callback credentials checked against `allowed_services`.
    Service,
}

/// One registered handler.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// Unique handler name, reported in failure payloads.
    pub name: String,

    #[serde(rename = "type")]
    pub handler_type: HandlerType,

    /// Secret comparison strategy for `users`.
    #[serde(default)]
    pub comparator: ComparatorKind,

    /// Per-attempt time limit; unset means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Username to stored secret (accept-users only).
    #[serde(default)]
    pub users: BTreeMap<String, String>,

    /// Usernames to refuse (reject-users only).
    #[serde(default)]
    pub blocked: Vec<String>,

    /// Service ids allowed to authenticate (service only).
    #[serde(default)]
    pub allowed_services: Vec<String>,

    /// Refuse non-https callback URLs (service only).
    #[serde(default = "default_require_https")]
    pub require_https: bool,

    /// Static attributes attached to every principal this handler resolves.
    #[serde(default)]
    pub attributes: BTreeMap<String, Vec<String>>,
}

fn default_require_https() -> bool {
    true
}

impl HandlerConfig {
    /// A handler entry of `handler_type` with every optional field at its default.
    pub fn new(name: impl Into<String>, handler_type: HandlerType) -> Self {
        Self {
            name: name.into(),
            handler_type,
            comparator: ComparatorKind::default(),
            timeout_ms: None,
            users: BTreeMap::new(),
            blocked: Vec::new(),
            allowed_services: Vec::new(),
            require_https: default_require_https(),
            attributes: BTreeMap::new(),
        }
    }
}

impl std::fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let users: BTreeMap<&str, &str> = self
            .users
            .keys()
            .map(|k| (k.as_str(), "[REDACTED]"))
            .collect();
        f.debug_struct("HandlerConfig")
            .field("name", &self.name)
            .field("handler_type", &self.handler_type)
            .field("comparator", &self.comparator)
            .field("timeout_ms", &self.timeout_ms)
            .field("users", &users)
            .field("blocked", &self.blocked)
            .field("allowed_services", &self.allowed_services)
            .field("require_https", &self.require_https)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Acceptable usage policy settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AupConfig {
    /// Run the acceptance flow after a successful authentication.
    #[serde(default)]
    pub enabled: bool,

    /// Principal attribute that records prior acceptance.
    #[serde(default = "default_aup_attribute")]
    pub attribute: String,
}

impl Default for AupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            attribute: default_aup_attribute(),
        }
    }
}

fn default_aup_attribute() -> String {
    "aupAccepted".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_entries_deserialize_in_order() {
        let toml_str = r#"
[[handlers]]
name = "static-users"
type = "accept-users"
comparator = "case-insensitive"
timeout_ms = 500
users = { scott = "rutgers", dima = "javarules" }
attributes = { source = ["static-users"] }

[[handlers]]
name = "blocked"
type = "reject-users"
blocked = ["mallory"]
"#;
        let config: CredenceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.handlers.len(), 2);
        let first = &config.handlers[0];
        assert_eq!(first.handler_type, HandlerType::AcceptUsers);
        assert_eq!(first.comparator, ComparatorKind::CaseInsensitive);
        assert_eq!(first.timeout_ms, Some(500));
        assert_eq!(first.users.get("scott").map(String::as_str), Some("rutgers"));
        assert_eq!(first.attributes["source"], vec!["static-users"]);
        assert_eq!(config.handlers[1].blocked, vec!["mallory"]);
        assert!(config.handlers[1].require_https);
    }

    #[test]
    fn handler_type_is_required() {
        let toml_str = r#"
[[handlers]]
name = "static-users"
"#;
        assert!(toml::from_str::<CredenceConfig>(toml_str).is_err());
    }

    #[test]
    fn handlers_deny_unknown_fields() {
        let toml_str = r#"
[[handlers]]
name = "static-users"
type = "accept-users"
passwords = { scott = "rutgers" }
"#;
        assert!(toml::from_str::<CredenceConfig>(toml_str).is_err());
    }

    #[test]
    fn debug_output_redacts_stored_secrets() {
        let mut handler = HandlerConfig::new("static-users", HandlerType::AcceptUsers);
        handler.users.insert("scott".into(), "rutgers".into());
        let rendered = format!("{handler:?}");
        assert!(rendered.contains("scott"));
        assert!(!rendered.contains("rutgers"));
    }

    #[test]
    fn handler_type_display_matches_toml_name() {
        assert_eq!(HandlerType::RejectUsers.to_string(), "reject-users");
        assert_eq!(HandlerType::Service.to_string(), "service");
    }
}
