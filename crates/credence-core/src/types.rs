// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by handlers and the manager.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio_util::sync::CancellationToken;

/// Health status reported by handler health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Handler is fully operational.
    Healthy,
    /// Handler is operational but experiencing issues.
    Degraded(String),
    /// Handler is not operational.
    Unhealthy(String),
}

/// How handler verdicts combine into one verdict.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// At least one attempted handler must succeed.
    #[default]
    AnySucceeds,
    /// Every resolved handler must succeed.
    AllMustSucceed,
}

/// Whether the manager may stop once the verdict is decided.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationMode {
    /// Stop at the first outcome that settles the policy.
    #[default]
    ShortCircuit,
    /// Run every resolved handler, e.g. to merge attributes from all successes.
    Exhaustive,
}

/// Named secret comparison strategies.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ComparatorKind {
    /// Byte-for-byte, case-sensitive.
    #[default]
    Exact,
    CaseInsensitive,
    /// Surrounding whitespace ignored.
    Trimmed,
    /// Stored value is an Argon2 PHC hash.
    Argon2,
}

/// Per-attempt context passed alongside the credential.
///
/// Carries the caller's cancellation signal. Cloning shares the signal.
#[derive(Debug, Clone, Default)]
pub struct AuthenticationContext {
    cancel: CancellationToken,
    request_id: Option<String>,
    client_address: Option<String>,
}

impl AuthenticationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the caller's token so that cancelling it abandons this attempt.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_client_address(mut self, address: impl Into<String>) -> Self {
        self.client_address = Some(address.into());
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn client_address(&self) -> Option<&str> {
        self.client_address.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn setting_enums_parse_kebab_case() {
        use std::str::FromStr;
        assert_eq!(
            PolicyKind::from_str("all-must-succeed").unwrap(),
            PolicyKind::AllMustSucceed
        );
        assert_eq!(EvaluationMode::Exhaustive.to_string(), "exhaustive");
        assert_eq!(
            ComparatorKind::from_str("case-insensitive").unwrap(),
            ComparatorKind::CaseInsensitive
        );
        assert_eq!(ComparatorKind::default(), ComparatorKind::Exact);
    }

    #[test]
    fn context_shares_cancellation_with_caller() {
        let token = CancellationToken::new();
        let ctx = AuthenticationContext::new()
            .with_cancellation(token.clone())
            .with_request_id("req-1");
        assert!(!ctx.is_canceled());
        token.cancel();
        assert!(ctx.is_canceled());
        assert_eq!(ctx.request_id(), Some("req-1"));
        assert!(ctx.client_address().is_none());
    }
}
