// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authentication handler trait every verification backend implements.

use async_trait::async_trait;

use crate::credential::Credential;
use crate::error::{CredenceError, HandlerError};
use crate::principal::Principal;
use crate::types::{AuthenticationContext, HealthStatus};

/// Verifies one credential variant against one backing mechanism.
///
/// Handlers are shared across concurrent attempts, so implementations must
/// only read shared state or swap it atomically.
#[async_trait]
pub trait AuthenticationHandler: Send + Sync + 'static {
    /// Name used in outcomes, logs, and configuration. Unique per manager.
    fn name(&self) -> &str;

    /// Whether this handler can verify `credential`.
    ///
    /// Must be pure and cheap: the resolver calls it before every attempt,
    /// and `authenticate` is never called when it returns false.
    fn supports(&self, credential: &Credential) -> bool;

    /// Verifies the credential and resolves a principal.
    ///
    /// Implementations that block on I/O must watch
    /// `context.cancellation()` and return [`HandlerError::canceled`].
    async fn authenticate(
        &self,
        credential: &Credential,
        context: &AuthenticationContext,
    ) -> Result<Principal, HandlerError>;

    /// Reports whether the backing mechanism is reachable.
    async fn health_check(&self) -> Result<HealthStatus, CredenceError> {
        Ok(HealthStatus::Healthy)
    }

    /// Releases resources acquired at construction.
    async fn shutdown(&self) -> Result<(), CredenceError> {
        Ok(())
    }
}
