// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timeout and cancellation guard around any handler.
//!
//! A handler that talks to an external system is wrapped in [`Bounded`] so a
//! hung backend surfaces as `HandlerUnavailable` and a caller cancellation as
//! `Canceled`, instead of stalling the manager.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use credence_core::{
    AuthenticationContext, AuthenticationHandler, CredenceError, Credential, HandlerError,
    HealthStatus, Principal,
};

/// Wraps a handler with a per-call timeout and the caller's cancellation token.
pub struct Bounded {
    inner: Arc<dyn AuthenticationHandler>,
    timeout: Duration,
}

impl Bounded {
    pub fn new(inner: Arc<dyn AuthenticationHandler>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl AuthenticationHandler for Bounded {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn supports(&self, credential: &Credential) -> bool {
        self.inner.supports(credential)
    }

    async fn authenticate(
        &self,
        credential: &Credential,
        context: &AuthenticationContext,
    ) -> Result<Principal, HandlerError> {
        if context.is_canceled() {
            return Err(HandlerError::canceled());
        }

        tokio::select! {
            biased;
            _ = context.cancellation().cancelled() => Err(HandlerError::canceled()),
            result = tokio::time::timeout(self.timeout, self.inner.authenticate(credential, context)) => {
                match result {
                    Ok(verdict) => verdict,
                    Err(_) => {
                        warn!(
                            handler = %self.inner.name(),
                            timeout_ms = self.timeout.as_millis() as u64,
                            "handler timed out"
                        );
                        Err(HandlerError::unavailable(format!(
                            "Handler timed out after {}ms.",
                            self.timeout.as_millis()
                        )))
                    }
                }
            }
        }
    }

    async fn health_check(&self) -> Result<HealthStatus, CredenceError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), CredenceError> {
        self.inner.shutdown().await
    }
}
