// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted handler for deterministic manager and policy tests.
//!
//! `ScriptedHandler` implements `AuthenticationHandler` with a fixed verdict
//! and counts how often it was consulted, so tests can assert which handlers
//! the manager actually invoked.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use credence_core::{
    Attributes, AuthenticationContext, AuthenticationHandler, CredenceError, Credential,
    CredentialKind, HandlerError, Principal,
};

enum Verdict {
    Accept { id: String, attributes: Attributes },
    Refuse(HandlerError),
}

/// A handler that always returns the same verdict.
pub struct ScriptedHandler {
    name: String,
    kind: CredentialKind,
    verdict: Verdict,
    delay: Option<Duration>,
    fail_shutdown: bool,
    invocations: AtomicUsize,
    support_checks: AtomicUsize,
    shut_down: AtomicBool,
}

impl ScriptedHandler {
    fn with_verdict(name: &str, verdict: Verdict) -> Self {
        Self {
            name: name.to_string(),
            kind: CredentialKind::UsernamePassword,
            verdict,
            delay: None,
            fail_shutdown: false,
            invocations: AtomicUsize::new(0),
            support_checks: AtomicUsize::new(0),
            shut_down: AtomicBool::new(false),
        }
    }

    /// A handler that resolves every supported credential to `principal_id`.
    pub fn succeeding(name: &str, principal_id: &str) -> Self {
        Self::with_verdict(
            name,
            Verdict::Accept {
                id: principal_id.to_string(),
                attributes: Attributes::new(),
            },
        )
    }

    /// A handler that refuses every supported credential with `error`.
    pub fn failing(name: &str, error: HandlerError) -> Self {
        Self::with_verdict(name, Verdict::Refuse(error))
    }

    /// Change the credential variant this handler supports
    /// (default: username/password).
    pub fn supporting(mut self, kind: CredentialKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add an attribute value to the resolved principal. No effect on a
    /// failing handler.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        if let Verdict::Accept { attributes, .. } = &mut self.verdict {
            attributes
                .entry(name.to_string())
                .or_default()
                .push(value.to_string());
        }
        self
    }

    /// Sleep before answering. The sleep ends early with `Canceled` when the
    /// context is canceled.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make `shutdown` return an error.
    pub fn failing_shutdown(mut self) -> Self {
        self.fail_shutdown = true;
        self
    }

    /// Number of `authenticate` calls so far.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Number of `supports` calls so far.
    pub fn support_checks(&self) -> usize {
        self.support_checks.load(Ordering::SeqCst)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthenticationHandler for ScriptedHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, credential: &Credential) -> bool {
        self.support_checks.fetch_add(1, Ordering::SeqCst);
        credential.kind() == self.kind
    }

    async fn authenticate(
        &self,
        _credential: &Credential,
        context: &AuthenticationContext,
    ) -> Result<Principal, HandlerError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::select! {
                biased;
                _ = context.cancellation().cancelled() => return Err(HandlerError::canceled()),
                _ = tokio::time::sleep(delay) => {}
            }
        }

        match &self.verdict {
            Verdict::Accept { id, attributes } => {
                Ok(Principal::with_attributes(id.clone(), attributes.clone()))
            }
            Verdict::Refuse(error) => Err(error.clone()),
        }
    }

    async fn shutdown(&self) -> Result<(), CredenceError> {
        self.shut_down.store(true, Ordering::SeqCst);
        if self.fail_shutdown {
            return Err(CredenceError::Internal(format!(
                "{} refused to shut down",
                self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_core::ErrorKind;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn succeeding_handler_returns_principal_with_attributes() {
        let handler = ScriptedHandler::succeeding("h", "scott").with_attribute("role", "staff");
        let credential = Credential::username_password("scott", "rutgers");

        assert!(handler.supports(&credential));
        let principal = handler
            .authenticate(&credential, &AuthenticationContext::new())
            .await
            .unwrap();
        assert_eq!(principal.id(), "scott");
        assert_eq!(principal.attribute("role"), Some(&["staff".to_string()][..]));
        assert_eq!(handler.invocations(), 1);
        assert_eq!(handler.support_checks(), 1);
    }

    #[tokio::test]
    async fn failing_handler_returns_its_error() {
        let handler = ScriptedHandler::failing("h", HandlerError::failed_login("Password is null."));
        let err = handler
            .authenticate(
                &Credential::username_password("scott", ""),
                &AuthenticationContext::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::FailedLogin);
        assert_eq!(err.message, "Password is null.");
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_handler_observes_cancellation() {
        let handler = ScriptedHandler::succeeding("h", "scott").with_delay(Duration::from_secs(60));
        let token = CancellationToken::new();
        let context = AuthenticationContext::new().with_cancellation(token.clone());
        let credential = Credential::username_password("scott", "rutgers");

        let attempt = handler.authenticate(&credential, &context);
        token.cancel();
        let err = attempt.await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Canceled);
    }

    #[tokio::test]
    async fn shutdown_is_recorded() {
        let handler = ScriptedHandler::succeeding("h", "scott").failing_shutdown();
        assert!(handler.shutdown().await.is_err());
        assert!(handler.is_shut_down());
    }
}
