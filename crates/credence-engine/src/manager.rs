// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authentication manager: resolve, invoke, evaluate, assemble.
//!
//! One call to [`AuthenticationManager::authenticate`] is one attempt. No
//! state survives between attempts, so a single manager serves any number
//! of concurrent callers.

use std::sync::Arc;

use credence_core::principal::merge_attributes;
use credence_core::{
    Attributes, Authentication, AuthenticationContext, AuthenticationError,
    AuthenticationHandler, CredenceError, Credential, DefaultPrincipalFactory, EvaluationMode,
    HandlerError, HandlerFailure, HandlerOutcome, HandlerSuccess, HealthStatus, PrincipalFactory,
};
use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::policy::{AnySucceeds, AuthenticationPolicy};
use crate::resolver::HandlerResolver;

/// Recorded as the source of the failure when the principal factory's result
/// cannot be reconciled with the successful handlers.
pub const PRINCIPAL_RESOLUTION: &str = "principal-resolution";

/// Builder for [`AuthenticationManager`].
pub struct AuthenticationManagerBuilder {
    handlers: Vec<Arc<dyn AuthenticationHandler>>,
    policy: Arc<dyn AuthenticationPolicy>,
    principal_factory: Arc<dyn PrincipalFactory>,
    concurrent: bool,
}

impl Default for AuthenticationManagerBuilder {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            policy: Arc::new(AnySucceeds::default()),
            principal_factory: Arc::new(DefaultPrincipalFactory),
            concurrent: false,
        }
    }
}

impl AuthenticationManagerBuilder {
    /// Appends a handler. Registration order is invocation order.
    pub fn handler(mut self, handler: Arc<dyn AuthenticationHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn handlers(
        mut self,
        handlers: impl IntoIterator<Item = Arc<dyn AuthenticationHandler>>,
    ) -> Self {
        self.handlers.extend(handlers);
        self
    }

    pub fn policy(mut self, policy: Arc<dyn AuthenticationPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn principal_factory(mut self, factory: Arc<dyn PrincipalFactory>) -> Self {
        self.principal_factory = factory;
        self
    }

    /// Run resolved handlers concurrently. Only honored in exhaustive mode.
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn build(self) -> Result<AuthenticationManager, CredenceError> {
        let resolver = HandlerResolver::new(self.handlers)?;
        if self.concurrent && self.policy.mode() != EvaluationMode::Exhaustive {
            warn!(
                policy = self.policy.name(),
                "concurrent evaluation requires exhaustive mode; handlers will run in order"
            );
        }
        Ok(AuthenticationManager {
            resolver,
            policy: self.policy,
            principal_factory: self.principal_factory,
            concurrent: self.concurrent,
        })
    }
}

/// Resolves handlers for a credential, runs them, and applies the policy.
pub struct AuthenticationManager {
    resolver: HandlerResolver,
    policy: Arc<dyn AuthenticationPolicy>,
    principal_factory: Arc<dyn PrincipalFactory>,
    concurrent: bool,
}

impl std::fmt::Debug for AuthenticationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationManager")
            .field("handlers", &self.resolver.names())
            .field("policy", &self.policy.name())
            .field("mode", &self.policy.mode())
            .field("concurrent", &self.concurrent)
            .finish()
    }
}

impl AuthenticationManager {
    pub fn builder() -> AuthenticationManagerBuilder {
        AuthenticationManagerBuilder::default()
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.resolver.names()
    }

    pub fn policy(&self) -> &dyn AuthenticationPolicy {
        self.policy.as_ref()
    }

    fn runs_concurrently(&self) -> bool {
        self.concurrent && self.policy.mode() == EvaluationMode::Exhaustive
    }

    /// Authenticates one credential.
    ///
    /// Returns `UnsupportedCredential` without invoking any handler when no
    /// handler supports the credential, and `PolicyNotSatisfied` carrying
    /// every recorded handler failure when the policy rejects the attempt.
    pub async fn authenticate(
        &self,
        credential: &Credential,
        context: Option<&AuthenticationContext>,
    ) -> Result<Authentication, AuthenticationError> {
        let default_context;
        let context = match context {
            Some(context) => context,
            None => {
                default_context = AuthenticationContext::new();
                &default_context
            }
        };

        let audit_id = credential.audit_id();
        let candidates = self.resolver.resolve(credential);
        if candidates.is_empty() {
            info!(
                credential = %credential.kind(),
                audit_id = %audit_id,
                "no handler supports credential"
            );
            return Err(AuthenticationError::UnsupportedCredential {
                credential: credential.kind(),
            });
        }

        debug!(
            audit_id = %audit_id,
            request_id = context.request_id().unwrap_or("-"),
            candidates = candidates.len(),
            policy = self.policy.name(),
            "authenticating"
        );

        let outcomes = if self.runs_concurrently() {
            self.run_concurrent(&candidates, credential, context).await
        } else {
            self.run_sequential(&candidates, credential, context).await
        };

        let decision = self.policy.evaluate(&outcomes);
        let (successes, failures) = split(outcomes);

        if !decision.success {
            info!(
                audit_id = %audit_id,
                failures = ?decision.failure_kinds,
                "authentication rejected by policy"
            );
            return Err(AuthenticationError::PolicyNotSatisfied { failures });
        }

        match self.assemble(successes, failures) {
            Ok(authentication) => {
                info!(
                    audit_id = %audit_id,
                    principal = authentication.principal().id(),
                    handlers = ?authentication.successful_handlers(),
                    "authentication succeeded"
                );
                Ok(authentication)
            }
            Err((e, mut failures)) => {
                error!(audit_id = %audit_id, error = %e, "could not assemble authentication");
                failures.push(HandlerFailure::from_error(
                    PRINCIPAL_RESOLUTION,
                    HandlerError::unavailable("Principal could not be resolved."),
                ));
                Err(AuthenticationError::PolicyNotSatisfied { failures })
            }
        }
    }

    async fn run_sequential(
        &self,
        candidates: &[Arc<dyn AuthenticationHandler>],
        credential: &Credential,
        context: &AuthenticationContext,
    ) -> Vec<HandlerOutcome> {
        let mut outcomes = Vec::with_capacity(candidates.len());
        for handler in candidates {
            if context.is_canceled() {
                outcomes.push(canceled(handler.name()));
                continue;
            }
            outcomes.push(invoke(handler.as_ref(), credential, context).await);
            if self.policy.is_settled(&outcomes) {
                debug!(
                    handler = handler.name(),
                    remaining = candidates.len() - outcomes.len(),
                    "policy settled"
                );
                break;
            }
        }
        outcomes
    }

    async fn run_concurrent(
        &self,
        candidates: &[Arc<dyn AuthenticationHandler>],
        credential: &Credential,
        context: &AuthenticationContext,
    ) -> Vec<HandlerOutcome> {
        join_all(candidates.iter().map(|handler| async move {
            if context.is_canceled() {
                canceled(handler.name())
            } else {
                invoke(handler.as_ref(), credential, context).await
            }
        }))
        .await
    }

    /// Builds the final result from the first success, merging attributes
    /// from every success in order.
    fn assemble(
        &self,
        successes: Vec<HandlerSuccess>,
        failures: Vec<HandlerFailure>,
    ) -> Result<Authentication, (CredenceError, Vec<HandlerFailure>)> {
        let Some(first) = successes.first() else {
            return Err((
                CredenceError::Internal("policy accepted an attempt with no success".into()),
                failures,
            ));
        };

        let mut attributes = Attributes::new();
        for success in &successes {
            merge_attributes(&mut attributes, success.principal.attributes());
        }
        let principal = self
            .principal_factory
            .create_principal(first.principal.id(), attributes);

        // Keep the failures for the error path; the result owns its own copy.
        Authentication::new(principal, successes, failures.clone()).map_err(|e| (e, failures))
    }

    /// Health of every registered handler, in registration order.
    pub async fn health(&self) -> Vec<(String, HealthStatus)> {
        let mut report = Vec::with_capacity(self.resolver.len());
        for handler in self.resolver.handlers() {
            let status = match handler.health_check().await {
                Ok(status) => status,
                Err(e) => HealthStatus::Unhealthy(e.to_string()),
            };
            report.push((handler.name().to_string(), status));
        }
        report
    }

    /// Shuts down every handler, returning the first failure after all
    /// handlers have been asked.
    pub async fn shutdown(&self) -> Result<(), CredenceError> {
        let mut first_error = None;
        for handler in self.resolver.handlers() {
            if let Err(e) = handler.shutdown().await {
                warn!(handler = handler.name(), error = %e, "handler shutdown failed");
                if first_error.is_none() {
                    first_error = Some(CredenceError::Shutdown {
                        name: handler.name().to_string(),
                        source: Box::new(e),
                    });
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                info!(handlers = self.resolver.len(), "all handlers shut down");
                Ok(())
            }
        }
    }
}

async fn invoke(
    handler: &dyn AuthenticationHandler,
    credential: &Credential,
    context: &AuthenticationContext,
) -> HandlerOutcome {
    match handler.authenticate(credential, context).await {
        Ok(principal) => {
            debug!(handler = handler.name(), principal = principal.id(), "handler succeeded");
            HandlerOutcome::Success(HandlerSuccess {
                handler: handler.name().to_string(),
                principal,
            })
        }
        Err(e) => {
            debug!(handler = handler.name(), kind = %e.kind, "handler failed");
            HandlerOutcome::Failure(HandlerFailure::from_error(handler.name(), e))
        }
    }
}

fn canceled(handler: &str) -> HandlerOutcome {
    HandlerOutcome::Failure(HandlerFailure::from_error(handler, HandlerError::canceled()))
}

fn split(outcomes: Vec<HandlerOutcome>) -> (Vec<HandlerSuccess>, Vec<HandlerFailure>) {
    let mut successes = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            HandlerOutcome::Success(s) => successes.push(s),
            HandlerOutcome::Failure(f) => failures.push(f),
        }
    }
    (successes, failures)
}
