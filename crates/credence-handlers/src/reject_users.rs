// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deny-list handler: refuses listed usernames and accepts everyone else.
//!
//! Typically registered under `AllMustSucceed` next to a verifying handler so
//! a blocked account fails even with a correct password.

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use tracing::debug;

use credence_core::{
    Attributes, AuthenticationContext, AuthenticationHandler, Credential, DefaultPrincipalFactory,
    ErrorKind, HandlerError, Principal, PrincipalFactory,
};

/// Fails `FailedLogin` for blocked usernames and succeeds for everyone else.
pub struct RejectUsersHandler {
    name: String,
    blocked: ArcSwap<HashSet<String>>,
    principal_factory: Arc<dyn PrincipalFactory>,
}

impl RejectUsersHandler {
    pub fn new(name: impl Into<String>, blocked: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            blocked: ArcSwap::from_pointee(blocked.into_iter().collect()),
            principal_factory: Arc::new(DefaultPrincipalFactory),
        }
    }

    pub fn with_principal_factory(mut self, factory: Arc<dyn PrincipalFactory>) -> Self {
        self.principal_factory = factory;
        self
    }

    /// Atomically replace the deny list.
    pub fn reload_blocked(&self, blocked: impl IntoIterator<Item = String>) {
        let set: HashSet<String> = blocked.into_iter().collect();
        debug!(handler = %self.name, blocked = set.len(), "deny list reloaded");
        self.blocked.store(Arc::new(set));
    }

    pub fn is_blocked(&self, username: &str) -> bool {
        self.blocked.load().contains(username)
    }
}

#[async_trait]
impl AuthenticationHandler for RejectUsersHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, credential: &Credential) -> bool {
        matches!(credential, Credential::UsernamePassword(_))
    }

    async fn authenticate(
        &self,
        credential: &Credential,
        _context: &AuthenticationContext,
    ) -> Result<Principal, HandlerError> {
        let Credential::UsernamePassword(credential) = credential else {
            return Err(HandlerError::new(
                ErrorKind::UnsupportedCredential,
                "Credential type is not supported.",
            ));
        };

        let username = match credential.username() {
            Some(u) if !u.is_empty() => u,
            _ => return Err(HandlerError::account_not_found("Username is null.")),
        };

        if self.is_blocked(username) {
            debug!(handler = %self.name, username, "username is on the deny list");
            return Err(HandlerError::failed_login(format!("{username} is blocked.")));
        }

        Ok(self
            .principal_factory
            .create_principal(username, Attributes::new()))
    }
}
