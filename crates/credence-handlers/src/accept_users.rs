// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backing-map handler: accepts users whose secret matches a static table.
//!
//! The table is an immutable snapshot behind an [`ArcSwap`]. Readers load the
//! current snapshot without locking; [`AcceptUsersHandler::reload_users`]
//! replaces it wholesale, so an in-flight attempt sees either the old or the
//! new table, never a mix.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use secrecy::SecretString;
use tracing::debug;

use credence_core::{
    Attributes, AuthenticationContext, AuthenticationHandler, Credential, DefaultPrincipalFactory,
    ErrorKind, HandlerError, Principal, PrincipalFactory,
};

use crate::comparator::{ExactComparator, SecretComparator};

type UserTable = HashMap<String, SecretString>;

fn to_table(users: HashMap<String, String>) -> UserTable {
    users
        .into_iter()
        .map(|(name, secret)| (name, SecretString::from(secret)))
        .collect()
}

/// Authenticates username/password credentials against an in-memory map.
pub struct AcceptUsersHandler {
    name: String,
    users: ArcSwap<UserTable>,
    comparator: Arc<dyn SecretComparator>,
    principal_factory: Arc<dyn PrincipalFactory>,
    attributes: Attributes,
}

impl AcceptUsersHandler {
    /// Create a handler with exact comparison and the default principal factory.
    pub fn new(name: impl Into<String>, users: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            users: ArcSwap::from_pointee(to_table(users)),
            comparator: Arc::new(ExactComparator),
            principal_factory: Arc::new(DefaultPrincipalFactory),
            attributes: Attributes::new(),
        }
    }

    pub fn with_comparator(mut self, comparator: Arc<dyn SecretComparator>) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn with_principal_factory(mut self, factory: Arc<dyn PrincipalFactory>) -> Self {
        self.principal_factory = factory;
        self
    }

    /// Attach a static attribute to every principal this handler resolves.
    pub fn with_attribute(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }

    /// Atomically replace the backing map.
    pub fn reload_users(&self, users: HashMap<String, String>) {
        let count = users.len();
        self.users.store(Arc::new(to_table(users)));
        debug!(handler = %self.name, users = count, "backing map reloaded");
    }

    /// Number of users in the current snapshot.
    pub fn user_count(&self) -> usize {
        self.users.load().len()
    }
}

#[async_trait]
impl AuthenticationHandler for AcceptUsersHandler {
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

        // One snapshot for the whole attempt.
        let users = self.users.load();
        let Some(stored) = users.get(username) else {
            debug!(handler = %self.name, username, "user not in backing map");
            return Err(HandlerError::account_not_found(format!(
                "{username} not found in backing map."
            )));
        };

        let Some(presented) = credential.password() else {
            return Err(HandlerError::failed_login("Password is null."));
        };

        if !self.comparator.matches(presented, stored) {
            debug!(handler = %self.name, username, "password mismatch");
            return Err(HandlerError::failed_login(format!(
                "Password does not match value on record for {username}."
            )));
        }

        Ok(self
            .principal_factory
            .create_principal(username, self.attributes.clone()))
    }
}
