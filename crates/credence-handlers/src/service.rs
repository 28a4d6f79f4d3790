// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service credential handler.
//!
//! Accepts [`ServiceCredential`]s whose callback URL was already validated
//! upstream, checking only scheme and the service allow list. The principal
//! id is the callback URL.

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use tracing::debug;

use credence_core::{
    Attributes, AuthenticationContext, AuthenticationHandler, Credential, ErrorKind,
    HandlerError, Principal, ServiceCredential,
};

/// Verifies service credentials against an allow list of service ids.
pub struct ServiceCredentialHandler {
    name: String,
    allowed: ArcSwap<HashSet<String>>,
    require_https: bool,
}

impl ServiceCredentialHandler {
    pub fn new(name: impl Into<String>, allowed: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            allowed: ArcSwap::from_pointee(allowed.into_iter().collect()),
            require_https: true,
        }
    }

    pub fn with_require_https(mut self, require_https: bool) -> Self {
        self.require_https = require_https;
        self
    }

    /// Atomically replace the allowed service set.
    pub fn reload_allowed(&self, allowed: impl IntoIterator<Item = String>) {
        self.allowed.store(Arc::new(allowed.into_iter().collect()));
    }

    fn verify(&self, credential: &ServiceCredential) -> Result<Principal, HandlerError> {
        if credential.callback_url.trim().is_empty() {
            return Err(HandlerError::account_not_found("Callback URL is null."));
        }

        let is_https = credential
            .callback_url
            .get(..8)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"));
        if self.require_https && !is_https {
            return Err(HandlerError::failed_login("Callback URL must be https."));
        }

        if !self.allowed.load().contains(&credential.service_id) {
            debug!(handler = %self.name, service = %credential.service_id, "service not allowed");
            return Err(HandlerError::account_not_found(format!(
                "{} is not an allowed service.",
                credential.service_id
            )));
        }

        let mut attributes = Attributes::new();
        attributes.insert("service".into(), vec![credential.service_id.clone()]);
        Ok(Principal::with_attributes(
            credential.callback_url.clone(),
            attributes,
        ))
    }
}

#[async_trait]
impl AuthenticationHandler for ServiceCredentialHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, credential: &Credential) -> bool {
        matches!(credential, Credential::Service(_))
    }

    async fn authenticate(
        &self,
        credential: &Credential,
        _context: &AuthenticationContext,
    ) -> Result<Principal, HandlerError> {
        match credential {
            Credential::Service(service) => self.verify(service),
            _ => Err(HandlerError::new(
                ErrorKind::UnsupportedCredential,
                "Credential type is not supported.",
            )),
        }
    }
}
