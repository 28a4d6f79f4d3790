// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler resolution: which registered handlers apply to a credential.

use std::collections::HashSet;
use std::sync::Arc;

use credence_core::{AuthenticationHandler, CredenceError, Credential};

/// Ordered, uniquely named set of handlers.
///
/// Registration order is the invocation order for every attempt.
#[derive(Clone)]
pub struct HandlerResolver {
    handlers: Vec<Arc<dyn AuthenticationHandler>>,
}

impl std::fmt::Debug for HandlerResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerResolver")
            .field("handlers", &self.names())
            .finish()
    }
}

impl HandlerResolver {
    /// Builds a resolver, rejecting empty or duplicate handler names.
    pub fn new(handlers: Vec<Arc<dyn AuthenticationHandler>>) -> Result<Self, CredenceError> {
        let mut seen = HashSet::new();
        for handler in &handlers {
            let name = handler.name();
            if name.trim().is_empty() {
                return Err(CredenceError::Config(
                    "handler names must not be empty".to_string(),
                ));
            }
            if !seen.insert(name.to_string()) {
                return Err(CredenceError::Config(format!(
                    "duplicate handler name: {name}"
                )));
            }
        }
        Ok(Self { handlers })
    }

    /// Handlers whose `supports` accepts `credential`, in registration order.
    ///
    /// An empty result means no handler applies; callers treat that as an
    /// unsupported credential.
    pub fn resolve(&self, credential: &Credential) -> Vec<Arc<dyn AuthenticationHandler>> {
        self.handlers
            .iter()
            .filter(|h| h.supports(credential))
            .cloned()
            .collect()
    }

    pub fn handlers(&self) -> &[Arc<dyn AuthenticationHandler>] {
        &self.handlers
    }

    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn AuthenticationHandler>> {
        self.handlers.iter().find(|h| h.name() == name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_core::{CertificateCredential, ServiceCredential};
    use credence_test_utils::ScriptedHandler;

    fn handler(name: &str) -> Arc<dyn AuthenticationHandler> {
        Arc::new(ScriptedHandler::succeeding(name, "scott"))
    }

    #[test]
    fn resolve_keeps_registration_order() {
        let resolver =
            HandlerResolver::new(vec![handler("c"), handler("a"), handler("b")]).unwrap();
        let credential = Credential::username_password("scott", "rutgers");
        let names: Vec<String> = resolver
            .resolve(&credential)
            .iter()
            .map(|h| h.name().to_string())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(resolver.names(), vec!["c", "a", "b"]);
    }

    #[test]
    fn resolve_filters_by_support() {
        let service = Arc::new(
            ScriptedHandler::succeeding("svc", "https://app.example.org")
                .supporting(credence_core::CredentialKind::Service),
        );
        let resolver = HandlerResolver::new(vec![handler("users"), service]).unwrap();

        let svc: Credential =
            ServiceCredential::new("https://app.example.org/cb", "app").into();
        let resolved = resolver.resolve(&svc);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name(), "svc");

        let cert: Credential = CertificateCredential {
            subject: "CN=scott".into(),
            issuer: "CN=ca".into(),
            serial: "01".into(),
        }
        .into();
        assert!(resolver.resolve(&cert).is_empty());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = HandlerResolver::new(vec![handler("users"), handler("users")]).unwrap_err();
        assert!(err.to_string().contains("duplicate handler name: users"));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(HandlerResolver::new(vec![handler("  ")]).is_err());
    }

    #[test]
    fn lookup_by_name() {
        let resolver = HandlerResolver::new(vec![handler("a"), handler("b")]).unwrap();
        assert!(resolver.get("b").is_some());
        assert!(resolver.get("z").is_none());
        assert_eq!(resolver.len(), 2);
        assert!(!resolver.is_empty());
    }
}
