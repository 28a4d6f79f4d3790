// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Where acceptance decisions are looked up and recorded.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use credence_core::{CredenceError, Principal};

/// Storage for acceptable usage policy decisions.
#[async_trait]
pub trait AupRepository: Send + Sync + 'static {
    /// Whether `principal` has already accepted the policy.
    async fn verify(&self, principal: &Principal) -> Result<bool, CredenceError>;

    /// Record acceptance. `Ok(false)` means the store declined to record it.
    async fn submit(&self, principal: &Principal) -> Result<bool, CredenceError>;
}

/// Process-local repository keyed by principal id.
#[derive(Debug, Default)]
pub struct InMemoryAupRepository {
    accepted: DashMap<String, DateTime<Utc>>,
}

impl InMemoryAupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `principal_id` accepted, if ever.
    pub fn accepted_at(&self, principal_id: &str) -> Option<DateTime<Utc>> {
        self.accepted.get(principal_id).map(|entry| *entry.value())
    }

    pub fn revoke(&self, principal_id: &str) -> bool {
        self.accepted.remove(principal_id).is_some()
    }
}

#[async_trait]
impl AupRepository for InMemoryAupRepository {
    async fn verify(&self, principal: &Principal) -> Result<bool, CredenceError> {
        Ok(self.accepted.contains_key(principal.id()))
    }

    async fn submit(&self, principal: &Principal) -> Result<bool, CredenceError> {
        // Re-submitting keeps the original acceptance time.
        self.accepted
            .entry(principal.id().to_string())
            .or_insert_with(Utc::now);
        debug!(principal = principal.id(), "acceptable usage policy accepted");
        Ok(true)
    }
}

/// Treats a principal attribute as the record of prior acceptance.
///
/// The attribute usually comes from the directory the principal was resolved
/// from. Submissions cannot be written back there, so they are kept locally
/// and consulted on later verifications.
#[derive(Debug)]
pub struct AttributeAupRepository {
    attribute: String,
    submitted: DashMap<String, DateTime<Utc>>,
}

impl AttributeAupRepository {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            submitted: DashMap::new(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    fn attribute_accepts(&self, principal: &Principal) -> bool {
        principal
            .attribute(&self.attribute)
            .is_some_and(|values| values.iter().any(|v| v.eq_ignore_ascii_case("true")))
    }
}

#[async_trait]
impl AupRepository for AttributeAupRepository {
    async fn verify(&self, principal: &Principal) -> Result<bool, CredenceError> {
        Ok(self.attribute_accepts(principal) || self.submitted.contains_key(principal.id()))
    }

    async fn submit(&self, principal: &Principal) -> Result<bool, CredenceError> {
        self.submitted
            .entry(principal.id().to_string())
            .or_insert_with(Utc::now);
        Ok(true)
    }
}
