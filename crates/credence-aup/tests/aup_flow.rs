// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AUP flow driven by real authentication results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use credence_aup::{AttributeAupRepository, AupFlow, AupRepository, AupState, InMemoryAupRepository};
use credence_core::{Authentication, CredenceError, Principal};
use credence_engine::AuthenticationManager;
use credence_test_utils::fixtures::password;
use credence_test_utils::ScriptedHandler;

async fn authenticate(handler: ScriptedHandler) -> Authentication {
    AuthenticationManager::builder()
        .handler(Arc::new(handler))
        .build()
        .unwrap()
        .authenticate(&password("scott", "rutgers"), None)
        .await
        .unwrap()
}

#[tokio::test]
async fn first_login_must_accept_then_is_remembered() {
    let repository = Arc::new(InMemoryAupRepository::new());
    let auth = authenticate(ScriptedHandler::succeeding("users", "scott")).await;

    let mut flow = AupFlow::start(repository.clone(), &auth).await;
    assert_eq!(flow.state(), AupState::AwaitingDecision);
    assert_eq!(flow.submit().await.unwrap(), AupState::Accepted);
    assert!(repository.accepted_at("scott").is_some());

    let again = AupFlow::start(repository, &auth).await;
    assert_eq!(again.state(), AupState::Accepted);
}

#[tokio::test]
async fn declining_is_terminal() {
    let auth = authenticate(ScriptedHandler::succeeding("users", "scott")).await;
    let mut flow = AupFlow::start(Arc::new(InMemoryAupRepository::new()), &auth).await;

    assert_eq!(flow.decline().unwrap(), AupState::Rejected);
    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, CredenceError::InvalidTransition { .. }));
    assert_eq!(flow.state(), AupState::Rejected);
}

#[tokio::test]
async fn attribute_from_handler_counts_as_acceptance() {
    let auth = authenticate(
        ScriptedHandler::succeeding("directory", "scott").with_attribute("aupAccepted", "true"),
    )
    .await;
    let flow = AupFlow::start(Arc::new(AttributeAupRepository::new("aupAccepted")), &auth).await;
    assert_eq!(flow.state(), AupState::Accepted);
    assert_eq!(flow.principal().id(), "scott");
}

/// Fails every call until `healthy` is set.
struct FlakyRepository {
    healthy: AtomicBool,
    inner: InMemoryAupRepository,
}

#[async_trait]
impl AupRepository for FlakyRepository {
    async fn verify(&self, principal: &Principal) -> Result<bool, CredenceError> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(CredenceError::Internal("store offline".into()));
        }
        self.inner.verify(principal).await
    }

    async fn submit(&self, principal: &Principal) -> Result<bool, CredenceError> {
        if !self.healthy.load(Ordering::SeqCst) {
            return Err(CredenceError::Internal("store offline".into()));
        }
        self.inner.submit(principal).await
    }
}

#[tokio::test]
async fn repository_failure_lands_in_error_and_can_recover() {
    let repository = Arc::new(FlakyRepository {
        healthy: AtomicBool::new(false),
        inner: InMemoryAupRepository::new(),
    });
    let auth = authenticate(ScriptedHandler::succeeding("users", "scott")).await;

    let mut flow = AupFlow::start(repository.clone(), &auth).await;
    assert_eq!(flow.state(), AupState::Error);
    assert!(flow.decline().is_err());
    assert_eq!(flow.state(), AupState::Error);

    repository.healthy.store(true, Ordering::SeqCst);
    assert_eq!(flow.verify().await.unwrap(), AupState::AwaitingDecision);
    assert_eq!(flow.submit().await.unwrap(), AupState::Accepted);
}
