// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Acceptable usage policy flow for one authenticated principal.
//!
//! ```text
//!                 Verified{accepted}        Submitted{recorded}
//! AwaitingDecision ----------------> Accepted <------------ AwaitingDecision | Error
//!        |  Declined                                  Submitted{!recorded} | Failed
//!        +----------> Rejected          AwaitingDecision | Error ----------------> Error
//! ```
//!
//! `Accepted` and `Rejected` are terminal.

use std::sync::Arc;

use strum::Display;
use tracing::{info, warn};

use credence_core::{Authentication, CredenceError, Principal};

use crate::repository::AupRepository;

/// Where the principal stands with respect to the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum AupState {
    /// The principal must accept or decline before continuing.
    AwaitingDecision,
    Accepted,
    Rejected,
    /// The repository could not be consulted or did not record the decision.
    Error,
}

impl AupState {
    pub fn is_terminal(self) -> bool {
        matches!(self, AupState::Accepted | AupState::Rejected)
    }
}

/// Inputs that drive the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum AupEvent {
    /// The repository answered whether the principal already accepted.
    Verified { accepted: bool },
    /// The principal accepted; `recorded` is whether the repository kept it.
    Submitted { recorded: bool },
    Declined,
    /// The repository returned an error.
    Failed,
}

/// The transition table. `None` means the event is not valid in `state`.
pub fn transition(state: AupState, event: AupEvent) -> Option<AupState> {
    use AupEvent::*;
    use AupState::*;

    match (state, event) {
        (AwaitingDecision | Error, Verified { accepted: true }) => Some(Accepted),
        (AwaitingDecision | Error, Verified { accepted: false }) => Some(AwaitingDecision),
        (AwaitingDecision | Error, Submitted { recorded: true }) => Some(Accepted),
        (AwaitingDecision | Error, Submitted { recorded: false }) => Some(Error),
        (AwaitingDecision | Error, Failed) => Some(Error),
        (AwaitingDecision, Declined) => Some(Rejected),
        _ => None,
    }
}

/// One principal's pass through the policy.
pub struct AupFlow {
    state: AupState,
    principal: Principal,
    repository: Arc<dyn AupRepository>,
}

impl std::fmt::Debug for AupFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AupFlow")
            .field("state", &self.state)
            .field("principal", &self.principal.id())
            .finish()
    }
}

impl AupFlow {
    /// Starts the flow for an authenticated principal by asking the
    /// repository whether it already accepted.
    ///
    /// Ends in `Accepted`, `AwaitingDecision`, or `Error`.
    pub async fn start(repository: Arc<dyn AupRepository>, authentication: &Authentication) -> Self {
        let mut flow = Self {
            state: AupState::AwaitingDecision,
            principal: authentication.principal().clone(),
            repository,
        };
        if let Err(e) = flow.verify().await {
            warn!(
                principal = flow.principal.id(),
                error = %e,
                "initial policy verification was not applied"
            );
        }
        flow
    }

    pub fn state(&self) -> AupState {
        self.state
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Feeds `event` through the transition table.
    ///
    /// Invalid events leave the state unchanged.
    pub fn apply(&mut self, event: AupEvent) -> Result<AupState, CredenceError> {
        let next = transition(self.state, event).ok_or_else(|| CredenceError::InvalidTransition {
            state: self.state.to_string(),
            event: event.to_string(),
        })?;
        if next != self.state {
            info!(
                principal = self.principal.id(),
                from = %self.state,
                to = %next,
                event = %event,
                "acceptable usage policy transition"
            );
        }
        self.state = next;
        Ok(next)
    }

    fn ensure_accepts(&self, event: AupEvent) -> Result<(), CredenceError> {
        match transition(self.state, event) {
            Some(_) => Ok(()),
            None => Err(CredenceError::InvalidTransition {
                state: self.state.to_string(),
                event: event.to_string(),
            }),
        }
    }

    /// Re-asks the repository; used to retry from `Error`.
    pub async fn verify(&mut self) -> Result<AupState, CredenceError> {
        self.ensure_accepts(AupEvent::Failed)?;
        match self.repository.verify(&self.principal).await {
            Ok(accepted) => self.apply(AupEvent::Verified { accepted }),
            Err(e) => {
                warn!(principal = self.principal.id(), error = %e, "policy verification failed");
                self.apply(AupEvent::Failed)
            }
        }
    }

    /// The principal accepts the policy.
    pub async fn submit(&mut self) -> Result<AupState, CredenceError> {
        self.ensure_accepts(AupEvent::Submitted { recorded: true })?;
        match self.repository.submit(&self.principal).await {
            Ok(recorded) => self.apply(AupEvent::Submitted { recorded }),
            Err(e) => {
                warn!(principal = self.principal.id(), error = %e, "recording acceptance failed");
                self.apply(AupEvent::Failed)
            }
        }
    }

    /// The principal declines the policy.
    pub fn decline(&mut self) -> Result<AupState, CredenceError> {
        self.apply(AupEvent::Declined)
    }
}
