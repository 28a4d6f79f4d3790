// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-handler outcomes and the aggregate [`Authentication`] result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CredenceError, ErrorKind, HandlerFailure};
use crate::principal::Principal;

/// A handler that accepted the credential, with the principal it resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSuccess {
    pub handler: String,
    pub principal: Principal,
}

/// What one handler said about one credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    Success(HandlerSuccess),
    Failure(HandlerFailure),
}

impl HandlerOutcome {
    pub fn handler(&self) -> &str {
        match self {
            HandlerOutcome::Success(s) => &s.handler,
            HandlerOutcome::Failure(f) => &f.handler,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HandlerOutcome::Success(_))
    }

    /// Canceled outcomes are recorded but never count toward a policy verdict.
    pub fn is_canceled(&self) -> bool {
        matches!(self, HandlerOutcome::Failure(f) if f.kind == ErrorKind::Canceled)
    }
}

/// The aggregate result of one successful authentication attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authentication {
    principal: Principal,
    successes: Vec<HandlerSuccess>,
    failures: Vec<HandlerFailure>,
    authenticated_at: DateTime<Utc>,
}

impl Authentication {
    /// Assemble a result, checking that `principal` is backed by a success.
    pub fn new(
        principal: Principal,
        successes: Vec<HandlerSuccess>,
        failures: Vec<HandlerFailure>,
    ) -> Result<Self, CredenceError> {
        if !successes.iter().any(|s| s.principal.id() == principal.id()) {
            return Err(CredenceError::Internal(format!(
                "principal `{}` is not backed by any successful handler",
                principal.id()
            )));
        }
        Ok(Self {
            principal,
            successes,
            failures,
            authenticated_at: Utc::now(),
        })
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Successful handler outcomes in evaluation order.
    pub fn successes(&self) -> &[HandlerSuccess] {
        &self.successes
    }

    /// Handlers that were attempted and failed, in evaluation order.
    pub fn failures(&self) -> &[HandlerFailure] {
        &self.failures
    }

    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }

    /// Names of the handlers that accepted the credential.
    pub fn successful_handlers(&self) -> Vec<&str> {
        self.successes.iter().map(|s| s.handler.as_str()).collect()
    }
}
