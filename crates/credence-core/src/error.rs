// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the Credence authentication engine.
//!
//! Three layers:
//! - [`HandlerError`]: one handler's verdict on one credential.
//! - [`AuthenticationError`]: what the manager hands back to its caller.
//! - [`CredenceError`]: everything that is not a verdict (config, lifecycle, hashing).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::credential::CredentialKind;

/// Closed set of reasons a handler can refuse a credential.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum ErrorKind {
    /// The asserted identity does not exist, or the identifier is unusable.
    AccountNotFound,
    /// The identity exists but the proof does not match.
    FailedLogin,
    /// No handler declared support for the credential variant.
    UnsupportedCredential,
    /// An external dependency of the handler failed or timed out.
    HandlerUnavailable,
    /// The caller abandoned the attempt.
    Canceled,
}

impl ErrorKind {
    /// Rank used to pick the dominant kind out of a mixed failure set.
    ///
    /// `FailedLogin` ranks highest since lockout accounting keys off it.
    pub fn precedence(self) -> u8 {
        match self {
            ErrorKind::FailedLogin => 4,
            ErrorKind::AccountNotFound => 3,
            ErrorKind::HandlerUnavailable => 2,
            ErrorKind::UnsupportedCredential => 1,
            ErrorKind::Canceled => 0,
        }
    }
}

/// A single handler's refusal, carried as a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    pub kind: ErrorKind,
    pub message: String,
}

impl HandlerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn account_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountNotFound, message)
    }

    pub fn failed_login(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FailedLogin, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::HandlerUnavailable, message)
    }

    pub fn canceled() -> Self {
        Self::new(ErrorKind::Canceled, "Authentication canceled.")
    }
}

/// A handler refusal tagged with the name of the handler that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerFailure {
    pub handler: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl HandlerFailure {
    pub fn from_error(handler: impl Into<String>, error: HandlerError) -> Self {
        Self {
            handler: handler.into(),
            kind: error.kind,
            message: error.message,
        }
    }
}

/// The only errors the authentication manager returns to its caller.
///
/// Display output never names a handler; the per-handler detail lives in
/// [`AuthenticationError::failures`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    /// No registered handler supports the presented credential variant.
    #[error("no authentication handler supports {credential} credentials")]
    UnsupportedCredential { credential: CredentialKind },

    /// The configured policy rejected the attempt.
    #[error("authentication failed: {}", summarize(failures))]
    PolicyNotSatisfied { failures: Vec<HandlerFailure> },
}

fn summarize(failures: &[HandlerFailure]) -> String {
    match failures.iter().max_by_key(|f| f.kind.precedence()) {
        Some(f) => f.kind.to_string(),
        None => "no verdict recorded".to_string(),
    }
}

impl AuthenticationError {
    /// Per-handler failures in the order they were recorded.
    pub fn failures(&self) -> &[HandlerFailure] {
        match self {
            AuthenticationError::UnsupportedCredential { .. } => &[],
            AuthenticationError::PolicyNotSatisfied { failures } => failures,
        }
    }

    /// Ordered failure kinds, one per failed handler.
    pub fn kinds(&self) -> Vec<ErrorKind> {
        match self {
            AuthenticationError::UnsupportedCredential { .. } => {
                vec![ErrorKind::UnsupportedCredential]
            }
            AuthenticationError::PolicyNotSatisfied { failures } => {
                failures.iter().map(|f| f.kind).collect()
            }
        }
    }

    /// The highest-precedence kind present; see [`ErrorKind::precedence`].
    ///
    /// `None` when no failure was recorded.
    pub fn dominant_kind(&self) -> Option<ErrorKind> {
        self.kinds().into_iter().max_by_key(|k| k.precedence())
    }

    /// The single kind shared by every non-canceled failure, if they agree.
    pub fn uniform_kind(&self) -> Option<ErrorKind> {
        let mut kinds = self
            .kinds()
            .into_iter()
            .filter(|k| *k != ErrorKind::Canceled);
        let first = kinds.next()?;
        kinds.all(|k| k == first).then_some(first)
    }

    /// True when at least one handler reported `FailedLogin`.
    pub fn is_failed_login(&self) -> bool {
        self.kinds().contains(&ErrorKind::FailedLogin)
    }
}

/// Errors outside the per-attempt verdict path.
#[derive(Debug, Error)]
pub enum CredenceError {
    /// Configuration errors (bad handler definition, invalid comparator input).
    #[error("configuration error: {0}")]
    Config(String),

    /// Password hashing or hash parsing failed.
    #[error("hashing error: {0}")]
    Hashing(String),

    /// A state machine received an event its current state does not accept.
    #[error("invalid transition: {event} while {state}")]
    InvalidTransition { state: String, event: String },

    /// A handler failed to release its resources.
    #[error("shutdown failed for {name}: {source}")]
    Shutdown {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
