// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication policies: how per-handler outcomes become one verdict.
//!
//! Policies only look at the ordered outcome sequence, so the same sequence
//! always yields the same decision. Canceled outcomes are skipped.

use std::sync::Arc;

use credence_core::{ErrorKind, EvaluationMode, HandlerOutcome, PolicyKind};

/// Result of evaluating a policy over an outcome sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub success: bool,
    /// Kinds of the failures that count against the attempt, in order.
    /// Empty on success.
    pub failure_kinds: Vec<ErrorKind>,
}

impl PolicyDecision {
    fn satisfied() -> Self {
        Self {
            success: true,
            failure_kinds: Vec::new(),
        }
    }

    fn rejected(outcomes: &[HandlerOutcome]) -> Self {
        Self {
            success: false,
            failure_kinds: counted(outcomes)
                .filter_map(|o| match o {
                    HandlerOutcome::Failure(f) => Some(f.kind),
                    HandlerOutcome::Success(_) => None,
                })
                .collect(),
        }
    }
}

/// Outcomes that take part in a verdict.
fn counted(outcomes: &[HandlerOutcome]) -> impl Iterator<Item = &HandlerOutcome> {
    outcomes.iter().filter(|o| !o.is_canceled())
}

/// Combines handler outcomes into an overall verdict.
pub trait AuthenticationPolicy: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn mode(&self) -> EvaluationMode;

    /// Whether the manager can stop invoking handlers after `outcomes`.
    ///
    /// Always false in exhaustive mode.
    fn is_settled(&self, outcomes: &[HandlerOutcome]) -> bool;

    fn evaluate(&self, outcomes: &[HandlerOutcome]) -> PolicyDecision;
}

/// Succeeds when at least one attempted handler succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnySucceeds {
    mode: EvaluationMode,
}

impl AnySucceeds {
    pub fn new(mode: EvaluationMode) -> Self {
        Self { mode }
    }
}

impl AuthenticationPolicy for AnySucceeds {
    fn name(&self) -> &str {
        "any-succeeds"
    }

    fn mode(&self) -> EvaluationMode {
        self.mode
    }

    fn is_settled(&self, outcomes: &[HandlerOutcome]) -> bool {
        self.mode == EvaluationMode::ShortCircuit && outcomes.iter().any(|o| o.is_success())
    }

    fn evaluate(&self, outcomes: &[HandlerOutcome]) -> PolicyDecision {
        if counted(outcomes).any(|o| o.is_success()) {
            PolicyDecision::satisfied()
        } else {
            PolicyDecision::rejected(outcomes)
        }
    }
}

/// Succeeds only when every attempted handler succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllMustSucceed {
    mode: EvaluationMode,
}

impl AllMustSucceed {
    pub fn new(mode: EvaluationMode) -> Self {
        Self { mode }
    }
}

impl AuthenticationPolicy for AllMustSucceed {
    fn name(&self) -> &str {
        "all-must-succeed"
    }

    fn mode(&self) -> EvaluationMode {
        self.mode
    }

    fn is_settled(&self, outcomes: &[HandlerOutcome]) -> bool {
        self.mode == EvaluationMode::ShortCircuit
            && counted(outcomes).any(|o| !o.is_success())
    }

    fn evaluate(&self, outcomes: &[HandlerOutcome]) -> PolicyDecision {
        let mut considered = counted(outcomes).peekable();
        if considered.peek().is_none() {
            return PolicyDecision::rejected(outcomes);
        }
        if considered.all(|o| o.is_success()) {
            PolicyDecision::satisfied()
        } else {
            PolicyDecision::rejected(outcomes)
        }
    }
}

/// Build the policy for a configured kind and mode.
pub fn policy_for(kind: PolicyKind, mode: EvaluationMode) -> Arc<dyn AuthenticationPolicy> {
    match kind {
        PolicyKind::AnySucceeds => Arc::new(AnySucceeds::new(mode)),
        PolicyKind::AllMustSucceed => Arc::new(AllMustSucceed::new(mode)),
    }
}
