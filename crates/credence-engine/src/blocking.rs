// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous front end for callers without an async runtime.

use std::sync::Arc;

use credence_core::{Authentication, AuthenticationContext, AuthenticationError, CredenceError, Credential};

use crate::manager::AuthenticationManager;

/// Runs attempts to completion on a private current-thread runtime.
///
/// Must not be called from inside an async context; use
/// [`AuthenticationManager::authenticate`] there instead.
pub struct BlockingAuthenticationManager {
    manager: Arc<AuthenticationManager>,
    runtime: tokio::runtime::Runtime,
}

impl BlockingAuthenticationManager {
    pub fn new(manager: Arc<AuthenticationManager>) -> Result<Self, CredenceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CredenceError::Internal(format!("failed to start runtime: {e}")))?;
        Ok(Self { manager, runtime })
    }

    pub fn authenticate(
        &self,
        credential: &Credential,
        context: Option<&AuthenticationContext>,
    ) -> Result<Authentication, AuthenticationError> {
        self.runtime
            .block_on(self.manager.authenticate(credential, context))
    }

    pub fn manager(&self) -> &Arc<AuthenticationManager> {
        &self.manager
    }

    pub fn shutdown(&self) -> Result<(), CredenceError> {
        self.runtime.block_on(self.manager.shutdown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_core::{ErrorKind, HandlerError};
    use credence_test_utils::ScriptedHandler;

    fn manager() -> Arc<AuthenticationManager> {
        Arc::new(
            AuthenticationManager::builder()
                .handler(Arc::new(ScriptedHandler::failing(
                    "h1",
                    HandlerError::account_not_found("dima not found in backing map."),
                )))
                .handler(Arc::new(ScriptedHandler::succeeding("h2", "scott")))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn blocking_call_matches_async_semantics() {
        let blocking = BlockingAuthenticationManager::new(manager()).unwrap();
        let auth = blocking
            .authenticate(&Credential::username_password("scott", "rutgers"), None)
            .unwrap();
        assert_eq!(auth.principal().id(), "scott");
        assert_eq!(auth.failures()[0].kind, ErrorKind::AccountNotFound);
        assert!(blocking.shutdown().is_ok());
        assert_eq!(blocking.manager().handler_names(), vec!["h1", "h2"]);
    }
}
