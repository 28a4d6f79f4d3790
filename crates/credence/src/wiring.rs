// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds handlers and the manager from validated configuration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use credence_config::{CredenceConfig, HandlerConfig, HandlerType};
use credence_core::{AuthenticationHandler, ComparatorKind, CredenceError};
use credence_engine::{policy_for, AuthenticationManager};
use credence_handlers::{
    comparator_for, AcceptUsersHandler, Argon2Comparator, Bounded, RejectUsersHandler,
    ServiceCredentialHandler,
};
use tracing::debug;

/// One handler from its `[[handlers]]` entry, wrapped in [`Bounded`] when
/// `timeout_ms` is set.
pub fn build_handler(config: &HandlerConfig) -> Result<Arc<dyn AuthenticationHandler>, CredenceError> {
    let handler: Arc<dyn AuthenticationHandler> = match config.handler_type {
        HandlerType::AcceptUsers => {
            if config.comparator == ComparatorKind::Argon2 {
                for stored in config.users.values() {
                    Argon2Comparator::validate_hash(stored)?;
                }
            }
            let users: HashMap<String, String> = config
                .users
                .iter()
                .map(|(u, p)| (u.clone(), p.clone()))
                .collect();
            let mut handler = AcceptUsersHandler::new(config.name.clone(), users)
                .with_comparator(comparator_for(config.comparator));
            for (name, values) in &config.attributes {
                handler = handler.with_attribute(name.clone(), values.clone());
            }
            Arc::new(handler)
        }
        HandlerType::RejectUsers => Arc::new(RejectUsersHandler::new(
            config.name.clone(),
            config.blocked.iter().cloned(),
        )),
        HandlerType::Service => Arc::new(
            ServiceCredentialHandler::new(
                config.name.clone(),
                config.allowed_services.iter().cloned(),
            )
            .with_require_https(config.require_https),
        ),
    };

    debug!(
        handler = %config.name,
        kind = %config.handler_type,
        timeout_ms = ?config.timeout_ms,
        "handler configured"
    );

    Ok(match config.timeout_ms {
        Some(ms) => Arc::new(Bounded::new(handler, Duration::from_millis(ms))),
        None => handler,
    })
}

/// The manager for a validated configuration.
pub fn build_manager(config: &CredenceConfig) -> Result<AuthenticationManager, CredenceError> {
    let handlers = config
        .handlers
        .iter()
        .map(build_handler)
        .collect::<Result<Vec<_>, _>>()?;

    AuthenticationManager::builder()
        .handlers(handlers)
        .policy(policy_for(config.engine.policy, config.engine.evaluation))
        .concurrent(config.engine.concurrent)
        .build()
}
