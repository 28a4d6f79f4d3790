// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication engine: handler resolution, policy evaluation, and the
//! manager that ties them together.
//!
//! An attempt flows resolver -> handlers -> policy -> principal factory. The
//! manager returns either an [`credence_core::Authentication`] or one of the
//! two [`credence_core::AuthenticationError`] variants.

pub mod blocking;
pub mod manager;
pub mod policy;
pub mod resolver;

pub use blocking::BlockingAuthenticationManager;
pub use manager::{AuthenticationManager, AuthenticationManagerBuilder, PRINCIPAL_RESOLUTION};
pub use policy::{policy_for, AllMustSucceed, AnySucceeds, AuthenticationPolicy, PolicyDecision};
pub use resolver::HandlerResolver;
