// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Credence authentication engine.
//!
//! This crate provides the credential and principal types, the
//! [`AuthenticationHandler`] trait every backend implements, and the error
//! taxonomy shared by handlers, the manager, and callers.

pub mod authentication;
pub mod credential;
pub mod error;
pub mod principal;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use authentication::{Authentication, HandlerOutcome, HandlerSuccess};
pub use credential::{
    CertificateCredential, Credential, CredentialKind, ServiceCredential, TokenCredential,
    UsernamePasswordCredential,
};
pub use error::{AuthenticationError, CredenceError, ErrorKind, HandlerError, HandlerFailure};
pub use principal::{Attributes, DefaultPrincipalFactory, Principal, PrincipalFactory};
pub use traits::AuthenticationHandler;
pub use types::{
    AuthenticationContext, ComparatorKind, EvaluationMode, HealthStatus, PolicyKind,
};
