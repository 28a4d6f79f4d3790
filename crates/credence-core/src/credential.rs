// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credentials: values presented to prove an identity.
//!
//! [`Credential`] is a closed set of variants. Handlers match on the variant
//! in `supports()` instead of inspecting types at runtime.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Discriminant of a [`Credential`], used in logs and errors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    UsernamePassword,
    Certificate,
    Token,
    Service,
}

/// Something presented to prove identity.
///
/// Credentials are immutable once built; the manager only ever borrows them.
#[derive(Debug)]
pub enum Credential {
    UsernamePassword(UsernamePasswordCredential),
    Certificate(CertificateCredential),
    Token(TokenCredential),
    Service(ServiceCredential),
}

impl Credential {
    /// Convenience constructor for the common username/password case.
    pub fn username_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credential::UsernamePassword(UsernamePasswordCredential::new(username, password))
    }

    pub fn kind(&self) -> CredentialKind {
        match self {
            Credential::UsernamePassword(_) => CredentialKind::UsernamePassword,
            Credential::Certificate(_) => CredentialKind::Certificate,
            Credential::Token(_) => CredentialKind::Token,
            Credential::Service(_) => CredentialKind::Service,
        }
    }

    /// Opaque identifier safe to write to logs. Never contains a secret.
    pub fn audit_id(&self) -> String {
        match self {
            Credential::UsernamePassword(c) => match c.username() {
                Some(u) if !u.is_empty() => u.to_string(),
                _ => "<anonymous>".to_string(),
            },
            Credential::Certificate(c) => c.subject.clone(),
            Credential::Token(c) => match &c.issuer {
                Some(issuer) => format!("token@{issuer}"),
                None => "token".to_string(),
            },
            Credential::Service(c) => c.callback_url.clone(),
        }
    }
}

/// Username plus secret.
///
/// Either part may be absent. Absence is a meaningful state that handlers
/// report with specific error kinds, not a construction error.
#[derive(Debug, Default)]
pub struct UsernamePasswordCredential {
    username: Option<String>,
    password: Option<SecretString>,
}

impl UsernamePasswordCredential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(SecretString::from(password.into())),
        }
    }

    /// For callers that already hold the password as a secret.
    pub fn with_secret(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password),
        }
    }

    /// Build from optional parts, preserving absence.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username,
            password: password.map(SecretString::from),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }
}

impl From<UsernamePasswordCredential> for Credential {
    fn from(value: UsernamePasswordCredential) -> Self {
        Credential::UsernamePassword(value)
    }
}

/// An X.509 client certificate that was already validated at the TLS layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateCredential {
    pub subject: String,
    pub issuer: String,
    pub serial: String,
}

impl From<CertificateCredential> for Credential {
    fn from(value: CertificateCredential) -> Self {
        Credential::Certificate(value)
    }
}

/// An opaque bearer token.
#[derive(Debug)]
pub struct TokenCredential {
    pub token: SecretString,
    pub issuer: Option<String>,
}

impl TokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            issuer: None,
        }
    }
}

impl From<TokenCredential> for Credential {
    fn from(value: TokenCredential) -> Self {
        Credential::Token(value)
    }
}

/// A service callback credential whose URL was validated upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCredential {
    pub callback_url: String,
    pub service_id: String,
}

impl ServiceCredential {
    pub fn new(callback_url: impl Into<String>, service_id: impl Into<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            service_id: service_id.into(),
        }
    }
}

impl From<ServiceCredential> for Credential {
    fn from(value: ServiceCredential) -> Self {
        Credential::Service(value)
    }
}
