// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared credential fixtures.

use std::collections::HashMap;

use credence_core::{CertificateCredential, Credential, ServiceCredential};

/// The reference backing map: plain ASCII, mixed case, and non-ASCII secrets.
pub fn sample_users() -> HashMap<String, String> {
    HashMap::from([
        ("scott".to_string(), "rutgers".to_string()),
        ("dima".to_string(), "javarules".to_string()),
        ("bill".to_string(), "thisisAwesoME".to_string()),
        ("brian".to_string(), "t\u{e4}st".to_string()),
    ])
}

pub fn password(username: &str, password: &str) -> Credential {
    Credential::username_password(username, password)
}

/// A certificate credential; no password handler supports it.
pub fn certificate(subject: &str) -> Credential {
    CertificateCredential {
        subject: subject.to_string(),
        issuer: "CN=Credence Test CA".to_string(),
        serial: "01".to_string(),
    }
    .into()
}

pub fn service(callback_url: &str, service_id: &str) -> Credential {
    ServiceCredential::new(callback_url, service_id).into()
}
