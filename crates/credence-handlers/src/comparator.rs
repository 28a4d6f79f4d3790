// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pluggable secret comparison strategies.
//!
//! The baseline is exact, case-sensitive equality over the UTF-8 bytes.
//! Anything looser has to be chosen explicitly in configuration.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordVerifier};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use tracing::warn;

use credence_core::{ComparatorKind, CredenceError};

/// Compares a presented secret with the stored one.
pub trait SecretComparator: Send + Sync + 'static {
    fn matches(&self, presented: &SecretString, stored: &SecretString) -> bool;
}

/// Build the comparator for a configured strategy.
pub fn comparator_for(kind: ComparatorKind) -> Arc<dyn SecretComparator> {
    match kind {
        ComparatorKind::Exact => Arc::new(ExactComparator),
        ComparatorKind::CaseInsensitive => Arc::new(CaseInsensitiveComparator),
        ComparatorKind::Trimmed => Arc::new(TrimmedComparator),
        ComparatorKind::Argon2 => Arc::new(Argon2Comparator),
    }
}

fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    bool::from(a.ct_eq(b))
}

/// Exact byte equality, constant time for equal-length inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactComparator;

impl SecretComparator for ExactComparator {
    fn matches(&self, presented: &SecretString, stored: &SecretString) -> bool {
        bytes_equal(
            presented.expose_secret().as_bytes(),
            stored.expose_secret().as_bytes(),
        )
    }
}

/// Unicode lowercase on both sides before comparing.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveComparator;

impl SecretComparator for CaseInsensitiveComparator {
    fn matches(&self, presented: &SecretString, stored: &SecretString) -> bool {
        let presented = presented.expose_secret().to_lowercase();
        let stored = stored.expose_secret().to_lowercase();
        bytes_equal(presented.as_bytes(), stored.as_bytes())
    }
}

/// Ignores leading and trailing whitespace on both sides.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimmedComparator;

impl SecretComparator for TrimmedComparator {
    fn matches(&self, presented: &SecretString, stored: &SecretString) -> bool {
        bytes_equal(
            presented.expose_secret().trim().as_bytes(),
            stored.expose_secret().trim().as_bytes(),
        )
    }
}

/// Stored values are Argon2 PHC strings; the presented secret is verified
/// against them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Comparator;

impl Argon2Comparator {
    /// Check that `stored` parses as a PHC hash string.
    pub fn validate_hash(stored: &str) -> Result<(), CredenceError> {
        PasswordHash::new(stored)
            .map(|_| ())
            .map_err(|e| CredenceError::Hashing(format!("invalid PHC hash: {e}")))
    }
}

impl SecretComparator for Argon2Comparator {
    fn matches(&self, presented: &SecretString, stored: &SecretString) -> bool {
        let hash = match PasswordHash::new(stored.expose_secret()) {
            Ok(hash) => hash,
            Err(e) => {
                warn!(error = %e, "stored secret is not a valid PHC hash");
                return false;
            }
        };
        argon2::Argon2::default()
            .verify_password(presented.expose_secret().as_bytes(), &hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::password_hash::{PasswordHasher, SaltString};

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn exact_is_case_sensitive() {
        let c = ExactComparator;
        assert!(c.matches(&secret("thisisAwesoME"), &secret("thisisAwesoME")));
        assert!(!c.matches(&secret("thisisawesome"), &secret("thisisAwesoME")));
        assert!(!c.matches(&secret("rutgers "), &secret("rutgers")));
    }

    #[test]
    fn exact_handles_non_ascii() {
        let c = ExactComparator;
        assert!(c.matches(&secret("t\u{e4}st"), &secret("t\u{e4}st")));
        assert!(!c.matches(&secret("test"), &secret("t\u{e4}st")));
    }

    #[test]
    fn case_insensitive_folds_unicode() {
        let c = CaseInsensitiveComparator;
        assert!(c.matches(&secret("T\u{c4}ST"), &secret("t\u{e4}st")));
        assert!(!c.matches(&secret("tast"), &secret("t\u{e4}st")));
    }

    #[test]
    fn trimmed_ignores_surrounding_whitespace_only() {
        let c = TrimmedComparator;
        assert!(c.matches(&secret("  rutgers\n"), &secret("rutgers")));
        assert!(!c.matches(&secret("rut gers"), &secret("rutgers")));
    }

    #[test]
    fn argon2_verifies_phc_hash() {
        let salt = SaltString::encode_b64(b"credence-salt-16").unwrap();
        let hash = argon2::Argon2::default()
            .hash_password(b"javarules", &salt)
            .unwrap()
            .to_string();
        assert!(Argon2Comparator::validate_hash(&hash).is_ok());

        let c = Argon2Comparator;
        assert!(c.matches(&secret("javarules"), &secret(&hash)));
        assert!(!c.matches(&secret("JavaRules"), &secret(&hash)));
    }

    #[test]
    fn argon2_rejects_plaintext_store() {
        assert!(Argon2Comparator::validate_hash("javarules").is_err());
        assert!(!Argon2Comparator.matches(&secret("javarules"), &secret("javarules")));
    }

    #[test]
    fn comparator_for_selects_strategy() {
        let loose = comparator_for(ComparatorKind::Trimmed);
        assert!(loose.matches(&secret(" rutgers"), &secret("rutgers")));
        let strict = comparator_for(ComparatorKind::Exact);
        assert!(!strict.matches(&secret(" rutgers"), &secret("rutgers")));
    }
}
