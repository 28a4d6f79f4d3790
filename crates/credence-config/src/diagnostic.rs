// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment failures into miette diagnostics.
//!
//! Unknown keys carry a span into the offending TOML file and a
//! Jaro-Winkler "did you mean" hint; bad variants list the accepted names.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(credence::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if any is similar enough.
        suggestion: Option<String>,
        /// Comma-separated valid keys for the section.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type or an unknown variant.
    #[error("invalid value for key `{key}`: {detail}")]
    #[diagnostic(code(credence::config::invalid_value), help("expected {expected}"))]
    InvalidValue {
        key: String,
        detail: String,
        expected: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(credence::config::missing_key),
        help("add `{key} = <value>` to your credence.toml")
    )]
    MissingKey { key: String },

    /// A semantic check failed after deserialization.
    #[error("validation error: {message}")]
    #[diagnostic(code(credence::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(credence::config::other))]
    Other(String),
}

impl ConfigError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ConfigError::Validation {
            message: message.into(),
        }
    }
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

fn dotted(path: &[String]) -> String {
    path.join(".")
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| to_config_error(&error, sources))
        .collect()
}

fn to_config_error(error: &figment::Error, sources: &[(String, String)]) -> ConfigError {
    use figment::error::Kind;

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let (span, src) = locate(error, field, sources).unzip();
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::UnknownVariant(actual, expected) => {
            let mut accepted = format!("one of {}", expected.join(", "));
            if let Some(hint) = suggest_key(actual, expected) {
                accepted.push_str(&format!(" (did you mean `{hint}`?)"));
            }
            ConfigError::InvalidValue {
                key: dotted(&error.path),
                detail: format!("unknown variant `{actual}`"),
                expected: accepted,
            }
        }
        Kind::MissingField(field) => {
            let mut key = error.path.clone();
            key.push(field.to_string());
            ConfigError::MissingKey { key: dotted(&key) }
        }
        Kind::InvalidType(actual, expected) => ConfigError::InvalidValue {
            key: dotted(&error.path),
            detail: format!("{actual} is not {expected}"),
            expected: expected.to_string(),
        },
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Span and source text for an unknown `field`, when the TOML it came from
/// is among `sources`.
fn locate(
    error: &figment::Error,
    field: &str,
    sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let origin = error.metadata.as_ref().and_then(|m| match &m.source {
        Some(figment::Source::File(path)) => Some(path.display().to_string()),
        _ => None,
    });

    // Inline strings have no file path; fall back to the only source given.
    let (name, content) = match origin {
        Some(origin) => sources.iter().find(|(name, _)| *name == origin)?,
        None if sources.len() == 1 => &sources[0],
        None => return None,
    };

    let offset = find_key_offset(content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(name, content.clone()),
    ))
}

/// Byte offset of `field` inside the table named by `path`.
///
/// `["engine"]` searches after `[engine]`; `["handlers", "1"]` searches after
/// the second `[[handlers]]` header. An empty path searches from the start.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let table_start = match path {
        [] => 0,
        [table] => {
            let header = format!("[{table}]");
            content.find(&header)? + header.len()
        }
        [table, index, ..] => {
            let header = format!("[[{table}]]");
            let (pos, _) = content.match_indices(&header).nth(index.parse().ok()?)?;
            pos + header.len()
        }
    };

    let mut line_start = table_start;
    for (n, line) in content[table_start..].split_inclusive('\n').enumerate() {
        let body = line.trim_start();
        if n > 0 && body.starts_with('[') {
            return None;
        }
        let is_key = body
            .strip_prefix(field)
            .is_some_and(|rest| rest.starts_with([' ', '\t', '=']));
        if is_key {
            return Some(line_start + (line.len() - body.len()));
        }
        line_start += line.len();
    }

    None
}

/// Best Jaro-Winkler match above the threshold, if any.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_to_string(errors));
}

/// Render every diagnostic with miette's graphical handler, falling back to
/// the plain message when a report cannot be drawn.
pub fn render_to_string(errors: &[ConfigError]) -> String {
    let handler =
        miette::GraphicalReportHandler::new_themed(miette::GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error as &dyn Diagnostic) {
            Ok(()) => out.push_str(&report),
            Err(_) => out.push_str(&format!("Error: {error}\n")),
        }
    }
    out
}
