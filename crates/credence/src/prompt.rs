// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password acquisition via stdin or TTY prompt.

use std::io::BufRead;

use credence_core::CredenceError;
use secrecy::SecretString;

/// Get the password for `authenticate`.
///
/// Priority:
/// 1. First line of stdin when `from_stdin` is set (for scripts)
/// 2. Interactive TTY prompt via `rpassword` (for human operators)
pub fn read_password(from_stdin: bool) -> Result<SecretString, CredenceError> {
    if from_stdin {
        return read_secret_line(std::io::stdin().lock());
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Password: ");
        let password = rpassword::read_password()
            .map_err(|e| CredenceError::Internal(format!("failed to read password: {e}")))?;
        return Ok(SecretString::from(password));
    }

    Err(CredenceError::Config(
        "No password provided. Pass --password-stdin or run interactively.".to_string(),
    ))
}

/// Reads one line, dropping the line terminator but nothing else.
pub fn read_secret_line(mut reader: impl BufRead) -> Result<SecretString, CredenceError> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| CredenceError::Internal(format!("failed to read password: {e}")))?;
    let trimmed = line
        .strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(&line);
    Ok(SecretString::from(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn strips_only_the_line_terminator() {
        let secret = read_secret_line(&b"  spaced out \r\nignored\n"[..]).unwrap();
        assert_eq!(secret.expose_secret(), "  spaced out ");
    }

    #[test]
    fn keeps_non_ascii_and_missing_newline() {
        let secret = read_secret_line("t\u{e4}st".as_bytes()).unwrap();
        assert_eq!(secret.expose_secret(), "t\u{e4}st");
    }
}
