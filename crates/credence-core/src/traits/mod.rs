// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for pluggable authentication backends.

pub mod handler;

pub use handler::AuthenticationHandler;
