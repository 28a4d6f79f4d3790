// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Credence integration tests.
//!
//! # Components
//!
//! - [`ScriptedHandler`] - handler with a fixed verdict and invocation counters
//! - [`fixtures`] - sample backing map and credential constructors

pub mod fixtures;
pub mod scripted;

pub use fixtures::sample_users;
pub use scripted::ScriptedHandler;
