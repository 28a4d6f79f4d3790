// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Acceptable usage policy (AUP) flow.
//!
//! Runs after a successful authentication: the principal either already
//! accepted the policy, or must accept or decline it before continuing.
//! Nothing here knows about web frameworks or page rendering.

pub mod flow;
pub mod repository;

pub use flow::{transition, AupEvent, AupFlow, AupState};
pub use repository::{AttributeAupRepository, AupRepository, InMemoryAupRepository};
