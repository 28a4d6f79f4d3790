// SPDX-FileCopyrightText: 2026 Credence Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concrete authentication handlers.
//!
//! - [`AcceptUsersHandler`]: username/password against an in-memory map.
//! - [`RejectUsersHandler`]: deny list for username/password credentials.
//! - [`ServiceCredentialHandler`]: allow list for service callback credentials.
//! - [`Bounded`]: timeout and cancellation guard around any handler.
//!
//! Every backing store is an immutable snapshot that can be swapped atomically
//! while other attempts are reading it.

pub mod accept_users;
pub mod bounded;
pub mod comparator;
pub mod reject_users;
pub mod service;

pub use accept_users::AcceptUsersHandler;
pub use bounded::Bounded;
pub use comparator::{
    comparator_for, Argon2Comparator, CaseInsensitiveComparator, ExactComparator,
    SecretComparator, TrimmedComparator,
};
pub use reject_users::RejectUsersHandler;
pub use service::ServiceCredentialHandler;
