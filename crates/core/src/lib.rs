//! `storefront-core` — shared building blocks for the storefront crates.
//!
//! This crate contains **pure** primitives (no IO, no rendering concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{SessionId, UserId};
