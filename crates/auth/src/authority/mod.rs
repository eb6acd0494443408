//! Session authority contract.
//!
//! The authority owns credentials, persistence and network calls. This layer
//! only consumes the narrow surface below; a concrete store is injected by the
//! host application.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use storefront_core::DomainError;

use crate::{Credentials, ProfileCompletion, ProfileUpdate, Role, User};

pub use memory::MemorySessionAuthority;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not signed in")]
    NotAuthenticated,

    #[error("persisted session is corrupted: {0}")]
    CorruptSession(String),

    #[error("session storage unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Everything the guard layer needs from the session store.
///
/// Reads are synchronous and must reflect the authority's current state on
/// every call. The async methods are the only points where the host may touch
/// storage or the network.
#[async_trait(?Send)]
pub trait SessionAuthority {
    /// Restore any persisted session. Idempotent: later calls return the
    /// outcome of the first without re-reading storage.
    async fn initialize_auth(&self) -> Result<bool, AuthorityError>;

    fn is_authenticated(&self) -> bool;

    fn needs_profile_completion(&self) -> bool;

    fn user_role(&self) -> Option<Role>;

    fn current_user(&self) -> Option<User>;

    fn is_google_user(&self) -> bool;

    async fn login(&self, credentials: &Credentials) -> Result<User, AuthorityError>;

    /// Drop the session and any persisted state.
    fn logout(&self);

    async fn update_profile(&self, fields: &ProfileUpdate) -> Result<User, AuthorityError>;

    async fn complete_social_profile(
        &self,
        fields: &ProfileCompletion,
    ) -> Result<User, AuthorityError>;
}
