//! Point-in-time view of the session authority.

use serde::Serialize;
use thiserror::Error;

use crate::{Role, SessionAuthority, User};

/// Degraded conditions the guard layer absorbs instead of surfacing.
///
/// Each one is logged and resolved to the most restrictive reading of the
/// session; none of them ever reaches a view as an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardFault {
    #[error("session initialization failed: {0}")]
    InitializationFailure(String),

    #[error("authenticated session has no resolvable role")]
    UnresolvableRole,

    #[error("authenticated flag set without a current user")]
    MissingCurrentUser,
}

/// Where a session sits in the access state machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    AuthenticatedIncomplete,
    AuthenticatedComplete,
}

/// Immutable read of the session authority taken at evaluation time.
///
/// # Invariants
/// - Unauthenticated snapshots carry no user, no role and no completion flag.
/// - `role` is `None` whenever `current_user` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    authenticated: bool,
    current_user: Option<User>,
    needs_profile_completion: bool,
    role: Option<Role>,
    is_google_user: bool,
}

impl SessionSnapshot {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Snapshot of a signed-in user, with every flag derived from the profile.
    pub fn signed_in(user: User) -> Self {
        Self {
            authenticated: true,
            needs_profile_completion: user.needs_profile_completion(),
            role: user.role,
            is_google_user: user.provider.is_social(),
            current_user: Some(user),
        }
    }

    /// Override the completion flag (the authority is the source of truth for
    /// it, not the profile shape).
    pub fn with_profile_completion_required(mut self, required: bool) -> Self {
        self.needs_profile_completion = self.authenticated && required;
        self
    }

    /// Read a fresh snapshot from the authority.
    pub fn read<A: SessionAuthority + ?Sized>(authority: &A) -> Self {
        if !authority.is_authenticated() {
            return Self::anonymous();
        }

        let current_user = authority.current_user();
        let role = match &current_user {
            None => {
                tracing::warn!(fault = %GuardFault::MissingCurrentUser, "treating session as roleless");
                None
            }
            Some(user) => {
                let role = authority.user_role();
                if role.is_none() {
                    tracing::warn!(
                        fault = %GuardFault::UnresolvableRole,
                        user_id = %user.id,
                        "role-scoped checks will fail"
                    );
                }
                role
            }
        };

        Self {
            authenticated: true,
            current_user,
            needs_profile_completion: authority.needs_profile_completion(),
            role,
            is_google_user: authority.is_google_user(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn needs_profile_completion(&self) -> bool {
        self.needs_profile_completion
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_google_user(&self) -> bool {
        self.is_google_user
    }

    pub fn state(&self) -> SessionState {
        match (self.authenticated, self.needs_profile_completion) {
            (false, _) => SessionState::Unauthenticated,
            (true, true) => SessionState::AuthenticatedIncomplete,
            (true, false) => SessionState::AuthenticatedComplete,
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use storefront_core::UserId;

    use super::*;
    use crate::{
        AuthProvider, AuthorityError, Credentials, MemorySessionAuthority, ProfileCompletion,
        ProfileUpdate,
    };

    /// Authority that claims a session but cannot produce its user.
    struct HeadlessAuthority;

    #[async_trait(?Send)]
    impl SessionAuthority for HeadlessAuthority {
        async fn initialize_auth(&self) -> Result<bool, AuthorityError> {
            Ok(true)
        }
        fn is_authenticated(&self) -> bool {
            true
        }
        fn needs_profile_completion(&self) -> bool {
            false
        }
        fn user_role(&self) -> Option<Role> {
            Some(Role::Admin)
        }
        fn current_user(&self) -> Option<User> {
            None
        }
        fn is_google_user(&self) -> bool {
            false
        }
        async fn login(&self, _: &Credentials) -> Result<User, AuthorityError> {
            Err(AuthorityError::InvalidCredentials)
        }
        fn logout(&self) {}
        async fn update_profile(&self, _: &ProfileUpdate) -> Result<User, AuthorityError> {
            Err(AuthorityError::NotAuthenticated)
        }
        async fn complete_social_profile(
            &self,
            _: &ProfileCompletion,
        ) -> Result<User, AuthorityError> {
            Err(AuthorityError::NotAuthenticated)
        }
    }

    #[test]
    fn anonymous_snapshot_is_unauthenticated() {
        let snapshot = SessionSnapshot::anonymous();
        assert_eq!(snapshot.state(), SessionState::Unauthenticated);
        assert!(snapshot.current_user().is_none());
        assert_eq!(snapshot.role(), None);
    }

    #[test]
    fn completion_flag_cannot_be_set_on_anonymous() {
        let snapshot = SessionSnapshot::anonymous().with_profile_completion_required(true);
        assert!(!snapshot.needs_profile_completion());
    }

    #[test]
    fn google_sign_in_starts_incomplete() {
        let user = User::new(UserId::new(), "g@example.com", "G").with_provider(AuthProvider::Google);
        let snapshot = SessionSnapshot::signed_in(user);
        assert!(snapshot.is_google_user());
        assert_eq!(snapshot.state(), SessionState::AuthenticatedIncomplete);
    }

    #[test]
    fn missing_user_discards_role() {
        let snapshot = SessionSnapshot::read(&HeadlessAuthority);
        assert!(snapshot.is_authenticated());
        assert_eq!(snapshot.role(), None);
    }

    #[test]
    fn read_reflects_logout_immediately() {
        let authority = MemorySessionAuthority::new();
        authority.sign_in_with_google("g@example.com", "G");
        assert!(SessionSnapshot::read(&authority).is_authenticated());

        authority.logout();
        assert_eq!(SessionSnapshot::read(&authority), SessionSnapshot::anonymous());
    }
}
