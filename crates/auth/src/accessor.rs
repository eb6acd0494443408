//! Derived session state for views that branch on the session without
//! going through a guard.

use std::rc::Rc;

use crate::{
    AuthorityError, Credentials, ProfileCompletion, ProfileUpdate, Role, SessionAuthority,
    SessionSnapshot, SessionState, User,
};

/// Read/action handle bundle over the session authority.
///
/// Every getter re-reads the authority. Actions forward unchanged.
pub struct SessionAccessor<A: ?Sized> {
    authority: Rc<A>,
}

impl<A: ?Sized> Clone for SessionAccessor<A> {
    fn clone(&self) -> Self {
        Self {
            authority: Rc::clone(&self.authority),
        }
    }
}

impl<A: SessionAuthority + ?Sized> SessionAccessor<A> {
    pub fn new(authority: Rc<A>) -> Self {
        Self { authority }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::read(&*self.authority)
    }

    pub fn state(&self) -> SessionState {
        self.snapshot().state()
    }

    pub fn user(&self) -> Option<User> {
        self.snapshot().current_user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authority.is_authenticated()
    }

    pub fn needs_profile_completion(&self) -> bool {
        self.snapshot().needs_profile_completion()
    }

    pub fn is_google_user(&self) -> bool {
        self.snapshot().is_google_user()
    }

    pub fn role(&self) -> Option<Role> {
        self.snapshot().role()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthorityError> {
        let result = self.authority.login(credentials).await;
        match &result {
            Ok(user) => tracing::info!(user_id = %user.id, "login succeeded"),
            Err(e) => tracing::info!(error = %e, "login rejected"),
        }
        result
    }

    pub fn logout(&self) {
        tracing::info!("logout");
        self.authority.logout();
    }

    pub async fn update_profile(&self, fields: &ProfileUpdate) -> Result<User, AuthorityError> {
        self.authority.update_profile(fields).await
    }

    pub async fn complete_social_profile(
        &self,
        fields: &ProfileCompletion,
    ) -> Result<User, AuthorityError> {
        self.authority.complete_social_profile(fields).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySessionAuthority;

    #[tokio::test]
    async fn accessor_walks_the_session_state_machine() {
        let authority = Rc::new(MemorySessionAuthority::new());
        let session = SessionAccessor::new(authority.clone());
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(session.role(), None);

        authority.sign_in_with_google("gina@example.com", "Gina");
        assert_eq!(session.state(), SessionState::AuthenticatedIncomplete);
        assert!(session.is_google_user());
        assert_eq!(session.role(), Some(Role::User));

        session
            .complete_social_profile(&ProfileCompletion::new("555-0100", "1 Main St"))
            .await
            .unwrap();
        assert_eq!(session.state(), SessionState::AuthenticatedComplete);

        session.logout();
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn clones_observe_the_same_authority() {
        let authority = Rc::new(MemorySessionAuthority::new());
        authority.register("ann@example.com", "pw", "Ann", "admin");
        let header = SessionAccessor::new(authority);
        let account_page = header.clone();

        account_page
            .login(&Credentials::new("ann@example.com", "pw"))
            .await
            .unwrap();
        assert!(header.is_authenticated());
        assert_eq!(header.role(), Some(Role::Admin));

        let update = ProfileUpdate {
            display_name: Some("Ann B".to_string()),
            ..Default::default()
        };
        header.update_profile(&update).await.unwrap();
        assert_eq!(account_page.user().map(|u| u.display_name), Some("Ann B".to_string()));
    }

    #[tokio::test]
    async fn failed_login_leaves_session_anonymous() {
        let session = SessionAccessor::new(Rc::new(MemorySessionAuthority::new()));
        let err = session
            .login(&Credentials::new("ghost@example.com", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthorityError::InvalidCredentials);
        assert!(!session.is_authenticated());
    }
}
