//! In-memory session authority.
//!
//! Backs the demo binary and the tests. Accounts live in a map, the "persisted"
//! session is a JSON string standing in for browser storage.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use storefront_core::{SessionId, UserId};

use super::{AuthorityError, SessionAuthority};
use crate::{AuthProvider, Credentials, ProfileCompletion, ProfileUpdate, Role, User};

#[derive(Debug, Clone)]
struct Account {
    password: Option<String>,
    user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    session_id: SessionId,
    user: User,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    session: Option<PersistedSession>,
    storage: Option<String>,
    initialized: Option<bool>,
    init_failure: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemorySessionAuthority {
    state: RefCell<State>,
}

impl MemorySessionAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a password account. `role` is the raw role string as a
    /// backend would send it; unknown values leave the user without a role.
    pub fn register(&self, email: &str, password: &str, display_name: &str, role: &str) -> User {
        let resolved = Role::resolve(role);
        if resolved.is_none() {
            tracing::warn!(email, role, "registering account with unrecognised role");
        }

        let user = User::new(UserId::new(), email.trim().to_lowercase(), display_name)
            .with_role(resolved);
        self.state.borrow_mut().accounts.insert(
            user.email.clone(),
            Account {
                password: Some(password.to_string()),
                user: user.clone(),
            },
        );
        user
    }

    /// Google sign-in shortcut. First-time users get the `user` role and an
    /// incomplete profile.
    pub fn sign_in_with_google(&self, email: &str, display_name: &str) -> User {
        let email = email.trim().to_lowercase();
        let mut state = self.state.borrow_mut();
        let account = state.accounts.entry(email.clone()).or_insert_with(|| Account {
            password: None,
            user: User::new(UserId::new(), email, display_name)
                .with_provider(AuthProvider::Google),
        });
        let user = account.user.clone();
        start_session(&mut state, user.clone());
        user
    }

    /// Seed the storage slot directly (e.g. a session left by a previous visit).
    pub fn set_stored_session(&self, raw: impl Into<String>) {
        self.state.borrow_mut().storage = Some(raw.into());
    }

    pub fn stored_session(&self) -> Option<String> {
        self.state.borrow().storage.clone()
    }

    /// Make the next `initialize_auth` call fail with `reason`.
    pub fn fail_initialization(&self, reason: impl Into<String>) {
        self.state.borrow_mut().init_failure = Some(reason.into());
    }

    fn with_session_user<F>(&self, edit: F) -> Result<User, AuthorityError>
    where
        F: FnOnce(&mut User),
    {
        let mut state = self.state.borrow_mut();
        let session = state.session.as_mut().ok_or(AuthorityError::NotAuthenticated)?;
        edit(&mut session.user);
        let user = session.user.clone();

        if let Some(account) = state.accounts.get_mut(&user.email) {
            account.user = user.clone();
        }
        persist(&mut state);
        Ok(user)
    }
}

fn start_session(state: &mut State, user: User) {
    state.session = Some(PersistedSession {
        session_id: SessionId::new(),
        user,
    });
    persist(state);
}

fn persist(state: &mut State) {
    match &state.session {
        Some(session) => match serde_json::to_string(session) {
            Ok(raw) => state.storage = Some(raw),
            Err(e) => tracing::warn!(error = %e, "failed to persist session"),
        },
        None => state.storage = None,
    }
}

#[async_trait(?Send)]
impl SessionAuthority for MemorySessionAuthority {
    async fn initialize_auth(&self) -> Result<bool, AuthorityError> {
        let mut state = self.state.borrow_mut();
        if let Some(found) = state.initialized {
            return Ok(found);
        }
        if let Some(reason) = state.init_failure.take() {
            return Err(AuthorityError::Unavailable(reason));
        }

        let found = if state.session.is_some() {
            true
        } else if let Some(raw) = state.storage.clone() {
            let restored: PersistedSession = serde_json::from_str(&raw)
                .map_err(|e| AuthorityError::CorruptSession(e.to_string()))?;
            tracing::debug!(session_id = %restored.session_id, "restored persisted session");
            state.session = Some(restored);
            true
        } else {
            false
        };

        state.initialized = Some(found);
        Ok(found)
    }

    fn is_authenticated(&self) -> bool {
        self.state.borrow().session.is_some()
    }

    fn needs_profile_completion(&self) -> bool {
        self.state
            .borrow()
            .session
            .as_ref()
            .is_some_and(|s| s.user.needs_profile_completion())
    }

    fn user_role(&self) -> Option<Role> {
        self.state.borrow().session.as_ref().and_then(|s| s.user.role)
    }

    fn current_user(&self) -> Option<User> {
        self.state.borrow().session.as_ref().map(|s| s.user.clone())
    }

    fn is_google_user(&self) -> bool {
        self.state
            .borrow()
            .session
            .as_ref()
            .is_some_and(|s| s.user.provider == AuthProvider::Google)
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, AuthorityError> {
        credentials.validate()?;

        let mut state = self.state.borrow_mut();
        let email = credentials.email.trim().to_lowercase();
        let user = match state.accounts.get(&email) {
            Some(Account {
                password: Some(password),
                user,
            }) if *password == credentials.password => user.clone(),
            _ => return Err(AuthorityError::InvalidCredentials),
        };

        start_session(&mut state, user.clone());
        Ok(user)
    }

    fn logout(&self) {
        let mut state = self.state.borrow_mut();
        state.session = None;
        persist(&mut state);
    }

    async fn update_profile(&self, fields: &ProfileUpdate) -> Result<User, AuthorityError> {
        fields.validate()?;
        self.with_session_user(|user| fields.apply_to(user))
    }

    async fn complete_social_profile(
        &self,
        fields: &ProfileCompletion,
    ) -> Result<User, AuthorityError> {
        fields.validate()?;
        self.with_session_user(|user| fields.apply_to(user))
    }
}
