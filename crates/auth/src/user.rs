//! User profile model and the payloads of the session actions.
//!
//! Validation here is deterministic and IO-free; the session authority is
//! responsible for actually applying the changes.

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, UserId};

use crate::Role;

// ─────────────────────────────────────────────────────────────────────────────
// Provenance
// ─────────────────────────────────────────────────────────────────────────────

/// How the identity signed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Email + password registration (profile captured at sign-up).
    #[default]
    Password,
    /// Google sign-in shortcut (profile must be completed afterwards).
    Google,
}

impl AuthProvider {
    pub fn is_social(&self) -> bool {
        matches!(self, AuthProvider::Google)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// Signed-in storefront user as reported by the session authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// `None` when the authority holds a role this layer does not recognise.
    pub role: Option<Role>,
    pub provider: AuthProvider,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name: display_name.into(),
            phone: None,
            address: None,
            role: Some(Role::User),
            provider: AuthProvider::Password,
        }
    }

    pub fn with_role(mut self, role: Option<Role>) -> Self {
        self.role = role;
        self
    }

    pub fn with_provider(mut self, provider: AuthProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_contact(mut self, phone: impl Into<String>, address: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self.address = Some(address.into());
        self
    }

    /// Profile fields still required before full access is granted.
    pub fn missing_profile_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(self.phone.as_deref()) {
            missing.push("phone");
        }
        if is_blank(self.address.as_deref()) {
            missing.push("address");
        }
        missing
    }

    /// Social sign-ins skip the registration form, so their contact details
    /// must be collected before the storefront opens up.
    pub fn needs_profile_completion(&self) -> bool {
        self.provider.is_social() && !self.missing_profile_fields().is_empty()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).is_none_or(str::is_empty)
}

// ─────────────────────────────────────────────────────────────────────────────
// Action payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Email + password login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        if self.password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        Ok(())
    }
}

/// Partial profile edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        if self.display_name.is_none() && self.phone.is_none() && self.address.is_none() {
            return Err(DomainError::validation("profile update is empty"));
        }
        for (field, value) in [
            ("display name", &self.display_name),
            ("phone", &self.phone),
            ("address", &self.address),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(DomainError::validation(format!("{field} cannot be blank")));
            }
        }
        Ok(())
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.display_name {
            user.display_name = name.trim().to_string();
        }
        if let Some(phone) = &self.phone {
            user.phone = Some(phone.trim().to_string());
        }
        if let Some(address) = &self.address {
            user.address = Some(address.trim().to_string());
        }
    }
}

/// Fields collected by the post-social-sign-in completion form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCompletion {
    pub phone: String,
    pub address: String,
    pub display_name: Option<String>,
}

impl ProfileCompletion {
    pub fn new(phone: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            address: address.into(),
            display_name: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.phone.trim().is_empty() {
            return Err(DomainError::validation("phone is required"));
        }
        if self.address.trim().is_empty() {
            return Err(DomainError::validation("address is required"));
        }
        Ok(())
    }

    pub fn apply_to(&self, user: &mut User) {
        user.phone = Some(self.phone.trim().to_string());
        user.address = Some(self.address.trim().to_string());
        if let Some(name) = self.display_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            user.display_name = name.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google_user() -> User {
        User::new(UserId::new(), "gina@example.com", "Gina").with_provider(AuthProvider::Google)
    }

    #[test]
    fn password_users_never_need_completion() {
        let user = User::new(UserId::new(), "pat@example.com", "Pat");
        assert_eq!(user.missing_profile_fields(), vec!["phone", "address"]);
        assert!(!user.needs_profile_completion());
    }

    #[test]
    fn google_user_needs_completion_until_contact_is_present() {
        let mut user = google_user();
        assert!(user.needs_profile_completion());

        ProfileCompletion::new("555-0100", "1 Main St").apply_to(&mut user);
        assert!(!user.needs_profile_completion());
    }

    #[test]
    fn blank_contact_counts_as_missing() {
        let user = google_user().with_contact("   ", "1 Main St");
        assert_eq!(user.missing_profile_fields(), vec!["phone"]);
    }

    #[test]
    fn credentials_require_email_shape() {
        assert!(Credentials::new("nobody", "secret").validate().is_err());
        assert!(Credentials::new("a@b.c", "").validate().is_err());
        assert!(Credentials::new("a@b.c", "secret").validate().is_ok());
    }

    #[test]
    fn empty_profile_update_is_rejected() {
        let err = ProfileUpdate::default().validate().unwrap_err();
        assert_eq!(err, DomainError::validation("profile update is empty"));
    }

    #[test]
    fn profile_update_only_touches_given_fields() {
        let mut user = google_user().with_contact("555-0100", "1 Main St");
        let update = ProfileUpdate {
            address: Some(" 2 Side St ".to_string()),
            ..Default::default()
        };
        update.validate().unwrap();
        update.apply_to(&mut user);

        assert_eq!(user.address.as_deref(), Some("2 Side St"));
        assert_eq!(user.phone.as_deref(), Some("555-0100"));
        assert_eq!(user.display_name, "Gina");
    }

    #[test]
    fn completion_requires_both_fields() {
        assert!(ProfileCompletion::new("", "1 Main St").validate().is_err());
        assert!(ProfileCompletion::new("555-0100", " ").validate().is_err());
    }
}
