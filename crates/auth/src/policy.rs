use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Role;

/// Static access policy attached to a protected region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePolicy {
    /// `false` marks a fully public region; nothing else is checked.
    pub require_auth: bool,
    /// Empty set = any authenticated role.
    pub allowed_roles: BTreeSet<Role>,
    /// Where unauthenticated sessions go (login when unset).
    pub redirect_to: Option<String>,
    /// Where failed role checks go (role-appropriate home when unset).
    pub role_fallback: Option<String>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_roles: BTreeSet::new(),
            redirect_to: None,
            role_fallback: None,
        }
    }
}

impl RoutePolicy {
    pub fn public() -> Self {
        Self {
            require_auth: false,
            ..Self::default()
        }
    }

    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn allow_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles.extend(roles);
        self
    }

    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = Some(path.into());
        self
    }

    pub fn role_fallback(mut self, path: impl Into<String>) -> Self {
        self.role_fallback = Some(path.into());
        self
    }

    /// Fail-closed membership test: no role never passes a restricted policy.
    pub fn admits_role(&self, role: Option<Role>) -> bool {
        self.allowed_roles.is_empty() || role.is_some_and(|r| self.allowed_roles.contains(&r))
    }
}
