use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storefront role carried by a signed-in user.
///
/// The set is closed: a role string the session authority hands back that is
/// not one of these is treated as "no role" by every role-scoped check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Delivery,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Delivery, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Delivery => "delivery",
            Role::Admin => "admin",
        }
    }

    /// Parse a raw role string, mapping anything unknown to `None`.
    pub fn resolve(raw: &str) -> Option<Role> {
        raw.parse().ok()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "delivery" => Ok(Role::Delivery),
            "admin" => Ok(Role::Admin),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" delivery ".parse::<Role>(), Ok(Role::Delivery));
    }

    #[test]
    fn unknown_role_does_not_resolve() {
        assert_eq!(Role::resolve("superuser"), None);
        assert_eq!(Role::resolve(""), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Role::Delivery).unwrap();
        assert_eq!(json, "\"delivery\"");
        let back: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(back, Role::Admin);
    }
}
