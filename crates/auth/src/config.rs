//! Redirect target configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: route path must start with '/' (got '{value}')")]
    InvalidPath { var: &'static str, value: String },
}

/// The fixed set of destinations this layer redirects to.
///
/// Defaults match the storefront router; each can be overridden through the
/// environment (see [`RoutePaths::from_env`]) or a serialized app config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePaths {
    pub login: String,
    pub complete_profile: String,
    pub admin_dashboard: String,
    pub delivery_dashboard: String,
    pub storefront_root: String,
    pub unauthorized: String,
}

impl Default for RoutePaths {
    fn default() -> Self {
        Self {
            login: "/auth/login".to_string(),
            complete_profile: "/complete-profile".to_string(),
            admin_dashboard: "/admin/dashboard".to_string(),
            delivery_dashboard: "/delivery/dashboard".to_string(),
            storefront_root: "/".to_string(),
            unauthorized: "/unauthorized".to_string(),
        }
    }
}

impl RoutePaths {
    /// Load paths from `STOREFRONT_*` environment variables.
    ///
    /// Unset variables keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`RoutePaths::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut paths = Self::default();
        let slots: [(&'static str, &mut String); 6] = [
            ("STOREFRONT_LOGIN_PATH", &mut paths.login),
            ("STOREFRONT_COMPLETE_PROFILE_PATH", &mut paths.complete_profile),
            ("STOREFRONT_ADMIN_DASHBOARD_PATH", &mut paths.admin_dashboard),
            ("STOREFRONT_DELIVERY_DASHBOARD_PATH", &mut paths.delivery_dashboard),
            ("STOREFRONT_ROOT_PATH", &mut paths.storefront_root),
            ("STOREFRONT_UNAUTHORIZED_PATH", &mut paths.unauthorized),
        ];

        for (var, slot) in slots {
            if let Some(value) = lookup(var) {
                let value = value.trim().to_string();
                if !value.starts_with('/') {
                    return Err(ConfigError::InvalidPath { var, value });
                }
                tracing::debug!(var, path = %value, "route path overridden");
                *slot = value;
            }
        }

        Ok(paths)
    }

    /// Landing page for a role: admins and couriers get their dashboards,
    /// everyone else (including sessions with no resolvable role) the storefront.
    pub fn role_home(&self, role: Option<Role>) -> &str {
        match role {
            Some(Role::Admin) => &self.admin_dashboard,
            Some(Role::Delivery) => &self.delivery_dashboard,
            Some(Role::User) | None => &self.storefront_root,
        }
    }

    /// Views that exist only to resolve a gate; never worth resuming to.
    pub fn is_gate_view(&self, path: &str) -> bool {
        path == self.login || path == self.complete_profile
    }
}
