//! Access decision function.
//!
//! - No IO
//! - No panics
//! - Renderer-agnostic: the result is a tagged value the route wrapper interprets

use serde::Serialize;

use crate::{Location, RoutePaths, RoutePolicy, SessionSnapshot};

/// A redirect target plus the location to resume once the gate is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub to: String,
    /// `None` for redirects that are final destinations (dashboards).
    pub from: Option<Location>,
}

impl Redirect {
    pub fn carrying(to: impl Into<String>, from: &Location) -> Self {
        Self {
            to: to.into(),
            from: Some(from.clone()),
        }
    }

    /// Redirect that carries nothing. Role homes and dashboards are final
    /// destinations, not gates to resume from.
    pub fn new(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            from: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Redirect(Redirect),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `snapshot` may render `requested` under `policy`.
///
/// First match wins:
/// 1. public policy → allow
/// 2. unauthenticated → policy redirect (login by default), carrying `requested`
/// 3. profile incomplete → completion view, carrying `requested`
/// 4. role not admitted → policy role fallback, else the role's home
/// 5. allow
pub fn decide(
    snapshot: &SessionSnapshot,
    policy: &RoutePolicy,
    requested: &Location,
    paths: &RoutePaths,
) -> Decision {
    if !policy.require_auth {
        return Decision::Allow;
    }

    if !snapshot.is_authenticated() {
        let to = policy.redirect_to.as_deref().unwrap_or(&paths.login);
        return Decision::Redirect(Redirect::carrying(to, requested));
    }

    if snapshot.needs_profile_completion() {
        return Decision::Redirect(Redirect::carrying(&paths.complete_profile, requested));
    }

    if !policy.admits_role(snapshot.role()) {
        let to = policy
            .role_fallback
            .as_deref()
            .unwrap_or_else(|| paths.role_home(snapshot.role()));
        return Decision::Redirect(Redirect::new(to));
    }

    Decision::Allow
}

/// Where a session lands after a login or profile-completion flow finishes.
///
/// A carried location is honoured once the session clears every gate; carried
/// locations pointing at the gate views themselves are ignored.
pub fn post_auth_redirect(
    snapshot: &SessionSnapshot,
    carried: Option<Location>,
    paths: &RoutePaths,
) -> Redirect {
    if !snapshot.is_authenticated() {
        return Redirect {
            to: paths.login.clone(),
            from: carried,
        };
    }

    if snapshot.needs_profile_completion() {
        return Redirect {
            to: paths.complete_profile.clone(),
            from: carried,
        };
    }

    match carried.filter(|loc| !paths.is_gate_view(loc.path())) {
        Some(loc) => Redirect::new(loc.href()),
        None => Redirect::new(paths.role_home(snapshot.role())),
    }
}
