//! Guard variants: fixed policy shapes over the access decision function.

use std::collections::BTreeSet;

use crate::decision::{Decision, Redirect, decide};
use crate::{Location, Role, RoutePaths, RoutePolicy, SessionSnapshot};

/// Result of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect(Redirect),
    /// Role rejection that may be rendered in place: the wrapper shows its
    /// fallback view when it has one, otherwise follows the redirect.
    Reject(Redirect),
}

impl From<Decision> for GuardOutcome {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow => GuardOutcome::Allow,
            Decision::Redirect(redirect) => GuardOutcome::Redirect(redirect),
        }
    }
}

/// A policy-bound gate for a protected region.
///
/// Implementations are pure: they only read the snapshot they are handed.
pub trait Guard {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        snapshot: &SessionSnapshot,
        requested: &Location,
        paths: &RoutePaths,
    ) -> GuardOutcome;
}

impl<G: Guard + ?Sized> Guard for Box<G> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn evaluate(
        &self,
        snapshot: &SessionSnapshot,
        requested: &Location,
        paths: &RoutePaths,
    ) -> GuardOutcome {
        (**self).evaluate(snapshot, requested, paths)
    }
}

/// General-purpose gate with a caller-supplied policy.
#[derive(Debug, Clone, Default)]
pub struct AuthenticationGuard {
    policy: RoutePolicy,
}

impl AuthenticationGuard {
    pub fn new(policy: RoutePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }
}

impl Guard for AuthenticationGuard {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn evaluate(
        &self,
        snapshot: &SessionSnapshot,
        requested: &Location,
        paths: &RoutePaths,
    ) -> GuardOutcome {
        decide(snapshot, &self.policy, requested, paths).into()
    }
}

/// Admits only signed-in sessions that still owe profile details.
///
/// Makes the completion view mandatory for those who need it and unreachable
/// for everyone else.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileCompletionGuard;

impl Guard for ProfileCompletionGuard {
    fn name(&self) -> &'static str {
        "profile_completion"
    }

    fn evaluate(
        &self,
        snapshot: &SessionSnapshot,
        requested: &Location,
        paths: &RoutePaths,
    ) -> GuardOutcome {
        if !snapshot.is_authenticated() {
            return GuardOutcome::Redirect(Redirect::carrying(&paths.login, requested));
        }
        if snapshot.needs_profile_completion() {
            return GuardOutcome::Allow;
        }
        GuardOutcome::Redirect(Redirect::new(paths.role_home(snapshot.role())))
    }
}

/// Keeps signed-in sessions off login and registration views.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestOnlyGuard;

impl Guard for GuestOnlyGuard {
    fn name(&self) -> &'static str {
        "guest_only"
    }

    fn evaluate(
        &self,
        snapshot: &SessionSnapshot,
        _requested: &Location,
        paths: &RoutePaths,
    ) -> GuardOutcome {
        if !snapshot.is_authenticated() {
            return GuardOutcome::Allow;
        }
        if snapshot.needs_profile_completion() {
            return GuardOutcome::Redirect(Redirect::new(&paths.complete_profile));
        }
        GuardOutcome::Redirect(Redirect::new(paths.role_home(snapshot.role())))
    }
}

/// Admits sessions whose role is in the allowed set.
///
/// Authentication is implied: an anonymous session has no role.
#[derive(Debug, Clone, Default)]
pub struct RoleGuard {
    allowed: BTreeSet<Role>,
}

impl RoleGuard {
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn allowed(&self) -> &BTreeSet<Role> {
        &self.allowed
    }
}

impl Guard for RoleGuard {
    fn name(&self) -> &'static str {
        "role"
    }

    fn evaluate(
        &self,
        snapshot: &SessionSnapshot,
        _requested: &Location,
        paths: &RoutePaths,
    ) -> GuardOutcome {
        match snapshot.role() {
            Some(role) if self.allowed.contains(&role) => GuardOutcome::Allow,
            role => GuardOutcome::Reject(Redirect::new(paths.role_home(role))),
        }
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::UserId;

    use super::*;
    use crate::User;

    fn signed_in(role: Option<Role>, needs_completion: bool) -> SessionSnapshot {
        let user = User::new(UserId::new(), "t@example.com", "T").with_role(role);
        SessionSnapshot::signed_in(user).with_profile_completion_required(needs_completion)
    }

    fn here() -> Location {
        Location::from_path("/somewhere")
    }

    #[test]
    fn authentication_guard_delegates_to_decide() {
        let guard = AuthenticationGuard::new(RoutePolicy::authenticated());
        let outcome = guard.evaluate(&SessionSnapshot::anonymous(), &here(), &RoutePaths::default());

        assert_eq!(
            outcome,
            GuardOutcome::Redirect(Redirect::carrying("/auth/login", &here()))
        );
    }

    #[test]
    fn completion_guard_admits_only_incomplete_sessions() {
        let paths = RoutePaths::default();
        let guard = ProfileCompletionGuard;

        assert_eq!(
            guard.evaluate(&signed_in(Some(Role::User), true), &here(), &paths),
            GuardOutcome::Allow
        );
        assert_eq!(
            guard.evaluate(&signed_in(Some(Role::Admin), false), &here(), &paths),
            GuardOutcome::Redirect(Redirect::new("/admin/dashboard"))
        );
        assert_eq!(
            guard.evaluate(&SessionSnapshot::anonymous(), &here(), &paths),
            GuardOutcome::Redirect(Redirect::carrying("/auth/login", &here()))
        );
    }

    #[test]
    fn guest_only_sends_delivery_to_dashboard() {
        let outcome = GuestOnlyGuard.evaluate(
            &signed_in(Some(Role::Delivery), false),
            &Location::from_path("/auth/login"),
            &RoutePaths::default(),
        );
        assert_eq!(outcome, GuardOutcome::Redirect(Redirect::new("/delivery/dashboard")));
    }

    #[test]
    fn guest_only_prefers_completion_over_dashboard() {
        let outcome = GuestOnlyGuard.evaluate(
            &signed_in(Some(Role::Admin), true),
            &Location::from_path("/auth/register"),
            &RoutePaths::default(),
        );
        assert_eq!(outcome, GuardOutcome::Redirect(Redirect::new("/complete-profile")));
    }

    #[test]
    fn guest_only_admits_anonymous() {
        let outcome = GuestOnlyGuard.evaluate(
            &SessionSnapshot::anonymous(),
            &here(),
            &RoutePaths::default(),
        );
        assert_eq!(outcome, GuardOutcome::Allow);
    }

    #[test]
    fn role_guard_rejects_user_from_admin_area() {
        let outcome = RoleGuard::new([Role::Admin]).evaluate(
            &signed_in(Some(Role::User), false),
            &here(),
            &RoutePaths::default(),
        );
        assert_eq!(outcome, GuardOutcome::Reject(Redirect::new("/")));
    }

    #[test]
    fn role_guard_fails_closed_without_role() {
        let guard = RoleGuard::new(Role::ALL);
        let paths = RoutePaths::default();

        assert!(matches!(
            guard.evaluate(&signed_in(None, false), &here(), &paths),
            GuardOutcome::Reject(_)
        ));
        assert!(matches!(
            guard.evaluate(&SessionSnapshot::anonymous(), &here(), &paths),
            GuardOutcome::Reject(_)
        ));
    }

    #[test]
    fn boxed_guards_forward() {
        let guard: Box<dyn Guard> = Box::new(AuthenticationGuard::default());
        assert_eq!(guard.name(), "authentication");
    }
}
