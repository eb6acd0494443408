//! Route wrapper: interprets guard outcomes against the router.

use std::rc::Rc;

use crate::decision::Redirect;
use crate::guards::{Guard, GuardOutcome};
use crate::snapshot::GuardFault;
use crate::{Location, NavigationContext, Navigator, RoutePaths, SessionAuthority, SessionSnapshot};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum InitState {
    Pending,
    Ready,
}

/// What the wrapper produced for one evaluation.
#[derive(Debug, PartialEq, Eq)]
pub enum Rendered<'a, C> {
    /// Session initialization has not resolved; render nothing final yet.
    Initializing,
    Content(&'a C),
    /// Role rejection rendered in place; no navigation happened.
    Fallback(&'a C),
    /// The current history entry was replaced with `Redirect::to`.
    Redirected(Redirect),
}

/// Protected content bound to a guard.
///
/// Every [`RouteWrapper::render`] call reads a fresh snapshot; nothing about
/// the session is cached between navigations.
pub struct RouteWrapper<A: ?Sized, G, C> {
    authority: Rc<A>,
    paths: Rc<RoutePaths>,
    guard: G,
    content: C,
    fallback: Option<C>,
    init: InitState,
}

/// Wrap `content` with `guard`.
pub fn wrap<A, G, C>(authority: Rc<A>, paths: Rc<RoutePaths>, content: C, guard: G) -> RouteWrapper<A, G, C>
where
    A: SessionAuthority + ?Sized,
    G: Guard,
{
    RouteWrapper::new(authority, paths, guard, content)
}

impl<A, G, C> RouteWrapper<A, G, C>
where
    A: SessionAuthority + ?Sized,
    G: Guard,
{
    /// Every wrapper starts pending: no guard decides before the authority
    /// has had the chance to restore a persisted session.
    pub fn new(authority: Rc<A>, paths: Rc<RoutePaths>, guard: G, content: C) -> Self {
        Self {
            authority,
            paths,
            guard,
            content,
            fallback: None,
            init: InitState::Pending,
        }
    }

    /// View rendered in place of `content` when the guard rejects a role.
    pub fn with_fallback(mut self, fallback: C) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn guard(&self) -> &G {
        &self.guard
    }

    pub fn is_initializing(&self) -> bool {
        self.init == InitState::Pending
    }

    /// Resolve session initialization. Safe to call on every mount.
    ///
    /// Failures degrade to an anonymous session: the authority is told to drop
    /// whatever it holds and the wrapper proceeds.
    pub async fn mount(&mut self) {
        if self.init == InitState::Ready {
            return;
        }

        match self.authority.initialize_auth().await {
            Ok(found) => {
                tracing::debug!(guard = self.guard.name(), session_found = found, "session initialized");
            }
            Err(e) => {
                let fault = GuardFault::InitializationFailure(e.to_string());
                tracing::warn!(guard = self.guard.name(), %fault, "clearing session state");
                self.authority.logout();
            }
        }

        self.init = InitState::Ready;
    }

    /// Evaluate the guard for `requested` and act on the outcome.
    pub fn render<N>(&self, requested: &Location, navigator: &mut N) -> Rendered<'_, C>
    where
        N: Navigator + ?Sized,
    {
        if self.init == InitState::Pending {
            return Rendered::Initializing;
        }

        let snapshot = SessionSnapshot::read(&*self.authority);
        let outcome = self.guard.evaluate(&snapshot, requested, &self.paths);
        tracing::debug!(
            guard = self.guard.name(),
            path = requested.path(),
            state = ?snapshot.state(),
            outcome = ?outcome,
            "guard evaluated"
        );

        let redirect = match outcome {
            GuardOutcome::Allow => return Rendered::Content(&self.content),
            GuardOutcome::Reject(redirect) => match &self.fallback {
                Some(fallback) => return Rendered::Fallback(fallback),
                None => redirect,
            },
            GuardOutcome::Redirect(redirect) => redirect,
        };

        tracing::info!(
            guard = self.guard.name(),
            from = %requested,
            to = %redirect.to,
            "redirecting"
        );
        navigator.replace(&redirect.to, redirect.from.clone().map(NavigationContext::new));
        Rendered::Redirected(redirect)
    }
}
