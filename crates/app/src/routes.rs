//! Storefront route table and a navigator that follows guard redirects.

use std::rc::Rc;

use thiserror::Error;

use storefront_auth::{
    AuthenticationGuard, Guard, GuestOnlyGuard, Location, LocationError, MemoryHistory,
    NavigationContext, Navigator, ProfileCompletionGuard, Rendered, Role, RoleGuard,
    RouteWrapper, RoutePaths, RoutePolicy, SessionAccessor, SessionAuthority, post_auth_redirect,
};

/// Upper bound on chained redirects for one navigation.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("no route matches '{0}'")]
    NotFound(String),

    #[error("redirect loop while resolving '{0}'")]
    RedirectLoop(String),

    #[error("route '{0}' is still initializing")]
    Initializing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    /// Matches the prefix itself and anything below it.
    Prefix(String),
}

impl PathPattern {
    pub fn exact(path: impl Into<String>) -> Self {
        Self::Exact(path.into())
    }

    pub fn prefix(path: impl Into<String>) -> Self {
        Self::Prefix(path.into())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == p,
            PathPattern::Prefix(p) => path
                .strip_prefix(p.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

/// The view a navigation settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub href: String,
    pub view: &'static str,
    /// Rendered in place by a role guard instead of the requested view.
    pub fallback: bool,
    /// Redirect targets followed on the way, in order.
    pub redirects: Vec<String>,
}

type GuardedView<A> = RouteWrapper<A, Box<dyn Guard>, &'static str>;

/// The storefront router: an ordered route table plus browser history.
pub struct Storefront<A: SessionAuthority + ?Sized> {
    authority: Rc<A>,
    paths: Rc<RoutePaths>,
    routes: Vec<(PathPattern, GuardedView<A>)>,
    history: MemoryHistory,
}

impl<A: SessionAuthority + ?Sized> Storefront<A> {
    /// Build the standard storefront table.
    pub fn new(authority: Rc<A>, paths: RoutePaths) -> Self {
        let paths = Rc::new(paths);
        let mut storefront = Self {
            authority,
            paths: paths.clone(),
            routes: Vec::new(),
            history: MemoryHistory::new(&paths.storefront_root),
        };

        let public = || AuthenticationGuard::new(RoutePolicy::public());
        let signed_in = || AuthenticationGuard::new(RoutePolicy::authenticated());
        let admin_only = RoutePolicy::authenticated()
            .allow_roles([Role::Admin])
            .role_fallback(paths.unauthorized.clone());
        let couriers = RoutePolicy::authenticated().allow_roles([Role::Delivery, Role::Admin]);

        storefront
            .route(PathPattern::exact(&paths.storefront_root), "home", public())
            .route(PathPattern::prefix("/catalog"), "catalog", public())
            .route(PathPattern::exact(&paths.unauthorized), "unauthorized", public())
            .route(PathPattern::exact(&paths.login), "login", GuestOnlyGuard)
            .route(PathPattern::exact("/auth/register"), "register", GuestOnlyGuard)
            .route(PathPattern::exact(&paths.complete_profile), "complete-profile", ProfileCompletionGuard)
            .route(PathPattern::prefix("/account"), "account", signed_in())
            .route(PathPattern::prefix("/checkout"), "checkout", signed_in())
            .route_with_fallback(
                PathPattern::prefix("/admin/reports"),
                "admin-reports",
                RoleGuard::new([Role::Admin]),
                "reports-unavailable",
            )
            .route(PathPattern::prefix("/admin"), "admin", AuthenticationGuard::new(admin_only))
            .route(PathPattern::prefix("/delivery"), "delivery", AuthenticationGuard::new(couriers));

        storefront
    }

    /// Append a route. Earlier routes win, so register specific prefixes first.
    pub fn route<G>(&mut self, pattern: PathPattern, view: &'static str, guard: G) -> &mut Self
    where
        G: Guard + 'static,
    {
        let wrapper = self.guarded(view, guard);
        self.routes.push((pattern, wrapper));
        self
    }

    /// Append a route whose role rejections render `fallback` in place.
    pub fn route_with_fallback<G>(
        &mut self,
        pattern: PathPattern,
        view: &'static str,
        guard: G,
        fallback: &'static str,
    ) -> &mut Self
    where
        G: Guard + 'static,
    {
        let wrapper = self.guarded(view, guard).with_fallback(fallback);
        self.routes.push((pattern, wrapper));
        self
    }

    fn guarded<G: Guard + 'static>(&self, view: &'static str, guard: G) -> GuardedView<A> {
        let guard: Box<dyn Guard> = Box::new(guard);
        RouteWrapper::new(self.authority.clone(), self.paths.clone(), guard, view)
    }

    pub fn session(&self) -> SessionAccessor<A> {
        SessionAccessor::new(self.authority.clone())
    }

    pub fn history(&self) -> &MemoryHistory {
        &self.history
    }

    /// Push `href` and resolve it, following guard redirects.
    pub async fn navigate(&mut self, href: &str) -> Result<Screen, NavigationError> {
        let location = Location::parse(href)?;
        self.history.push(&location.href());
        self.resolve(location).await
    }

    /// Continue after a login or profile-completion step: consume the carried
    /// location (if any) and go wherever the session is now allowed to be.
    ///
    /// When the session still has a gate to pass, the carried location moves
    /// onto the gate's entry so a later `resume` can return to it.
    pub async fn resume(&mut self) -> Result<Screen, NavigationError> {
        let carried = self.history.take_context().map(|ctx| ctx.into_return_target());
        let snapshot = self.session().snapshot();
        let next = post_auth_redirect(&snapshot, carried, &self.paths);
        tracing::info!(to = %next.to, carried = next.from.is_some(), "resuming navigation");

        let location = Location::parse(&next.to)?;
        self.history.push(&location.href());
        if let Some(from) = next.from {
            self.history
                .replace(&location.href(), Some(NavigationContext::new(from)));
        }
        self.resolve(location).await
    }

    async fn resolve(&mut self, mut location: Location) -> Result<Screen, NavigationError> {
        let requested = location.href();
        let mut redirects = Vec::new();

        loop {
            let index = self
                .routes
                .iter()
                .position(|(pattern, _)| pattern.matches(location.path()))
                .ok_or_else(|| NavigationError::NotFound(location.href()))?;

            let wrapper = &mut self.routes[index].1;
            wrapper.mount().await;

            let redirect = match wrapper.render(&location, &mut self.history) {
                Rendered::Content(view) => {
                    return Ok(Screen {
                        href: location.href(),
                        view: *view,
                        fallback: false,
                        redirects,
                    });
                }
                Rendered::Fallback(view) => {
                    return Ok(Screen {
                        href: location.href(),
                        view: *view,
                        fallback: true,
                        redirects,
                    });
                }
                Rendered::Initializing => return Err(NavigationError::Initializing(location.href())),
                Rendered::Redirected(redirect) => redirect,
            };

            if redirects.len() >= MAX_REDIRECTS {
                return Err(NavigationError::RedirectLoop(requested));
            }
            location = Location::parse(&redirect.to)?;
            redirects.push(redirect.to);
        }
    }
}
