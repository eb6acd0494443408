//! `storefront-auth` — client-side route authorization for the storefront.
//!
//! Decides whether a session may render a view or must be redirected. This is
//! a UX gate, not a security boundary: the backend enforces access on its own.
//!
//! This crate is intentionally decoupled from any rendering framework and from
//! session storage; the session authority is injected.

pub mod accessor;
pub mod authority;
pub mod config;
pub mod decision;
pub mod guards;
pub mod navigation;
pub mod policy;
pub mod roles;
pub mod snapshot;
pub mod user;
pub mod wrapper;

pub use accessor::SessionAccessor;
pub use authority::{AuthorityError, MemorySessionAuthority, SessionAuthority};
pub use config::{ConfigError, RoutePaths};
pub use decision::{Decision, Redirect, decide, post_auth_redirect};
pub use guards::{
    AuthenticationGuard, Guard, GuardOutcome, GuestOnlyGuard, ProfileCompletionGuard, RoleGuard,
};
pub use navigation::{HistoryEntry, Location, LocationError, MemoryHistory, NavigationContext, Navigator};
pub use policy::RoutePolicy;
pub use roles::{Role, RoleParseError};
pub use snapshot::{GuardFault, SessionSnapshot, SessionState};
pub use user::{AuthProvider, Credentials, ProfileCompletion, ProfileUpdate, User};
pub use wrapper::{Rendered, RouteWrapper, wrap};
