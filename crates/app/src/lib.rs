//! `storefront-app` — the storefront's route table wired to the guard layer.

pub mod routes;

pub use routes::{NavigationError, PathPattern, Screen, Storefront};
