//! Navigation primitives: locations, the carried return context, and the
//! history seam the route wrapper redirects through.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location must be an absolute path (got '{0}')")]
    NotAbsolute(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Location
// ─────────────────────────────────────────────────────────────────────────────

/// A navigation target: path plus optional query and fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Location {
    /// Parse `"/path?query#fragment"`.
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let raw = raw.trim();
        if !raw.starts_with('/') {
            return Err(LocationError::NotAbsolute(raw.to_string()));
        }

        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, frag)) => (rest, non_empty(frag)),
            None => (raw, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, non_empty(query)),
            None => (rest, None),
        };

        Ok(Self {
            path: path.to_string(),
            query,
            fragment,
        })
    }

    /// Location for a bare path. Callers pass router-owned paths here.
    pub fn from_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
            fragment: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Full href, suitable for handing back to the router.
    pub fn href(&self) -> String {
        self.to_string()
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation context
// ─────────────────────────────────────────────────────────────────────────────

/// The location a guard intercepted, attached to the redirect so the gated
/// flow (login, profile completion) can send the user back afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationContext {
    pub from: Location,
}

impl NavigationContext {
    pub fn new(from: Location) -> Self {
        Self { from }
    }

    /// Consume the context, yielding where to resume.
    pub fn into_return_target(self) -> Location {
        self.from
    }
}

/// Router seam used by the route wrapper.
pub trait Navigator {
    /// Replace the current history entry (no new back-stack entry).
    fn replace(&mut self, to: &str, context: Option<NavigationContext>);

    /// Push a new history entry.
    fn push(&mut self, to: &str);
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory history
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub href: String,
    pub context: Option<NavigationContext>,
}

/// Browser-like history stack kept in memory.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                href: initial.to_string(),
                context: None,
            }],
            index: 0,
        }
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step back one entry; returns false at the start of the stack.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Take the navigation context off the current entry. A context is
    /// consumed at most once.
    pub fn take_context(&mut self) -> Option<NavigationContext> {
        self.entries[self.index].context.take()
    }
}

impl Navigator for MemoryHistory {
    fn replace(&mut self, to: &str, context: Option<NavigationContext>) {
        self.entries[self.index] = HistoryEntry {
            href: to.to_string(),
            context,
        };
    }

    fn push(&mut self, to: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            href: to.to_string(),
            context: None,
        });
        self.index = self.entries.len() - 1;
    }
}
