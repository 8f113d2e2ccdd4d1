use std::collections::HashSet;
use std::sync::Arc;

use axum::Router;
use axum::routing::MethodRouter;

/// Whether a route requires a bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reachable without credentials
    Public,
    /// Requires a valid bearer token
    Protected,
}

#[derive(Debug)]
struct Entry {
    path: String,
    versioned: bool,
    access: Access,
    handler: MethodRouter,
}

/// Application routes together with their access marker
///
/// Versioned routes are served below the API version prefix (`/v1/...`),
/// neutral routes at their literal path.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<Entry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route served under the API version prefix
    #[must_use]
    pub fn route(mut self, path: &str, handler: MethodRouter, access: Access) -> Self {
        self.entries.push(Entry {
            path: path.to_owned(),
            versioned: true,
            access,
            handler,
        });
        self
    }

    /// Add a route served at `path` regardless of the API version
    #[must_use]
    pub fn neutral_route(mut self, path: &str, handler: MethodRouter, access: Access) -> Self {
        self.entries.push(Entry {
            path: path.to_owned(),
            versioned: false,
            access,
            handler,
        });
        self
    }

    /// Append all routes of `other`
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the router and the set of public route patterns
    ///
    /// Patterns are the full paths as reported by `MatchedPath`.
    pub(crate) fn build(self, version_prefix: &str) -> (Router, PublicRoutes) {
        let mut router = Router::new();
        let mut public = HashSet::new();

        for entry in self.entries {
            let path = if entry.versioned {
                join_path(version_prefix, &entry.path)
            } else {
                entry.path
            };

            if entry.access == Access::Public {
                public.insert(path.clone());
            }

            router = router.route(&path, entry.handler);
        }

        (router, PublicRoutes(Arc::new(public)))
    }
}

/// Route patterns marked [`Access::Public`]
#[derive(Debug, Clone, Default)]
pub struct PublicRoutes(Arc<HashSet<String>>);

impl PublicRoutes {
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        prefix.to_owned()
    } else {
        format!("{prefix}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;

    use super::*;

    #[test]
    fn versioned_and_neutral_paths() {
        let (_, public) = RouteTable::new()
            .route("/items", get(|| async {}), Access::Public)
            .route("items/{id}", get(|| async {}), Access::Protected)
            .neutral_route("/status", get(|| async {}), Access::Public)
            .build("/v2");

        assert!(public.contains("/v2/items"));
        assert!(public.contains("/status"));
        assert!(!public.contains("/v2/items/{id}"));
        assert!(!public.contains("/items"));
    }

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join_path("/v1", "/me"), "/v1/me");
        assert_eq!(join_path("/v1/", "me"), "/v1/me");
        assert_eq!(join_path("/v1", "/"), "/v1");
    }

    #[test]
    fn merge_keeps_everything() {
        let table = RouteTable::new()
            .route("/a", get(|| async {}), Access::Protected)
            .merge(RouteTable::new().neutral_route("/b", get(|| async {}), Access::Public));

        assert_eq!(table.len(), 2);
    }
}
