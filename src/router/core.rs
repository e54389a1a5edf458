use std::time::Instant;

use tracing::{debug, info, warn};

use super::resolve::{self, RouteRecord};
use super::tree::RouteTree;
use crate::error::RouterError;
use crate::info::RouteInfo;
use crate::runtime_config::RuntimeConfig;

/// Hierarchical path router.
///
/// Routes are registered with [`add`](Router::add), optionally under nested
/// prefixes opened by [`mount`](Router::mount), and looked up with
/// [`find`](Router::find) or [`resolve`](Router::resolve). A lookup returns
/// every route along the path, root first, not just the deepest one.
///
/// ```
/// use nestroute::{RouteInfo, Router};
///
/// let mut router = Router::new();
/// router.add("/", RouteInfo::new().with("component", "Layout"))?;
/// router.mount("/users", |r| r.add("/:id", RouteInfo::new().with("component", "User")))?;
///
/// let chain = router.find("/users/42")?;
/// assert_eq!(chain.len(), 3);
/// assert_eq!(chain[2].params.get("id"), Some("42"));
/// # Ok::<(), nestroute::RouterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Router {
    tree: RouteTree,
    /// Open mount prefixes, innermost last
    prefixes: Vec<String>,
    config: RuntimeConfig,
}

impl Router {
    /// Empty router with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// Run `body` with `prefix` prepended to every path it adds or removes.
    ///
    /// Mounts nest; `/` adds nothing. The prefix is popped when `body`
    /// returns, whatever it returns, so a failed registration inside a mount
    /// does not leak its prefix into later calls.
    pub fn mount<R>(&mut self, prefix: &str, body: impl FnOnce(&mut Self) -> R) -> R {
        let depth = self.prefixes.len();
        if prefix != "/" {
            self.prefixes.push(prefix.to_string());
        }
        let out = body(self);
        self.prefixes.truncate(depth);
        out
    }

    /// Current mount prefix, empty at top level.
    pub fn mount_prefix(&self) -> String {
        self.prefixes.concat()
    }

    /// Register `info` at `path` under the current mount prefix and return
    /// the full path.
    ///
    /// Adding at an existing path merges the new fields into its info.
    ///
    /// # Errors
    ///
    /// - [`RouterError::InvalidPath`] if `path` is empty or starts with
    ///   neither `/` nor `#`
    /// - [`RouterError::SlashInCustomExpr`] / [`RouterError::InvalidPattern`]
    ///   for malformed patterns; the tree is left unchanged
    pub fn add(
        &mut self,
        path: &str,
        info: impl Into<Option<RouteInfo>>,
    ) -> Result<String, RouterError> {
        if !(path.starts_with('/') || path.starts_with('#')) {
            return Err(RouterError::InvalidPath {
                given: path.to_string(),
            });
        }

        let mount = self.mount_prefix();
        let full = format!("{mount}{path}");
        match self.tree.insert(&full, info.into().unwrap_or_default()) {
            Ok(()) => {
                debug!(route = %full, mount = %mount, "Route registered");
                Ok(full)
            }
            Err(e) => {
                warn!(route = %full, error = %e, "Route registration rejected");
                Err(e)
            }
        }
    }

    /// Remove the route at `path` (under the current mount prefix) together
    /// with everything beneath it.
    ///
    /// Removing `/` only clears the root's own info.
    ///
    /// # Errors
    ///
    /// [`RouterError::NotFound`] if the path is empty or not in the tree.
    pub fn rm(&mut self, path: &str) -> Result<(), RouterError> {
        if path.is_empty() {
            return Err(RouterError::not_found(path, path));
        }
        let full = format!("{}{}", self.mount_prefix(), path);
        self.tree.remove(&full, path)?;
        debug!(route = %full, "Route removed");
        Ok(())
    }

    /// Resolve `path` using the configured attempt budget.
    ///
    /// # Errors
    ///
    /// [`RouterError::NotFound`] if no chain of routes reaches the end of the
    /// path.
    pub fn find(&self, path: &str) -> Result<Vec<RouteRecord>, RouterError> {
        self.find_with_retries(path, self.config.retries)
    }

    /// Resolve `path` with up to `attempts` attempts (at least one).
    ///
    /// # Errors
    ///
    /// Same as [`find`](Router::find).
    pub fn find_with_retries(
        &self,
        path: &str,
        attempts: u32,
    ) -> Result<Vec<RouteRecord>, RouterError> {
        debug!(path = %path, attempts, "Route match attempt");

        let match_start = Instant::now();
        let result = resolve::find(&self.tree, path, attempts);
        let match_duration = match_start.elapsed();

        match &result {
            Ok(records) => {
                let routes: Vec<&str> = records.iter().map(|r| r.route.as_str()).collect();
                if match_duration > self.config.slow_match {
                    warn!(
                        path = %path,
                        routes = ?routes,
                        duration_us = match_duration.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    info!(
                        path = %path,
                        routes = ?routes,
                        duration_us = match_duration.as_micros(),
                        "Route matched"
                    );
                }
            }
            Err(e) => {
                warn!(
                    path = %path,
                    error = %e,
                    duration_us = match_duration.as_micros(),
                    "No route matched"
                );
            }
        }
        result
    }

    /// Walk `path` once, calling `callback` after every segment.
    ///
    /// The callback receives the input consumed so far and either the records
    /// that segment produced or the error that ended the walk; an error is
    /// delivered at most once and nothing follows it. No retries are made and
    /// fallback records are not reordered.
    pub fn resolve<F>(&self, path: &str, callback: F)
    where
        F: FnMut(&str, Result<&[RouteRecord], &RouterError>),
    {
        debug!(path = %path, "Route resolve walk");
        resolve::resolve(&self.tree, path, callback);
    }

    /// Every route that carries its own info, parents before children.
    pub fn route_patterns(&self) -> Vec<String> {
        self.tree.patterns()
    }

    /// Log the registered routes.
    pub fn dump_routes(&self) {
        let routes = self.route_patterns();
        info!(routes_count = routes.len(), routes = ?routes, "Route table");
    }
}
