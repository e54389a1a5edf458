//! # Router Module
//!
//! Hierarchical path matching for nested views.
//!
//! ## Overview
//!
//! Unlike a flat request router, resolving a path here yields the whole chain
//! of routes it passes through. `/users/42/edit` resolves to the records for
//! `/`, `/users`, `/users/:id` and `/users/:id/edit`, each with the parameters
//! accumulated so far, so every level of a nested layout can find its data.
//!
//! ## Architecture
//!
//! 1. **Segmentation** ([`walk`]): paths are split before every `/` and `#`,
//!    root first.
//! 2. **Compilation** ([`pattern`]): each segment of a registered route is
//!    compiled into a [`PathMatcher`] with a sibling priority.
//! 3. **Storage** ([`tree`]): matchers live in a tree keyed by segment text,
//!    siblings ordered by priority.
//! 4. **Resolution** (`resolve`): a walk through the tree descending into the
//!    first matching child at every level, with optional retries that skip
//!    dead ends.
//!
//! ## Example
//!
//! ```rust
//! use nestroute::{RouteInfo, Router};
//!
//! let mut router = Router::new();
//! router.mount("/users", |r| -> Result<(), nestroute::RouterError> {
//!     r.add("/", RouteInfo::new().with("component", "UserList"))?;
//!     r.add("/:id/edit", RouteInfo::new().with("component", "EditUser"))?;
//!     Ok(())
//! })?;
//!
//! let routes: Vec<String> = router
//!     .find("/users/42/edit")?
//!     .into_iter()
//!     .map(|record| record.route)
//!     .collect();
//! assert_eq!(routes, ["/", "/users", "/users/:id", "/users/:id/edit"]);
//! # Ok::<(), nestroute::RouterError>(())
//! ```
//!
//! ## Hash routes
//!
//! A `#` starts a second namespace matched after the path. Hash patterns are
//! always tried after path patterns of otherwise equal shape.

mod core;
mod params;
pub mod pattern;
mod resolve;
pub mod tree;
pub mod walk;
#[cfg(test)]
mod tests;

pub use core::Router;
pub use params::{ParamVec, Params, MAX_INLINE_PARAMS};
pub use pattern::{MatcherKind, PathMatcher};
pub use resolve::RouteRecord;
pub use tree::{Children, RouteNode, RouteTree};
pub use walk::{Step, Walk};
