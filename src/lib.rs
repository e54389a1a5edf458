//! # nestroute
//!
//! **nestroute** is a hierarchical path router for nested views. Routes are
//! registered under nested prefixes, and resolving a path returns every route
//! it passes through, root first, with the parameters captured so far.
//!
//! ## Overview
//!
//! ```text
//! /                     -> Layout
//! /users                -> UserSection
//! /users/:id            -> UserPage      { id: "42" }
//! /users/:id#:tab       -> UserTab       { id: "42", tab: "posts" }
//! ```
//!
//! Resolving `/users/42#posts` against this table yields all four records, so
//! each level of a nested layout can render from its own record.
//!
//! ## Architecture
//!
//! - **[`router`]** - segment walking, pattern compilation, the route tree
//!   and resolution
//! - **[`info`]** - the data attached to routes
//! - **[`manifest`]** - YAML/JSON route declarations
//! - **[`runtime_config`]** - environment-driven tuning
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - the `nestroute` binary
//!
//! ## Pattern syntax
//!
//! | Pattern          | Matches                                       |
//! |------------------|-----------------------------------------------|
//! | `/about`         | the literal segment                           |
//! | `/:name`         | one segment, captured as `name`               |
//! | `/*rest`         | everything up to a `#`, captured as `rest`    |
//! | `/v:n<\d+>`      | a capture with a custom regular expression    |
//! | `/a(/:b)`        | an optional group                             |
//! | `#:tab`          | the hash part of the path                     |
//!
//! Siblings are tried literal first, then parameters, then splats; path
//! patterns before hash patterns.
//!
//! ## Quick Start
//!
//! ```rust
//! use nestroute::{RouteInfo, Router};
//!
//! let mut router = Router::new();
//! router.add("/", RouteInfo::new().with("component", "Layout"))?;
//! router.mount("/users", |r| -> Result<(), nestroute::RouterError> {
//!     r.add("/:id", RouteInfo::new().with("component", "UserPage"))?;
//!     r.add("/:id#:tab", RouteInfo::new().with("component", "UserTab"))?;
//!     Ok(())
//! })?;
//!
//! let chain = router.find("/users/42#posts")?;
//! assert_eq!(chain.len(), 4);
//! assert_eq!(chain[3].params.get("tab"), Some("posts"));
//! # Ok::<(), nestroute::RouterError>(())
//! ```
//!
//! ## Fallbacks and retries
//!
//! A walk that dead-ends can be retried with
//! [`Router::find_with_retries`]; later attempts skip the branches that
//! failed, so a catch-all such as `/*_` gets its chance. Routes flagged
//! `fallback: true` are listed after all others.

pub mod cli;
pub mod error;
pub mod info;
pub mod logging;
pub mod manifest;
pub mod router;
pub mod runtime_config;

pub use error::RouterError;
pub use info::{InfoValue, RouteInfo};
pub use manifest::{load_manifest, Manifest, RouteEntry};
pub use router::{MatcherKind, Params, PathMatcher, RouteRecord, Router, Step, Walk};
pub use runtime_config::RuntimeConfig;
