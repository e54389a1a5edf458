//! # CLI Module
//!
//! Command-line access to a route manifest.
//!
//! ## Commands
//!
//! ### `find`
//!
//! Resolve a path and print its record chain as a JSON array:
//!
//! ```bash
//! nestroute --manifest routes.yaml find /users/42 --retries 2
//! ```
//!
//! ### `resolve`
//!
//! Walk a path once and print one JSON line per visited segment:
//!
//! ```bash
//! nestroute --manifest routes.yaml resolve '/users/42#tab'
//! ```
//!
//! ### `routes`
//!
//! List every registered route, one per line:
//!
//! ```bash
//! nestroute --manifest routes.yaml routes
//! ```
//!
//! The manifest may also be given through `NESTROUTE_MANIFEST`. Failures exit
//! non-zero with the error on stderr.
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use clap::Parser;
//! use nestroute::cli::{run_cli, Cli};
//!
//! run_cli(Cli::parse())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod commands;

pub use commands::{execute, run_cli, Cli, Commands};
