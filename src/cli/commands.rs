use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::manifest::load_manifest;
use crate::router::RouteRecord;
use crate::runtime_config::RuntimeConfig;

/// Command-line interface for nestroute
#[derive(Parser)]
#[command(name = "nestroute")]
#[command(about = "Resolve paths against a nested route manifest", long_about = None)]
pub struct Cli {
    /// Route manifest (YAML or JSON)
    #[arg(short, long, env = "NESTROUTE_MANIFEST")]
    pub manifest: PathBuf,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the record chain for a path as JSON
    Find {
        /// Path to resolve, e.g. `/users/42#tab`
        path: String,

        /// Attempts before giving up (defaults to NESTROUTE_RETRIES)
        #[arg(short, long)]
        retries: Option<u32>,
    },
    /// Print one JSON line per visited segment of a path
    Resolve {
        /// Path to resolve
        path: String,
    },
    /// List registered routes
    Routes,
}

/// One line of `resolve` output.
#[derive(Serialize)]
struct SegmentLine<'a> {
    prefix: &'a str,
    records: &'a [RouteRecord],
}

/// Run the parsed command, writing results to stdout.
///
/// # Errors
///
/// Manifest, registration and resolution failures.
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out)
}

/// Run the parsed command, writing results to `out`.
///
/// # Errors
///
/// Same as [`run_cli`].
pub fn execute(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = RuntimeConfig::from_env();
    let router = load_manifest(&cli.manifest)?
        .build(config)
        .with_context(|| format!("Failed to register routes from {}", cli.manifest.display()))?;

    match cli.command {
        Commands::Find { path, retries } => {
            let attempts = retries.unwrap_or(router.config().retries);
            let records = router.find_with_retries(&path, attempts)?;
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
        }
        Commands::Resolve { path } => {
            let mut failure = None;
            let mut written = Ok(());
            router.resolve(&path, |prefix, result| match result {
                Ok(records) if written.is_ok() => {
                    written = serde_json::to_writer(&mut *out, &SegmentLine { prefix, records })
                        .map_err(anyhow::Error::from)
                        .and_then(|()| writeln!(out).map_err(anyhow::Error::from));
                }
                Ok(_) => {}
                Err(e) => failure = Some(e.clone()),
            });
            written?;
            if let Some(e) = failure {
                return Err(e.into());
            }
        }
        Commands::Routes => {
            for route in router.route_patterns() {
                writeln!(out, "{}", route)?;
            }
        }
    }
    Ok(())
}
