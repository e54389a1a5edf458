//! Route manifests.
//!
//! A manifest declares a route tree in YAML or JSON, mirroring the
//! [`Router::mount`] / [`Router::add`] calls that would build it:
//!
//! ```yaml
//! routes:
//!   - path: /
//!     info: { component: Home }
//!   - mount: /foo
//!     routes:
//!       - path: /static
//!         info: { component: StaticOne }
//!       - path: /:bar
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::RouterError;
use crate::info::RouteInfo;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;

/// A route declaration or a group of them under a prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteEntry {
    Mount {
        mount: String,
        #[serde(default)]
        routes: Vec<RouteEntry>,
    },
    Route {
        path: String,
        #[serde(default)]
        info: RouteInfo,
    },
}

/// Parsed manifest file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl Manifest {
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML route manifest")
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON route manifest")
    }

    /// Register every entry on `router`, in declaration order.
    ///
    /// # Errors
    ///
    /// The first [`RouterError`] raised by `add`; entries before it stay
    /// registered.
    pub fn apply(&self, router: &mut Router) -> Result<(), RouterError> {
        apply_entries(router, &self.routes)
    }

    /// Build a fresh router from this manifest.
    ///
    /// # Errors
    ///
    /// Same as [`apply`](Manifest::apply).
    pub fn build(&self, config: RuntimeConfig) -> Result<Router, RouterError> {
        let mut router = Router::with_config(config);
        self.apply(&mut router)?;
        Ok(router)
    }
}

fn apply_entries(router: &mut Router, entries: &[RouteEntry]) -> Result<(), RouterError> {
    for entry in entries {
        match entry {
            RouteEntry::Route { path, info } => {
                router.add(path, info.clone())?;
            }
            RouteEntry::Mount { mount, routes } => {
                router.mount(mount, |r| apply_entries(r, routes))?;
            }
        }
    }
    Ok(())
}

/// Load a manifest file, choosing the format by extension (`.yaml`/`.yml`
/// for YAML, anything else as JSON).
///
/// # Errors
///
/// Fails if the file cannot be read or parsed.
pub fn load_manifest(file_path: impl AsRef<Path>) -> anyhow::Result<Manifest> {
    let file_path = file_path.as_ref();
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read route manifest {}", file_path.display()))?;

    let is_yaml = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let manifest = if is_yaml {
        Manifest::from_yaml(&content)
    } else {
        Manifest::from_json(&content)
    }
    .with_context(|| format!("Invalid route manifest {}", file_path.display()))?;

    debug!(
        manifest = %file_path.display(),
        entries = manifest.routes.len(),
        "Route manifest loaded"
    );
    Ok(manifest)
}
