//! # Runtime Configuration Module
//!
//! Environment-driven tuning for the router.
//!
//! ## Environment Variables
//!
//! ### `NESTROUTE_RETRIES`
//!
//! Number of attempts [`Router::find`](crate::Router::find) makes before
//! giving up. Attempts after the first skip siblings that already dead-ended,
//! which is what lets fallback routes catch unmatched paths. Accepts decimal
//! (`2`) or hexadecimal (`0x2`). `0` is treated as `1`.
//!
//! Default: `1`
//!
//! ### `NESTROUTE_SLOW_MATCH_US`
//!
//! Matches slower than this many microseconds are logged at `warn` level
//! instead of `info`.
//!
//! Default: `1000`
//!
//! ## Usage
//!
//! ```rust
//! use nestroute::runtime_config::RuntimeConfig;
//! use nestroute::Router;
//!
//! let config = RuntimeConfig::from_env();
//! let router = Router::with_config(config);
//! assert!(router.config().retries >= 1);
//! ```

use std::env;
use std::time::Duration;

const DEFAULT_RETRIES: u32 = 1;
const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Attempts made by `find` (always at least 1)
    pub retries: u32,
    /// Threshold above which a match is reported as slow
    pub slow_match: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            retries: DEFAULT_RETRIES,
            slow_match: Duration::from_micros(DEFAULT_SLOW_MATCH_US),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let retries = lookup("NESTROUTE_RETRIES")
            .and_then(|v| parse_number(&v))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_RETRIES)
            .max(1);
        let slow_match_us = lookup("NESTROUTE_SLOW_MATCH_US")
            .and_then(|v| parse_number(&v))
            .unwrap_or(DEFAULT_SLOW_MATCH_US);
        RuntimeConfig {
            retries,
            slow_match: Duration::from_micros(slow_match_us),
        }
    }

    /// Same configuration with a different attempt budget.
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }
}

fn parse_number(val: &str) -> Option<u64> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
