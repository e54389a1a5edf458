//! Path resolution against a [`RouteTree`].
//!
//! Resolution walks the input segment by segment. At each level the children
//! are tried in priority order and the first match is descended into, so the
//! result is the chain of routes from the root to the deepest match.
//!
//! A failed walk can be retried: every child descended into while cheaper
//! siblings were still untried is remembered, and the next attempt skips it.
//! That is how a request that dead-ends under `/:a/:b/:c` falls back to a
//! sibling splat such as `/*_`.

use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

use super::params::Params;
use super::tree::{RouteNode, RouteTree};
use super::walk::{self, Step, Walk};
use crate::error::RouterError;
use crate::info::RouteInfo;

/// One matched route in a resolved chain.
///
/// Serializes flat: the route's info fields sit next to `matches`, `params`,
/// `route` and `path`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRecord {
    #[serde(flatten)]
    pub info: RouteInfo,
    /// Whether this route claims the input; `false` only for exact routes
    /// matched above the last segment
    pub matches: bool,
    /// Parameters accumulated from the root down to this route
    pub params: Params,
    /// The route's full path pattern
    pub route: String,
    /// Portion of the input this route matched
    pub path: String,
}

impl RouteRecord {
    fn new(node: &RouteNode, step: &Step<'_>, params: &Params) -> Self {
        let info = node.effective_info().cloned().unwrap_or_default();
        // Non-exact routes always match; exact ones only where the input ends
        let matches = !info.exact() || step.is_last();
        // A splat claims the input from its own segment onward
        let path = match step.remaining {
            Some(rest) if node.pattern().is_splat() => rest,
            _ => step.consumed,
        };
        Self {
            info,
            matches,
            params: params.clone(),
            route: node.route().to_string(),
            path: path.to_string(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.info.fallback()
    }

    #[inline]
    #[must_use]
    pub fn is_hash(&self) -> bool {
        self.route.contains('#')
    }
}

/// Everything before the first `?`.
pub(crate) fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(before, _)| before)
}

/// Rejects inputs that do not start with `/`, naming their first segment.
pub(crate) fn ensure_absolute(requested: &str, input: &str) -> Result<(), RouterError> {
    if input.starts_with('/') {
        return Ok(());
    }
    let steps = walk::segments(input)?;
    let segment = steps.get(1).map_or(input, |s| s.segment);
    Err(RouterError::not_found(requested, segment))
}

/// A single walk of `input` through `tree`.
///
/// `sink` receives each visited segment with the records it produced. Routes
/// listed in `seen` are skipped; routes descended into while lower-priority
/// siblings remained untried are appended to `choices`.
fn reduce<'p, F>(
    tree: &RouteTree,
    input: &'p str,
    requested: &str,
    seen: &HashSet<String>,
    choices: &mut Vec<String>,
    mut sink: F,
) -> Result<(), RouterError>
where
    F: FnMut(&Step<'p>, Vec<RouteRecord>),
{
    let mut level = tree.roots();
    let mut params = Params::new();

    walk::walk(input, |step| {
        let mut records = Vec::new();
        let mut next: Option<&RouteNode> = None;
        let mut matched = false;

        let candidates: Vec<&RouteNode> = level
            .iter()
            .filter(|node| !seen.contains(node.route()))
            .collect();

        for (i, node) in candidates.iter().copied().enumerate() {
            let splat = node.pattern().is_splat();
            let text = if splat {
                step.remaining.unwrap_or(step.segment)
            } else {
                step.segment
            };
            let Some(found) = node.pattern().matches(text) else {
                continue;
            };

            matched = true;
            params.merge(found);
            records.push(RouteRecord::new(node, &step, &params));
            trace!(segment = %step.segment, route = %node.route(), "Segment matched");

            if step.is_last() && node.children().is_empty() {
                break;
            }
            // A splat sibling may still claim the final segment
            if !splat && step.is_last() && level.has_splat() {
                continue;
            }
            if i + 1 < candidates.len() {
                choices.push(node.route().to_string());
            }
            next = Some(node);
            break;
        }

        if !matched {
            if step.segment == "/" && step.is_last() && !step.is_root() {
                sink(&step, records);
                return Ok(Walk::Stop);
            }
            return Err(RouterError::not_found(requested, step.segment));
        }

        sink(&step, records);
        match next {
            Some(node) => {
                level = node.children();
                Ok(if node.pattern().is_splat() {
                    Walk::Stop
                } else {
                    Walk::Continue
                })
            }
            None => Ok(Walk::Stop),
        }
    })
}

/// Resolve `path` to its chain of records, retrying up to `attempts` times.
///
/// Fallback records are ordered after all others, and hash records after
/// path records; the sort is stable so walk order decides the rest.
///
/// # Errors
///
/// [`RouterError::NotFound`] if every attempt dead-ends, or a segmentation
/// error for malformed input.
pub(crate) fn find(
    tree: &RouteTree,
    path: &str,
    attempts: u32,
) -> Result<Vec<RouteRecord>, RouterError> {
    let input = strip_query(path);
    ensure_absolute(path, input)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut attempt = 1;
    loop {
        let mut records = Vec::new();
        let mut choices = Vec::new();
        let outcome = reduce(tree, input, path, &seen, &mut choices, |_, found| {
            records.extend(found);
        });

        match outcome {
            Ok(()) => {
                records.sort_by_key(|r| (r.is_fallback(), r.is_hash()));
                return Ok(records);
            }
            Err(e) if e.is_not_found() && attempt < attempts.max(1) && !choices.is_empty() => {
                trace!(path = %path, attempt, skipped = ?choices, "Retrying with untried siblings");
                seen.extend(choices);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Walk `path` once, reporting each segment's records as they are found.
///
/// `callback` receives the consumed prefix with either that segment's new
/// records or the error that ended the walk.
pub(crate) fn resolve<F>(tree: &RouteTree, path: &str, mut callback: F)
where
    F: FnMut(&str, Result<&[RouteRecord], &RouterError>),
{
    let input = strip_query(path);
    if let Err(e) = ensure_absolute(path, input) {
        callback(input, Err(&e));
        return;
    }

    let outcome = reduce(tree, input, path, &HashSet::new(), &mut Vec::new(), |step, records| {
        callback(step.consumed, Ok(records.as_slice()));
    });
    if let Err(e) = outcome {
        callback(input, Err(&e));
    }
}
