//! Path segmentation.
//!
//! A path is split immediately before every `/` and `#`, and always starts
//! with the root segment `/`:
//!
//! ```text
//! /foo/bar#baz   ->  "/"  "/foo"  "/bar"  "#baz"
//! #baz           ->  "/"  "#baz"
//! /              ->  "/"
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RouterError;

/// A bracketed custom expression that spans a path separator.
static SLASH_IN_EXPR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^<>]*/[^<>]*>").expect("custom expression regex should be valid"));

const ROOT: &str = "/";

/// Visitor verdict after each segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    Stop,
}

/// One visited segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'p> {
    /// Position of the segment; the root is `0`
    pub index: usize,
    /// The segment's own text
    pub segment: &'p str,
    /// Input from its start through this segment (`/` for the root)
    pub consumed: &'p str,
    /// Input from the start of this segment to the end, `None` for the last segment
    pub remaining: Option<&'p str>,
}

impl Step<'_> {
    pub fn is_root(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.remaining.is_none()
    }
}

/// Split a path into its segments, root first.
///
/// # Errors
///
/// [`RouterError::SlashInCustomExpr`] if the path contains a `<expr>` that
/// spans a `/`; this is checked before splitting since splitting would cut the
/// expression in half.
pub fn segments(path: &str) -> Result<Vec<Step<'_>>, RouterError> {
    if let Some(found) = SLASH_IN_EXPR.find(path) {
        return Err(RouterError::SlashInCustomExpr {
            given: found.as_str().to_string(),
        });
    }

    // Byte offsets where each part starts
    let mut starts: Vec<usize> = path
        .char_indices()
        .filter(|&(i, c)| i > 0 && (c == '/' || c == '#'))
        .map(|(i, _)| i)
        .collect();
    starts.insert(0, 0);

    // A leading standalone "/" doubles as the root segment
    let explicit_root = path.starts_with(ROOT) && starts.get(1).map_or(path.len(), |&s| s) == 1;
    let parts: Vec<(usize, usize)> = starts
        .iter()
        .enumerate()
        .map(|(n, &start)| (start, starts.get(n + 1).copied().unwrap_or(path.len())))
        .filter(|&(start, end)| end > start)
        .skip(usize::from(explicit_root))
        .collect();

    let mut steps = Vec::with_capacity(parts.len() + 1);
    steps.push(Step {
        index: 0,
        segment: ROOT,
        consumed: ROOT,
        remaining: (!parts.is_empty()).then_some(path),
    });

    let count = parts.len();
    for (n, &(start, end)) in parts.iter().enumerate() {
        steps.push(Step {
            index: n + 1,
            segment: &path[start..end],
            consumed: &path[..end],
            remaining: (n + 1 < count).then(|| &path[start..]),
        });
    }

    Ok(steps)
}

/// Visit each segment of `path` in order until the visitor stops or fails.
///
/// # Errors
///
/// Propagates segmentation errors and the first error returned by `visit`.
pub fn walk<'p, F>(path: &'p str, mut visit: F) -> Result<(), RouterError>
where
    F: FnMut(Step<'p>) -> Result<Walk, RouterError>,
{
    for step in segments(path)? {
        if visit(step)? == Walk::Stop {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(path: &str) -> Vec<&str> {
        segments(path).unwrap().iter().map(|s| s.segment).collect()
    }

    #[test]
    fn test_splits_before_slash_and_hash() {
        assert_eq!(texts("/foo/bar#baz"), vec!["/", "/foo", "/bar", "#baz"]);
        assert_eq!(texts("/nested#a/b/c"), vec!["/", "/nested", "#a", "/b", "/c"]);
    }

    #[test]
    fn test_root_is_implicit() {
        assert_eq!(texts("/"), vec!["/"]);
        assert_eq!(texts("#x"), vec!["/", "#x"]);
        assert_eq!(texts("/#x"), vec!["/", "#x"]);
        assert_eq!(texts("//"), vec!["/", "/"]);
        assert_eq!(texts("/players/"), vec!["/", "/players", "/"]);
    }

    #[test]
    fn test_consumed_and_remaining() {
        let steps = segments("/a/b#c").unwrap();
        let consumed: Vec<&str> = steps.iter().map(|s| s.consumed).collect();
        assert_eq!(consumed, vec!["/", "/a", "/a/b", "/a/b#c"]);

        let remaining: Vec<Option<&str>> = steps.iter().map(|s| s.remaining).collect();
        assert_eq!(
            remaining,
            vec![Some("/a/b#c"), Some("/a/b#c"), Some("/b#c"), None]
        );
        assert!(steps[0].is_root());
        assert!(steps[3].is_last());
    }

    #[test]
    fn test_single_root_has_no_remaining() {
        let steps = segments("/").unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].remaining, None);
    }

    #[test]
    fn test_walk_stops_when_visitor_says_so() {
        let mut seen = Vec::new();
        walk("/a/b/c", |step| {
            seen.push(step.segment);
            Ok(if step.segment == "/b" { Walk::Stop } else { Walk::Continue })
        })
        .unwrap();
        assert_eq!(seen, vec!["/", "/a", "/b"]);
    }

    #[test]
    fn test_rejects_custom_expression_with_slash() {
        let err = segments("/x:y<a/b>").unwrap_err();
        assert_eq!(
            err,
            RouterError::SlashInCustomExpr {
                given: "<a/b>".to_string()
            }
        );
    }

    #[test]
    fn test_custom_expression_without_slash_is_kept_whole() {
        assert_eq!(
            texts(r"/v:major<\d+>(.:minor<\d+>)#:branch"),
            vec!["/", r"/v:major<\d+>(.:minor<\d+>)", "#:branch"]
        );
    }
}
