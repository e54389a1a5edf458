//! Segment pattern compilation.
//!
//! Every tree node owns a [`PathMatcher`] compiled from its own segment text.
//! The grammar is small:
//!
//! | Syntax        | Meaning                                                  |
//! |---------------|----------------------------------------------------------|
//! | `:name`       | one segment's worth of characters other than `/` and `#` |
//! | `*name`       | splat, anything except `#` (crosses `/`)                 |
//! | `name<expr>`  | custom body for the preceding `:name` / `*name` capture  |
//! | `( ... )`     | optional group                                           |
//!
//! Everything else is matched literally. Matching never panics or errors; a
//! failed match is simply `None`.

use regex::Regex;
use std::borrow::Cow;
use std::sync::Arc;

use super::params::Params;
use crate::error::RouterError;

const NAMED_BODY: &str = "[^/#]*?";
const SPLAT_BODY: &str = "[^#]*?";
const TRAILING_TAIL: &str = "(?:/.*)?";
const GROUP_PREFIX: &str = "__nr";

/// Structural class of a segment pattern.
///
/// The derived ordering is the sibling ordering: literals are tried before
/// parameters, parameters before splats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatcherKind {
    /// No captures; matches its own text only
    Literal,
    /// At least one `:name` capture (default or custom body)
    Param,
    /// At least one `*name` capture
    Splat,
}

/// A compiled segment pattern.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    source: String,
    regex: Regex,
    keys: Vec<Arc<str>>,
    /// Capture-group index for each entry of `keys`
    slots: Vec<usize>,
    kind: MatcherKind,
    hash: bool,
    priority: u32,
}

impl PathMatcher {
    /// Compile one segment (or a whole pattern string) into a matcher.
    ///
    /// # Errors
    ///
    /// - [`RouterError::SlashInCustomExpr`] if a `<expr>` body contains `/`
    /// - [`RouterError::InvalidPattern`] if the translated expression is not a
    ///   valid regular expression. The error names the segment itself; tree
    ///   insertion rewrites it to name the full route.
    pub fn compile(segment: &str) -> Result<Self, RouterError> {
        let mut pattern = String::with_capacity(segment.len() * 2 + 16);
        pattern.push('^');

        let mut keys: Vec<Arc<str>> = Vec::new();
        let mut named = 0usize;
        let mut splats = 0usize;
        let mut literal_len = 0usize;

        let mut rest = segment;
        while let Some(c) = rest.chars().next() {
            match c {
                '(' => {
                    pattern.push_str("(?:");
                    rest = &rest[1..];
                }
                ')' => {
                    pattern.push_str(")?");
                    rest = &rest[1..];
                }
                ':' | '*' if param_name_len(&rest[1..]) > 0 => {
                    let name_len = param_name_len(&rest[1..]);
                    let name = &rest[1..=name_len];
                    rest = &rest[1 + name_len..];

                    let body = match custom_expr(rest) {
                        Some(expr) => {
                            if expr.contains('/') {
                                return Err(RouterError::SlashInCustomExpr {
                                    given: format!("<{}>", expr),
                                });
                            }
                            rest = &rest[expr.len() + 2..];
                            expr
                        }
                        None if c == '*' => SPLAT_BODY,
                        None => NAMED_BODY,
                    };

                    if c == '*' {
                        splats += 1;
                    } else {
                        named += 1;
                    }

                    pattern.push_str("(?P<");
                    pattern.push_str(GROUP_PREFIX);
                    pattern.push_str(&keys.len().to_string());
                    pattern.push('>');
                    pattern.push_str(body);
                    pattern.push(')');
                    keys.push(Arc::from(name));
                }
                _ => {
                    let mut buf = [0u8; 4];
                    pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
                    literal_len += 1;
                    rest = &rest[c.len_utf8()..];
                }
            }
        }

        if splats == 0 {
            pattern.push_str(TRAILING_TAIL);
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| RouterError::InvalidPattern {
            route: segment.to_string(),
            pattern: segment.to_string(),
            reason: e.to_string(),
        })?;

        let slots = (0..keys.len())
            .map(|i| {
                let group = format!("{}{}", GROUP_PREFIX, i);
                regex
                    .capture_names()
                    .position(|name| name == Some(group.as_str()))
                    .unwrap_or(0)
            })
            .collect();

        let kind = if splats > 0 {
            MatcherKind::Splat
        } else if named > 0 {
            MatcherKind::Param
        } else {
            MatcherKind::Literal
        };
        let hash = segment.contains('#');

        Ok(Self {
            source: segment.to_string(),
            regex,
            keys,
            slots,
            kind,
            hash,
            priority: priority_score(splats, named, hash, literal_len),
        })
    }

    /// Match a candidate string, returning its percent-decoded captures.
    ///
    /// Parameters whose optional group did not participate are present with
    /// a `None` value.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> Option<Params> {
        let caps = self.regex.captures(candidate)?;
        let mut params = Params::new();
        for (key, &slot) in self.keys.iter().zip(&self.slots) {
            let value = caps.get(slot).map(|m| decode(m.as_str()));
            params.insert(Arc::clone(key), value);
        }
        Some(params)
    }

    /// The segment text this matcher was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parameter names in declaration order.
    pub fn keys(&self) -> &[Arc<str>] {
        &self.keys
    }

    pub fn kind(&self) -> MatcherKind {
        self.kind
    }

    pub fn is_splat(&self) -> bool {
        self.kind == MatcherKind::Splat
    }

    /// Whether the pattern belongs to the hash namespace (`#...`).
    pub fn is_hash(&self) -> bool {
        self.hash
    }

    /// Sibling ordering score; lower is tried first.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// The generated regular expression, for diagnostics.
    pub fn as_regex(&self) -> &str {
        self.regex.as_str()
    }
}

/// Length of the `\w+` run that names a parameter.
fn param_name_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(s.len())
}

/// The `expr` of a leading `<expr>`, if the input starts with one.
fn custom_expr(s: &str) -> Option<&str> {
    let body = s.strip_prefix('<')?;
    let end = body.find(['<', '>'])?;
    if body[end..].starts_with('>') {
        Some(&body[..end])
    } else {
        None
    }
}

/// Packs the ordering criteria into one comparable number, most significant
/// first: splat count, parameter count, hash namespace, then literal length
/// (longer literal text is more specific and therefore lower).
fn priority_score(splats: usize, named: usize, hash: bool, literal_len: usize) -> u32 {
    let clamp = |n: usize| n.min(0xff) as u32;
    (clamp(splats) << 24) | (clamp(named) << 16) | (u32::from(hash) << 8) | (0xff - clamp(literal_len))
}

/// `decodeURIComponent`-style decoding; undecodable input is kept verbatim.
fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}
