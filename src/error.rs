use std::fmt;

/// Errors raised while building or querying a route tree.
///
/// Every variant is surfaced immediately to the caller of
/// [`Router::add`](crate::Router::add), [`Router::rm`](crate::Router::rm) or
/// [`Router::find`](crate::Router::find). [`Router::resolve`](crate::Router::resolve)
/// never returns one; it hands the error to its callback instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// No child of the tree matched a segment of the requested path.
    NotFound {
        /// The path that was originally requested
        route: String,
        /// The segment at which matching failed
        segment: String,
    },
    /// A segment pattern did not compile into a valid matcher.
    ///
    /// Nested parameter groups such as `/:foo(/:bar)` end up here, because
    /// splitting on `/` leaves unbalanced groups behind.
    InvalidPattern {
        /// The full route the pattern belongs to
        route: String,
        /// The offending segment pattern
        pattern: String,
        /// Reason reported by the regex compiler
        reason: String,
    },
    /// A custom `<expr>` body contains a path separator.
    SlashInCustomExpr {
        /// The bracketed expression as written
        given: String,
    },
    /// `add` was called with an empty path or one not starting with `/` or `#`.
    InvalidPath {
        /// The rejected path
        given: String,
    },
}

impl RouterError {
    pub(crate) fn not_found(route: &str, segment: &str) -> Self {
        RouterError::NotFound {
            route: route.to_string(),
            segment: segment.to_string(),
        }
    }

    /// Returns `true` for [`RouterError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouterError::NotFound { .. })
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::NotFound { route, segment } => {
                write!(
                    f,
                    "unreachable route '{}', segment '{}' is not defined",
                    route, segment
                )
            }
            RouterError::InvalidPattern {
                route,
                pattern,
                reason,
            } => {
                write!(
                    f,
                    "invalid route expression '{}' in '{}': {}",
                    pattern, route, reason
                )
            }
            RouterError::SlashInCustomExpr { given } => {
                write!(
                    f,
                    "custom expressions cannot contain slashes, given '{}'",
                    given
                )
            }
            RouterError::InvalidPath { given } => {
                write!(f, "routes should have a valid path, given '{}'", given)
            }
        }
    }
}

impl std::error::Error for RouterError {}
