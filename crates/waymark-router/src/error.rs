use thiserror::Error;

/// Errors produced while parsing a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A catch-all segment appears before the last segment.
    #[error("catch-all segment '{0}' must be the last segment")]
    CatchAllNotTrailing(String),

    /// More than one catch-all segment in the same pattern.
    #[error("pattern contains more than one catch-all segment")]
    MultipleCatchAll,

    /// `:` with no name after it.
    #[error("empty parameter name")]
    EmptyParamName,

    /// Parameter names are restricted to ASCII alphanumerics and `_`.
    #[error("invalid character '{1}' in parameter name '{0}'")]
    InvalidParamName(String, char),

    /// The same parameter name is bound twice.
    #[error("duplicate parameter '{0}'")]
    DuplicateParam(String),
}

/// Errors produced while normalizing routes or constructing a router.
///
/// All of these surface at construction time. Lookups never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// E2001: Named route has no resolvable path.
    #[error("E2001: route '{key}' has no path")]
    MissingPath { key: String },

    /// E2002: Named route has no resolvable method.
    #[error("E2002: route '{key}' has no methods")]
    MissingMethods { key: String },

    /// E2003: Route entry reached a router with an empty method list.
    #[error("E2003: route entry for '{path}' has an empty method list")]
    EmptyMethods { path: String },

    /// E2004: Method token is not a valid HTTP token.
    #[error("E2004: invalid method '{method}' for '{path}'")]
    InvalidMethod { path: String, method: String },

    /// E2004: Named route declares a method that is not a valid HTTP token.
    #[error("E2004: route '{key}' has invalid method '{method}'")]
    InvalidRouteMethod { key: String, method: String },

    /// E2010: Path pattern failed to parse.
    #[error("E2010: invalid pattern '{path}': {source}")]
    InvalidPattern {
        path: String,
        #[source]
        source: PatternError,
    },

    /// E2010: Named route's path pattern failed to parse.
    #[error("E2010: route '{key}' has invalid pattern '{path}': {source}")]
    InvalidRoutePattern {
        key: String,
        path: String,
        #[source]
        source: PatternError,
    },
}
