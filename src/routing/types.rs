//! Routing types and error definitions.

use std::collections::BTreeMap;

use thiserror::Error;

/// Route parameters extracted from a path, keyed by variable name.
pub type Params = BTreeMap<String, String>;

/// Errors raised while defining, building, caching or generating routes.
///
/// Everything here is a configuration-time failure. A request path that
/// simply doesn't match a route is reported as `Ok(None)` by the matcher.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Endpoint token without a single `#` separator.
    #[error("Malformed path token '{0}': expected exactly one '#' separator")]
    MalformedToken(String),

    /// Token with an empty controller half and no current route to complete it.
    #[error("Can't complete path token '{0}' as there's no current route")]
    UnresolvedToken(String),

    /// Route path is blank.
    #[error("Path can't be empty")]
    EmptyPath,

    /// Invalid verbs, alias or segment options.
    #[error("Invalid route options for '{path}': {reason}")]
    InvalidRouteOptions { path: String, reason: String },

    /// Constraint regex is anchored or doesn't compile.
    #[error("Invalid constraint for '{name}': {reason}")]
    InvalidConstraint { name: String, reason: String },

    /// Unbalanced parentheses or repeated variable names.
    #[error("Malformed route pattern '{path}': {reason}")]
    MalformedPattern { path: String, reason: String },

    /// Alias already taken in the registry.
    #[error("Route alias '{0}' is already in use")]
    DuplicateAlias(String),

    /// No route registered under the alias.
    #[error("No route named '{0}'")]
    UnknownAlias(String),

    /// Reverse generation is missing a mandatory variable.
    #[error("Missing parameter '{name}' to generate '{path}'")]
    MissingParameter { path: String, name: String },

    /// Reverse generation got a value that violates a constraint.
    #[error("Parameter '{name}' with value '{value}' doesn't satisfy its constraint")]
    ParameterMismatch { name: String, value: String },

    /// Snapshot is missing data or isn't internally consistent.
    #[error("Route snapshot is corrupt: {0}")]
    CorruptSnapshot(String),

    /// Snapshot file could not be read or written.
    #[error("Snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file could not be (de)serialized.
    #[error("Snapshot format error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for routing operations.
pub type RoutingResult<T> = Result<T, RoutingError>;
