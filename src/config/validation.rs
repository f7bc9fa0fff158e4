//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every route has a target and verbs
//! - Detect duplicate aliases before any route set sees them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Pattern compilation is left to `Route::build`, which reports it precisely

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{RouteConfig, RouterConfig};

/// A single semantic problem in a route file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route '{path}': path is empty")]
    EmptyPath { path: String },

    #[error("route '{path}': needs exactly one of 'to' or 'handler'")]
    MissingTarget { path: String },

    #[error("route '{path}': verbs can't be empty")]
    NoVerbs { path: String },

    #[error("alias '{0}' is declared more than once")]
    DuplicateAlias(String),

    #[error("cache.snapshot_path can't be empty when caching is enabled")]
    EmptySnapshotPath,

    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut aliases = HashSet::new();

    for route in config.routes.iter().chain(&config.assets) {
        validate_route(route, &mut errors);
        if let Some(alias) = &route.alias {
            if !aliases.insert(alias.as_str()) {
                errors.push(ValidationError::DuplicateAlias(alias.clone()));
            }
        }
    }

    if config.root.is_some() && !aliases.insert("root") {
        errors.push(ValidationError::DuplicateAlias("root".to_string()));
    }

    if config.cache.enabled && config.cache.snapshot_path.trim().is_empty() {
        errors.push(ValidationError::EmptySnapshotPath);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    let path = route.path.clone();
    if route.path.trim().is_empty() {
        errors.push(ValidationError::EmptyPath { path: path.clone() });
    }
    if route.to.is_some() == route.handler.is_some() {
        errors.push(ValidationError::MissingTarget { path: path.clone() });
    }
    if route.verbs.iter().all(|v| v.trim().is_empty()) {
        errors.push(ValidationError::NoVerbs { path });
    }
}
