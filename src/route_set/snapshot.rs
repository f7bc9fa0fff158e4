//! Route snapshots for caching built routes across restarts.
//!
//! # Responsibilities
//! - Export a built route to plain serializable data
//! - Rehydrate a built route from that data without running `build`
//! - Persist snapshots as JSON files
//!
//! # Design Decisions
//! - Explicit struct ↔ struct conversion, no reflection
//! - Snapshots carry raw inputs and every built field
//! - Inconsistent snapshots are rejected as a whole

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::routing::options::{Constraint, RouteOptions, RouteTarget, Scope};
use crate::routing::pattern::Pattern;
use crate::routing::route::{BuiltParts, BuiltRoute, Route, Variable};
use crate::routing::token::PathToken;
use crate::routing::types::{RoutingError, RoutingResult};

/// Serializable state of one built route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    pub raw_path: String,
    pub to: RouteTarget,
    pub options: RouteOptions,
    pub scope: Scope,
    pub path: String,
    pub pattern: Pattern,
    pub verbs: Vec<String>,
    pub alias: Option<String>,
    pub endpoint: Option<PathToken>,
    pub constraints: BTreeMap<String, Constraint>,
    pub defaults: BTreeMap<String, String>,
    pub requirements: BTreeMap<String, Constraint>,
    pub vars: Vec<Variable>,
    pub regex: String,
}

/// Serializable state of a whole route set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteSetSnapshot {
    pub root: Option<RouteSnapshot>,
    pub routes: Vec<RouteSnapshot>,
    pub assets: Option<RouteSnapshot>,
}

impl RouteSnapshot {
    /// Export `route`, building it first if needed.
    pub fn export(route: &Route) -> RoutingResult<Self> {
        let built = route.build()?;
        Ok(Self {
            raw_path: route.raw_path().to_string(),
            to: route.to().clone(),
            options: route.options().clone(),
            scope: route.scope().clone(),
            path: built.path.clone(),
            pattern: built.pattern.clone(),
            verbs: built.verbs.clone(),
            alias: built.alias.clone(),
            endpoint: built.endpoint.clone(),
            constraints: built.constraints.clone(),
            defaults: built.defaults.clone(),
            requirements: built.requirements.clone(),
            vars: built.vars.clone(),
            regex: built.regex.as_str().to_string(),
        })
    }

    /// Rehydrate a built route. The regex is recompiled from its source.
    pub fn restore(self) -> RoutingResult<Route> {
        let corrupt = |reason: String| {
            RoutingError::CorruptSnapshot(format!("route '{}': {}", self.raw_path, reason))
        };

        if self.verbs.is_empty() {
            return Err(corrupt("no verbs".to_string()));
        }

        let regex = Regex::new(&self.regex).map_err(|e| corrupt(e.to_string()))?;
        let groups = regex.captures_len();
        if let Some(var) = self.vars.iter().find(|v| v.group == 0 || v.group >= groups) {
            return Err(corrupt(format!(
                "variable '{}' points at missing capture group {}",
                var.name, var.group
            )));
        }

        let declared: Vec<&str> = self.pattern.variables().iter().map(|v| v.name).collect();
        let stored: Vec<&str> = self.vars.iter().map(|v| v.name.as_str()).collect();
        if declared != stored {
            return Err(corrupt("variables don't match the pattern".to_string()));
        }

        let built = BuiltRoute::assemble(BuiltParts {
            path: self.path,
            pattern: self.pattern,
            verbs: self.verbs,
            alias: self.alias,
            endpoint: self.endpoint,
            constraints: self.constraints,
            defaults: self.defaults,
            requirements: self.requirements,
            vars: self.vars,
            regex,
        })?;

        Ok(Route::prebuilt(
            self.raw_path,
            self.to,
            self.options,
            self.scope,
            built,
        ))
    }
}

impl RouteSetSnapshot {
    /// Load a snapshot from a JSON file.
    pub fn load_from_file(path: &Path) -> RoutingResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        // Read failures stay IO errors; only bad content is a format error.
        let snapshot: Self = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                RoutingError::Io(e.into())
            } else {
                RoutingError::Snapshot(e)
            }
        })?;
        tracing::info!(
            path = %path.display(),
            routes = snapshot.routes.len(),
            "Loaded route snapshot"
        );
        Ok(snapshot)
    }

    /// Write the snapshot to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> RoutingResult<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        tracing::info!(
            path = %path.display(),
            routes = self.routes.len(),
            "Saved route snapshot"
        );
        Ok(())
    }
}
