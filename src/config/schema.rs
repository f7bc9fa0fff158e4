//! Configuration schema definitions.
//!
//! This module defines the route file structure. All types derive Serde
//! traits for deserialization from TOML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::routing::options::{FormatPolicy, RouteOptions, RouteTarget};

/// Root configuration: routes plus the settings around them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Ordinary routes, matched in declaration order.
    pub routes: Vec<RouteConfig>,

    /// Token for the `/` route.
    pub root: Option<String>,

    /// Static assets route, matched last.
    pub assets: Option<RouteConfig>,

    /// Built route caching.
    pub cache: CacheConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// One route definition.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern, e.g. `posts/:id(.:format)`.
    pub path: String,

    /// `controller#action` token.
    #[serde(default)]
    pub to: Option<String>,

    /// Opaque handler name, used instead of `to`.
    #[serde(default)]
    pub handler: Option<String>,

    #[serde(default = "default_verbs")]
    pub verbs: Vec<String>,

    #[serde(default)]
    pub alias: Option<String>,

    #[serde(default)]
    pub format: FormatPolicy,

    #[serde(default)]
    pub constraints: BTreeMap<String, String>,

    #[serde(default)]
    pub defaults: BTreeMap<String, String>,

    /// Controller namespaces, outermost first.
    #[serde(default)]
    pub namespace: Vec<String>,

    /// Any other scalar key: `/.../` values constrain, others default.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

fn default_verbs() -> Vec<String> {
    vec!["get".to_string()]
}

impl RouteConfig {
    /// Dispatch target; a handler takes precedence over a token.
    pub fn target(&self) -> RouteTarget {
        match (&self.handler, &self.to) {
            (Some(handler), _) => RouteTarget::Handler(handler.clone()),
            (None, Some(to)) => RouteTarget::Token(to.clone()),
            (None, None) => RouteTarget::Token(String::new()),
        }
    }

    pub fn options(&self) -> RouteOptions {
        RouteOptions {
            verbs: self.verbs.clone(),
            alias: self.alias.clone(),
            format: self.format.clone(),
            constraints: self.constraints.clone(),
            defaults: self.defaults.clone(),
            extra: self.extra.clone(),
        }
    }
}

/// Built route caching configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Restore from the snapshot when present; write it after drawing.
    pub enabled: bool,

    /// Snapshot file location.
    pub snapshot_path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            snapshot_path: "routes.cache.json".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Serve Prometheus metrics while watching.
    pub metrics_enabled: bool,

    /// Prometheus scrape address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9000".to_string(),
        }
    }
}
