//! Startup orchestration.
//!
//! # Responsibilities
//! - Produce the initial route set from a validated configuration
//! - Prefer a cached snapshot when caching is enabled
//! - Write the snapshot after a fresh draw
//!
//! # Design Decisions
//! - Fail fast: a corrupt snapshot and route build errors abort startup
//! - A snapshot file that can't be read is redrawn from config
//! - Failing to write the snapshot is logged; the drawn routes still serve

use std::path::Path;

use crate::config::schema::RouterConfig;
use crate::route_set::{AliasRegistry, RouteSet, RouteSetSnapshot};
use crate::routing::types::{RoutingError, RoutingResult};

/// Build the route set described by `config`.
pub fn boot(config: &RouterConfig, aliases: AliasRegistry) -> RoutingResult<RouteSet> {
    let snapshot_path = Path::new(&config.cache.snapshot_path);

    if config.cache.enabled && snapshot_path.exists() {
        match RouteSetSnapshot::load_from_file(snapshot_path) {
            Ok(snapshot) => {
                let mut routes = RouteSet::new(aliases);
                routes.draw_cached(snapshot)?;
                tracing::info!(
                    path = %snapshot_path.display(),
                    routes = routes.len(),
                    "Booted from route snapshot"
                );
                return Ok(routes);
            }
            Err(RoutingError::Io(e)) => tracing::warn!(
                path = %snapshot_path.display(),
                error = %e,
                "Route snapshot unreadable, drawing from config"
            ),
            Err(e) => return Err(e),
        }
    }

    draw_fresh(config, aliases)
}

/// Draw `config` without consulting the snapshot, saving one if caching is on.
pub fn draw_fresh(config: &RouterConfig, aliases: AliasRegistry) -> RoutingResult<RouteSet> {
    let mut routes = RouteSet::new(aliases);
    routes.set_cache_routes(config.cache.enabled);
    routes.draw_config(config)?;

    if let Some(snapshot) = routes.cached_routes() {
        let path = Path::new(&config.cache.snapshot_path);
        if let Err(e) = snapshot.save_to_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write route snapshot");
        }
    }

    tracing::info!(routes = routes.len(), "Booted from route config");
    Ok(routes)
}
