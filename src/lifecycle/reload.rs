//! Hot reload of the active route set.
//!
//! # Responsibilities
//! - Hold the route set readers dispatch against
//! - Replace it atomically when the route file changes
//!
//! # Design Decisions
//! - Readers take an `Arc` snapshot; a swap never blocks them
//! - Each reload draws into a fresh alias registry so unchanged aliases
//!   don't collide with the set being replaced
//! - A failed reload leaves the current set in place

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::mpsc;

use crate::config::schema::RouterConfig;
use crate::lifecycle::startup::draw_fresh;
use crate::observability::metrics;
use crate::route_set::{AliasRegistry, RouteSet};
use crate::routing::types::RoutingResult;

/// The active route set, swappable at runtime.
pub struct SharedRoutes {
    current: ArcSwap<RouteSet>,
}

impl SharedRoutes {
    pub fn new(routes: RouteSet) -> Self {
        Self {
            current: ArcSwap::from_pointee(routes),
        }
    }

    /// The route set active right now.
    pub fn load(&self) -> Arc<RouteSet> {
        self.current.load_full()
    }

    /// Draw `config` and make it the active set.
    pub fn apply(&self, config: &RouterConfig) -> RoutingResult<()> {
        match draw_fresh(config, AliasRegistry::new()) {
            Ok(routes) => {
                let count = routes.len();
                self.current.store(Arc::new(routes));
                metrics::record_reload(true);
                tracing::info!(routes = count, "Route set reloaded");
                Ok(())
            }
            Err(e) => {
                metrics::record_reload(false);
                tracing::error!(error = %e, "Route reload failed, keeping current routes");
                Err(e)
            }
        }
    }

    /// Apply every configuration received until the channel closes.
    pub async fn run(self: Arc<Self>, mut updates: mpsc::UnboundedReceiver<RouterConfig>) {
        while let Some(config) = updates.recv().await {
            let _ = self.apply(&config);
        }
        tracing::debug!("Route update channel closed");
    }
}
