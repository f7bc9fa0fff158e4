//! Route set: the ordered collection a dispatcher walks.
//!
//! # Data Flow
//! ```text
//! draw(block)                      draw_cached(snapshot)
//!     → mapper.rs records routes       → snapshot.rs restores built routes
//!     → Route::build each              │
//!     → aliases.rs registers names ◀───┘
//!     → (cache on) snapshot.rs exports
//!
//! recognize(path, verb)
//!     → root, routes in order, assets
//!     → Matcher on each, first match wins
//!     → RouteMatch { route, params } → Endpoint
//! ```
//!
//! # Design Decisions
//! - Drawn once; later draws are no-ops
//! - Every route is built at draw time so bad definitions fail at startup
//! - Immutable after drawing, shared across threads behind `Arc`

pub mod aliases;
pub mod mapper;
pub mod snapshot;

use crate::config::schema::RouterConfig;
use crate::observability::metrics;
use crate::routing::matcher::Matcher;
use crate::routing::route::Route;
use crate::routing::types::{Params, RoutingError, RoutingResult};

pub use aliases::AliasRegistry;
pub use mapper::{Mapper, ScopeOptions};
pub use snapshot::{RouteSetSnapshot, RouteSnapshot};

/// What a matched route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Action {
        controller: String,
        action: String,
        namespaces: Vec<String>,
    },
    Handler(String),
}

/// A route that matched a request, with its parameters.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
}

impl RouteMatch<'_> {
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Resolve the dispatch target. `controller` and `action` parameters
    /// captured from the path take precedence over the route's token.
    pub fn endpoint(&self) -> Endpoint {
        use crate::routing::options::RouteTarget;

        if let RouteTarget::Handler(name) = self.route.to() {
            return Endpoint::Handler(name.clone());
        }

        let token = self.route.built().and_then(|b| b.endpoint());
        let pick = |key: &str, fallback: Option<&str>| {
            self.params
                .get(key)
                .cloned()
                .or_else(|| fallback.map(str::to_string))
                .unwrap_or_default()
        };

        Endpoint::Action {
            controller: pick("controller", token.map(|t| t.controller())),
            action: pick("action", token.map(|t| t.action())),
            namespaces: token.map(|t| t.namespaces().to_vec()).unwrap_or_default(),
        }
    }
}

/// Ordered routes plus the designated root and assets routes.
#[derive(Debug, Default)]
pub struct RouteSet {
    routes: Vec<Route>,
    root: Option<Route>,
    assets: Option<Route>,
    aliases: AliasRegistry,
    drawn: bool,
    cache_routes: bool,
    cached: Option<RouteSetSnapshot>,
    matcher: Matcher,
}

impl RouteSet {
    /// Empty set claiming aliases in `aliases`.
    pub fn new(aliases: AliasRegistry) -> Self {
        Self {
            aliases,
            ..Self::default()
        }
    }

    /// Export a snapshot when drawing.
    pub fn set_cache_routes(&mut self, value: bool) {
        self.cache_routes = value;
    }

    /// Snapshot produced by the last `draw` with caching on.
    pub fn cached_routes(&self) -> Option<&RouteSetSnapshot> {
        self.cached.as_ref()
    }

    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Run the definition block once, then build and register every route.
    pub fn draw(&mut self, block: impl FnOnce(&mut Mapper)) -> RoutingResult<()> {
        if self.drawn {
            tracing::debug!("Routes already drawn, skipping");
            return Ok(());
        }

        let mut mapper = Mapper::new();
        block(&mut mapper);

        // Build everything before claiming aliases: a failed draw leaves
        // both the set and the registry untouched.
        for route in mapper.root.iter().chain(&mapper.routes).chain(&mapper.assets) {
            route.build()?;
        }
        self.aliases.register_all(
            mapper
                .root
                .iter()
                .chain(&mapper.routes)
                .chain(&mapper.assets)
                .filter_map(Route::alias),
        )?;

        if let Some(root) = mapper.root {
            self.set_root_route(root);
        }
        for route in mapper.routes {
            self.add(route);
        }
        if let Some(assets) = mapper.assets {
            self.set_assets_route(assets);
        }
        self.drawn = true;

        if self.cache_routes {
            self.cached = Some(self.export()?);
        }

        metrics::record_routes_drawn(self.len());
        tracing::info!(
            routes = self.len(),
            cached = self.cache_routes,
            "Routes drawn"
        );
        Ok(())
    }

    /// Rehydrate from a snapshot instead of drawing. Runs once.
    pub fn draw_cached(&mut self, snapshot: RouteSetSnapshot) -> RoutingResult<()> {
        if self.drawn {
            tracing::debug!("Routes already drawn, ignoring snapshot");
            return Ok(());
        }

        // Restore everything before touching the set: no partial rehydration.
        let root = snapshot.root.map(RouteSnapshot::restore).transpose()?;
        let routes = snapshot
            .routes
            .into_iter()
            .map(RouteSnapshot::restore)
            .collect::<RoutingResult<Vec<_>>>()?;
        let assets = snapshot.assets.map(RouteSnapshot::restore).transpose()?;

        let aliases: Vec<&str> = root
            .iter()
            .chain(&routes)
            .chain(&assets)
            .filter_map(Route::alias)
            .collect();
        if let Some(alias) = repeated(&aliases) {
            return Err(RoutingError::CorruptSnapshot(format!(
                "alias '{}' appears more than once",
                alias
            )));
        }
        self.aliases.register_all(aliases)?;

        self.root = root;
        self.routes = routes;
        self.assets = assets;
        self.drawn = true;

        metrics::record_routes_drawn(self.len());
        tracing::info!(routes = self.len(), "Routes restored from snapshot");
        Ok(())
    }

    /// Draw the routes declared in a route file.
    pub fn draw_config(&mut self, config: &RouterConfig) -> RoutingResult<()> {
        self.draw(|map| {
            if let Some(root) = &config.root {
                map.root(root.as_str());
            }
            for route in &config.routes {
                within(map, &route.namespace, &mut |map| {
                    map.route(&route.path, route.target(), route.options());
                });
            }
            if let Some(assets) = &config.assets {
                map.assets(&assets.path, assets.target());
            }
        })
    }

    /// Snapshot of every route in the set, building as needed.
    pub fn export(&self) -> RoutingResult<RouteSetSnapshot> {
        Ok(RouteSetSnapshot {
            root: self.root.as_ref().map(RouteSnapshot::export).transpose()?,
            routes: self
                .routes
                .iter()
                .map(RouteSnapshot::export)
                .collect::<RoutingResult<Vec<_>>>()?,
            assets: self.assets.as_ref().map(RouteSnapshot::export).transpose()?,
        })
    }

    /// Append a route. Duplicates are allowed; the first match wins.
    pub fn add(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn set_root_route(&mut self, route: Route) {
        self.root = Some(route);
    }

    pub fn set_assets_route(&mut self, route: Route) {
        self.assets = Some(route);
    }

    pub fn root_route(&self) -> Option<&Route> {
        self.root.as_ref()
    }

    pub fn assets_route(&self) -> Option<&Route> {
        self.assets.as_ref()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Root, routes and assets, in matching order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.root.iter().chain(&self.routes).chain(&self.assets)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_by_alias(&self, alias: &str) -> Option<&Route> {
        self.iter().find(|r| r.alias() == Some(alias))
    }

    /// First route matching `path` and `verb`.
    pub fn recognize(&self, path: &str, verb: &str) -> RoutingResult<Option<RouteMatch<'_>>> {
        for route in self.iter() {
            if let Some(params) = self.matcher.match_route(route, path, verb)? {
                metrics::record_recognize(true);
                tracing::debug!(path, verb, route = %route.path(), "Route recognized");
                return Ok(Some(RouteMatch { route, params }));
            }
        }
        metrics::record_recognize(false);
        tracing::debug!(path, verb, "No route matched");
        Ok(None)
    }

    /// Generate the path of the route named `alias`.
    pub fn path_for(&self, alias: &str, params: &Params) -> RoutingResult<String> {
        self.find_by_alias(alias)
            .ok_or_else(|| RoutingError::UnknownAlias(alias.to_string()))?
            .generate(params)
    }

}

fn repeated<'a>(aliases: &[&'a str]) -> Option<&'a str> {
    let mut seen = std::collections::HashSet::new();
    aliases.iter().copied().find(|alias| !seen.insert(*alias))
}

/// Run `block` nested in each namespace of `namespaces`, outermost first.
fn within(map: &mut Mapper, namespaces: &[String], block: &mut dyn FnMut(&mut Mapper)) {
    match namespaces.split_first() {
        None => block(map),
        Some((first, rest)) => {
            map.namespace(first, |map| within(map, rest, block));
        }
    }
}

impl<'a> IntoIterator for &'a RouteSet {
    type Item = &'a Route;
    type IntoIter = Box<dyn Iterator<Item = &'a Route> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
