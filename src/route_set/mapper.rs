//! Route definition DSL.
//!
//! A `Mapper` is handed to the block given to `RouteSet::draw`. It only
//! records definitions; building and alias registration happen in `draw`.
//!
//! ```ignore
//! routes.draw(|map| {
//!     map.root("home#index");
//!     map.get("posts(/:page)", "posts#index");
//!     map.namespace("admin", |map| {
//!         map.get("users/:id", "users#edit");
//!     });
//! })?;
//! ```

use crate::routing::options::{FormatPolicy, RouteOptions, RouteTarget, Scope};
use crate::routing::route::Route;
use crate::routing::token::PathToken;

/// Inherited settings for a `scope` block.
#[derive(Debug, Clone, Default)]
pub struct ScopeOptions {
    pub path: Option<String>,
    pub constraints: Vec<(String, String)>,
    pub defaults: Vec<(String, String)>,
}

/// Records route definitions for a route set.
#[derive(Debug, Default)]
pub struct Mapper {
    pub(crate) routes: Vec<Route>,
    pub(crate) root: Option<Route>,
    pub(crate) assets: Option<Route>,
    scope: Scope,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a route with explicit options.
    pub fn route(
        &mut self,
        path: &str,
        to: impl Into<RouteTarget>,
        options: RouteOptions,
    ) -> &mut Self {
        let route = Route::scoped(path, to, options, self.scope.clone());
        self.routes.push(route);
        self
    }

    pub fn get(&mut self, path: &str, to: impl Into<RouteTarget>) -> &mut Self {
        self.route(path, to, RouteOptions::verbs(["get"]))
    }

    pub fn post(&mut self, path: &str, to: impl Into<RouteTarget>) -> &mut Self {
        self.route(path, to, RouteOptions::verbs(["post"]))
    }

    pub fn put(&mut self, path: &str, to: impl Into<RouteTarget>) -> &mut Self {
        self.route(path, to, RouteOptions::verbs(["put"]))
    }

    pub fn patch(&mut self, path: &str, to: impl Into<RouteTarget>) -> &mut Self {
        self.route(path, to, RouteOptions::verbs(["patch"]))
    }

    pub fn delete(&mut self, path: &str, to: impl Into<RouteTarget>) -> &mut Self {
        self.route(path, to, RouteOptions::verbs(["delete"]))
    }

    /// Route for `/`, aliased `root` (prefixed inside namespaces).
    pub fn root(&mut self, to: impl Into<RouteTarget>) -> &mut Self {
        let alias = match self.scope.namespace.as_slice() {
            [] => "root".to_string(),
            namespace => format!("{}_root", namespace.join("_")),
        };
        let options = RouteOptions::verbs(["get"])
            .alias(alias)
            .format(FormatPolicy::Disabled);
        let route = Route::scoped("/", to, options, self.scope.clone());
        if self.scope.namespace.is_empty() {
            self.root = Some(route);
        } else {
            self.routes.push(route);
        }
        self
    }

    /// Route serving static assets, e.g. `assets/*path`.
    pub fn assets(&mut self, path: &str, to: impl Into<RouteTarget>) -> &mut Self {
        let options = RouteOptions::verbs(["get"]).alias("assets");
        self.assets = Some(Route::scoped(path, to, options, self.scope.clone()));
        self
    }

    /// Nest routes under `/name` with controllers in namespace `name`.
    pub fn namespace(&mut self, name: &str, block: impl FnOnce(&mut Mapper)) -> &mut Self {
        let mut scope = self.scope.clone();
        scope.namespace.push(name.to_string());
        scope.path_prefix = join_prefix(&scope.path_prefix, name);
        self.nested(scope, block)
    }

    /// Nest routes sharing a path prefix, constraints and defaults.
    pub fn scope(&mut self, options: ScopeOptions, block: impl FnOnce(&mut Mapper)) -> &mut Self {
        let mut scope = self.scope.clone();
        if let Some(path) = &options.path {
            scope.path_prefix = join_prefix(&scope.path_prefix, path);
        }
        scope.constraints.extend(options.constraints);
        scope.defaults.extend(options.defaults);
        self.nested(scope, block)
    }

    /// Nest routes whose `#action` tokens complete from `token`.
    pub fn controller(&mut self, token: PathToken, block: impl FnOnce(&mut Mapper)) -> &mut Self {
        let mut scope = self.scope.clone();
        scope.current = Some(token);
        self.nested(scope, block)
    }

    fn nested(&mut self, scope: Scope, block: impl FnOnce(&mut Mapper)) -> &mut Self {
        let outer = std::mem::replace(&mut self.scope, scope);
        block(self);
        self.scope = outer;
        self
    }
}

fn join_prefix(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let path = path.trim_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}/{}", prefix, path),
    }
}
