//! Shared utilities for integration tests.

use std::path::{Path, PathBuf};

use route_engine::route_set::{AliasRegistry, RouteSet, ScopeOptions};
use route_engine::routing::{FormatPolicy, Params, RouteOptions, RouteTarget};

/// A small blog application's routes.
#[allow(dead_code)]
pub fn blog_routes() -> RouteSet {
    let mut routes = RouteSet::new(AliasRegistry::new());
    routes
        .draw(|map| {
            map.root("home#index");
            map.route(
                "posts(/:page)",
                "posts#index",
                RouteOptions::verbs(["get"])
                    .alias("posts")
                    .constraint("page", r"/\d+/")
                    .default_value("page", "1"),
            );
            map.route(
                "post/show/:id(/*tags)",
                "posts#show",
                RouteOptions::verbs(["get"]).alias("post"),
            );
            map.route("posts", "posts#create", RouteOptions::verbs(["post"]));
            map.namespace("admin", |map| {
                map.root("dashboard#index");
                map.route(
                    "users/:id",
                    "users#edit",
                    RouteOptions::verbs(["get", "patch"]).alias("admin_user"),
                );
            });
            let locale = ScopeOptions {
                path: Some(":locale".into()),
                constraints: vec![("locale".into(), "/en|es/".into())],
                defaults: vec![],
            };
            map.scope(locale, |map| {
                map.route(
                    "about",
                    "pages#about",
                    RouteOptions::verbs(["get"])
                        .alias("about")
                        .format(FormatPolicy::Disabled),
                );
            });
            map.route(
                "health",
                RouteTarget::Handler("health_check".into()),
                RouteOptions::verbs(["get"]).format(FormatPolicy::Disabled),
            );
            map.assets("assets/*path", "assets#serve");
        })
        .unwrap();
    routes
}

/// Build a parameter map from pairs.
#[allow(dead_code)]
pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Write a route file into `dir` and return its path.
#[allow(dead_code)]
pub fn write_route_file(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("routes.toml");
    std::fs::write(&path, contents).unwrap();
    path
}
