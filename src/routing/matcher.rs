//! Route matching logic.
//!
//! # Responsibilities
//! - Filter by HTTP verb (case-insensitive)
//! - Match the normalized path against the route regex
//! - Re-check captured values against their constraints
//! - Backfill defaults for optional variables that didn't participate
//!
//! # Design Decisions
//! - Verb is checked before the regex: no partial parameter sets
//! - No-match is `Ok(None)`; a dispatcher tries the next route
//! - Stateless: one matcher serves any number of routes and threads

use crate::routing::route::Route;
use crate::routing::types::{Params, RoutingResult};

/// Normalize a request path the same way route paths are normalized:
/// surrounding slashes trimmed, one leading slash, empty becomes `/`.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_matches('/'))
}

/// Matches request paths against built routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Match `path` (without query string) and `verb` against `route`.
    ///
    /// Builds the route first if needed; build errors are returned as `Err`.
    pub fn match_route(&self, route: &Route, path: &str, verb: &str) -> RoutingResult<Option<Params>> {
        let built = route.build()?;
        let path = normalize_path(path);

        if !built.accepts_verb(verb) {
            return Ok(None);
        }

        let Some(captures) = built.regex.captures(&path) else {
            return Ok(None);
        };

        let mut params = Params::new();
        for (var, check) in built.vars.iter().zip(&built.checks) {
            let Some(value) = captures.get(var.group) else {
                continue;
            };
            let value = value.as_str();
            if let Some(check) = check {
                if !check.is_match(value) {
                    tracing::trace!(
                        route = %built.path,
                        var = %var.name,
                        value,
                        "Constraint rejected captured value"
                    );
                    return Ok(None);
                }
            }
            params.insert(var.name.clone(), value.to_string());
        }

        for var in &built.vars {
            if params.contains_key(&var.name) {
                continue;
            }
            if let Some(default) = built.defaults.get(&var.name) {
                params.insert(var.name.clone(), default.clone());
            }
        }

        Ok(Some(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::options::RouteOptions;

    fn route(path: &str, options: RouteOptions) -> Route {
        Route::new(path, "post#show", options)
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//posts/"), "/posts");
        assert_eq!(normalize_path("posts/15"), "/posts/15");
    }

    #[test]
    fn test_wildcard_and_format() {
        let r = route(
            "post/show/:id(/*tags)",
            RouteOptions::verbs(["get"]).constraint("id", "15"),
        );
        let params = Matcher::new()
            .match_route(&r, "/post/show/15/footag-bartag_baztag.xml", "get")
            .unwrap()
            .unwrap();
        assert_eq!(params["id"], "15");
        assert_eq!(params["tags"], "footag-bartag_baztag");
        assert_eq!(params["format"], "xml");
    }

    #[test]
    fn test_literal_constraint() {
        let r = Route::new(
            "post/show/*book_name/:locale",
            "post#index",
            RouteOptions::verbs(["get"]).constraint("locale", "es"),
        );
        let matcher = Matcher::new();

        let params = matcher
            .match_route(&r, "/post/show/Kingdom-of-Solomon/es", "get")
            .unwrap()
            .unwrap();
        assert_eq!(params["book_name"], "Kingdom-of-Solomon");
        assert_eq!(params["locale"], "es");

        let miss = matcher
            .match_route(&r, "/post/show/Kingdom-of-Solomon/fr", "get")
            .unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn test_verb_mismatch() {
        let r = route("/posts/:id", RouteOptions::verbs(["get"]));
        let matcher = Matcher::new();
        assert!(matcher.match_route(&r, "/posts/1", "post").unwrap().is_none());
        assert!(matcher.match_route(&r, "/posts/1", "GET").unwrap().is_some());
    }

    #[test]
    fn test_optional_default_backfill() {
        let r = route(
            "/posts(/:page)",
            RouteOptions::verbs(["get"]).default_value("page", "1"),
        );
        let matcher = Matcher::new();

        let params = matcher.match_route(&r, "/posts", "get").unwrap().unwrap();
        assert_eq!(params["page"], "1");
        assert!(!params.contains_key("format"));

        let params = matcher.match_route(&r, "/posts/3", "get").unwrap().unwrap();
        assert_eq!(params["page"], "3");
    }

    #[test]
    fn test_regex_constraint() {
        let r = route("/posts/:id", RouteOptions::verbs(["get"]).constraint("id", r"/\d+/"));
        let matcher = Matcher::new();
        assert!(matcher.match_route(&r, "/posts/42", "get").unwrap().is_some());
        assert!(matcher.match_route(&r, "/posts/abc", "get").unwrap().is_none());
    }

    #[test]
    fn test_segment_stops_at_dot_and_slash() {
        let r = route("/posts/:id", RouteOptions::verbs(["get"]));
        let matcher = Matcher::new();
        let params = matcher.match_route(&r, "/posts/7.json", "get").unwrap().unwrap();
        assert_eq!(params["id"], "7");
        assert_eq!(params["format"], "json");
        assert!(matcher.match_route(&r, "/posts/7/edit", "get").unwrap().is_none());
    }

    #[test]
    fn test_trailing_slash_in_request() {
        let r = route("/posts/:id", RouteOptions::verbs(["get"]));
        let params = Matcher::new()
            .match_route(&r, "posts/9/", "get")
            .unwrap()
            .unwrap();
        assert_eq!(params["id"], "9");
    }

    #[test]
    fn test_build_error_surfaces() {
        let r = route("", RouteOptions::verbs(["get"]));
        assert!(Matcher::new().match_route(&r, "/", "get").is_err());
    }
}
