//! Route compilation and matching through the public API.

use route_engine::routing::{
    Constraint, FormatPolicy, Matcher, PathToken, Route, RouteOptions, RoutingError, Scope,
};

mod common;

fn get(path: &str, options: RouteOptions) -> Route {
    Route::new(path, "post#show", options)
}

#[test]
fn test_wildcard_with_format() {
    let route = get("post/show/:id(/*tags)", RouteOptions::verbs(["get"]));
    let params = Matcher::new()
        .match_route(&route, "/post/show/15/footag-bartag_baztag.xml", "get")
        .unwrap()
        .unwrap();

    assert_eq!(
        params,
        common::params(&[
            ("id", "15"),
            ("tags", "footag-bartag_baztag"),
            ("format", "xml"),
        ])
    );
}

#[test]
fn test_literal_constraint_accepts_and_rejects() {
    let route = Route::new(
        "post/show/*book_name/:locale",
        "post#index",
        RouteOptions::verbs(["get"]).constraint("locale", "es"),
    );
    let matcher = Matcher::new();

    let params = matcher
        .match_route(&route, "/post/show/Kingdom-of-Solomon/es", "get")
        .unwrap()
        .unwrap();
    assert_eq!(params["book_name"], "Kingdom-of-Solomon");
    assert_eq!(params["locale"], "es");

    assert!(matcher
        .match_route(&route, "/post/show/Kingdom-of-Solomon/fr", "get")
        .unwrap()
        .is_none());
}

#[test]
fn test_verb_restricts_match() {
    let route = get("post/show/:id", RouteOptions::verbs(["get"]));
    let matcher = Matcher::new();
    assert!(matcher.match_route(&route, "/post/show/1", "post").unwrap().is_none());
    assert!(matcher.match_route(&route, "/post/show/1", "Get").unwrap().is_some());
}

#[test]
fn test_absent_optional_group_uses_default() {
    let route = get(
        "archive(/:year(/:month))",
        RouteOptions::verbs(["get"])
            .default_value("year", "2024")
            .default_value("month", "01"),
    );
    let matcher = Matcher::new();

    let params = matcher.match_route(&route, "/archive", "get").unwrap().unwrap();
    assert_eq!(params["year"], "2024");
    assert_eq!(params["month"], "01");

    let params = matcher.match_route(&route, "/archive/2019", "get").unwrap().unwrap();
    assert_eq!(params["year"], "2019");
    assert_eq!(params["month"], "01");
}

#[test]
fn test_empty_path_fails_at_build() {
    for path in ["", "  "] {
        let route = get(path, RouteOptions::verbs(["get"]));
        assert!(matches!(route.build(), Err(RoutingError::EmptyPath)));
    }
}

#[test]
fn test_anchors_rejected_at_build() {
    for raw in [r"/^\w+/", r"/\w+$/", r"/\A\w+/", r"/\w+\Z/", r"/\w+\z/"] {
        let route = get(
            "post/show/:id",
            RouteOptions::verbs(["get"]).constraint("id", raw),
        );
        assert!(
            matches!(route.build(), Err(RoutingError::InvalidConstraint { .. })),
            "{}",
            raw
        );
    }
}

#[test]
fn test_invalid_regex_rejected_at_build() {
    let route = get(
        "post/show/:id",
        RouteOptions::verbs(["get"]).constraint("id", "/(unclosed/"),
    );
    assert!(matches!(
        route.build(),
        Err(RoutingError::InvalidConstraint { .. })
    ));
}

#[test]
fn test_nested_optional_groups_keep_order() {
    let route = get("/:a(/:b(/:c))/:d", RouteOptions::verbs(["get"]));
    let built = route.build().unwrap();
    let names: Vec<_> = built.vars().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c", "d", "format"]);

    let params = Matcher::new()
        .match_route(&route, "/1/2/3/4", "get")
        .unwrap()
        .unwrap();
    assert_eq!(params, common::params(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]));
}

#[test]
fn test_unbalanced_parentheses_rejected() {
    for path in ["/posts(/:page", "/posts/:page)"] {
        let route = get(path, RouteOptions::verbs(["get"]));
        assert!(
            matches!(route.build(), Err(RoutingError::MalformedPattern { .. })),
            "{}",
            path
        );
    }
}

#[test]
fn test_format_constraint_from_policy() {
    let route = get(
        "reports/:id",
        RouteOptions::verbs(["get"]).format(FormatPolicy::Constrained("/json|csv/".into())),
    );
    let built = route.build().unwrap();
    assert_eq!(built.path(), "/reports/:id.:format");
    assert!(!built.defaults().contains_key("format"));
    assert_eq!(
        built.requirements()["format"],
        Constraint::Regex("json|csv".into())
    );

    let matcher = Matcher::new();
    assert!(matcher.match_route(&route, "/reports/1.csv", "get").unwrap().is_some());
    assert!(matcher.match_route(&route, "/reports/1.xml", "get").unwrap().is_none());
    assert!(matcher.match_route(&route, "/reports/1", "get").unwrap().is_none());
}

#[test]
fn test_controller_context_completes_token() {
    let scope = Scope {
        current: Some(PathToken::new("posts", "index", vec!["blog".into()])),
        ..Scope::default()
    };
    let route = Route::scoped("posts/drafts", "#drafts", RouteOptions::verbs(["get"]), scope);
    let built = route.build().unwrap();
    let endpoint = built.endpoint().unwrap();
    assert_eq!(endpoint.controller(), "posts");
    assert_eq!(endpoint.action(), "drafts");
    assert_eq!(built.defaults()["action"], "drafts");
}

#[test]
fn test_token_without_context_fails() {
    let route = Route::new("posts/drafts", "#drafts", RouteOptions::verbs(["get"]));
    assert!(matches!(
        route.build(),
        Err(RoutingError::UnresolvedToken(_))
    ));
}

#[test]
fn test_build_is_stable_across_threads() {
    let route = std::sync::Arc::new(get("post/show/:id(/*tags)", RouteOptions::verbs(["get"])));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let route = route.clone();
            std::thread::spawn(move || route.build().unwrap().path_regex().as_str().to_string())
        })
        .collect();

    let regexes: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(regexes.windows(2).all(|w| w[0] == w[1]));
}
