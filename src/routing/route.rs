//! Route definition and compilation.
//!
//! # Responsibilities
//! - Hold a raw route definition (path, target, options, scope)
//! - Build it once into a normalized path, variables and an anchored regex
//! - Expose the built state to the matcher, the generator and snapshots
//!
//! # Build Steps
//! ```text
//! normalize_options       verbs, alias, endpoint, constraint map
//! normalize_path          leading '/', scope prefix, format suffix
//! normalize_defaults      scope → defaults → free-form → endpoint → literals → format
//! extract_vars            pattern tree walk, left to right
//! normalize_requirements  constraints not embedded as mandatory segments
//! generate_path_regex     one capture group per variable, \A...\z
//! ```
//!
//! # Design Decisions
//! - `build` is idempotent: the result lives in a `OnceLock`
//! - Routes have no mutators, so a built route never goes stale

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::routing::options::{
    is_regexp, Constraint, FormatPolicy, RouteOptions, RouteTarget, Scope, URL_OPTIONS,
};
use crate::routing::pattern::{Pattern, Segment, VarKind};
use crate::routing::token::PathToken;
use crate::routing::types::{RoutingError, RoutingResult};

const FORMAT: &str = "format";
const CONTROLLER: &str = "controller";
const ACTION: &str = "action";
const LAZY_ANY: &str = "/.+?/";
const FORMAT_FRAGMENT: &str = "[a-zA-Z0-9]{1,5}";
const WILDCARD_FRAGMENT: &str = ".*?";
const SEGMENT_FRAGMENT: &str = "[^/.]+?";

/// A variable of a built route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub kind: VarKind,
    pub constraint: Option<Constraint>,
    pub default: Option<String>,
    /// Declared inside a parenthesized group.
    pub optional: bool,
    /// Capture group index in the route regex.
    pub group: usize,
}

/// Everything `Route::build` computes.
#[derive(Debug, Clone)]
pub struct BuiltRoute {
    pub(crate) path: String,
    pub(crate) pattern: Pattern,
    pub(crate) verbs: Vec<String>,
    pub(crate) alias: Option<String>,
    pub(crate) endpoint: Option<PathToken>,
    pub(crate) constraints: BTreeMap<String, Constraint>,
    pub(crate) defaults: BTreeMap<String, String>,
    pub(crate) requirements: BTreeMap<String, Constraint>,
    pub(crate) vars: Vec<Variable>,
    pub(crate) regex: Regex,
    /// Anchored re-check regex per variable, parallel to `vars`.
    pub(crate) checks: Vec<Option<Regex>>,
}

impl BuiltRoute {
    /// Normalized path pattern, e.g. `/post/show/:id(.:format)`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Lower-cased HTTP verbs.
    pub fn verbs(&self) -> &[String] {
        &self.verbs
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Resolved `controller#action`, absent for handler targets.
    pub fn endpoint(&self) -> Option<&PathToken> {
        self.endpoint.as_ref()
    }

    pub fn constraints(&self) -> &BTreeMap<String, Constraint> {
        &self.constraints
    }

    pub fn defaults(&self) -> &BTreeMap<String, String> {
        &self.defaults
    }

    /// Constraints checked outside the regex (optional variables, format).
    pub fn requirements(&self) -> &BTreeMap<String, Constraint> {
        &self.requirements
    }

    /// Variables in pattern order.
    pub fn vars(&self) -> &[Variable] {
        &self.vars
    }

    pub fn var(&self, name: &str) -> Option<&Variable> {
        self.vars.iter().find(|v| v.name == name)
    }

    pub fn path_regex(&self) -> &Regex {
        &self.regex
    }

    pub fn accepts_verb(&self, verb: &str) -> bool {
        let verb = verb.to_ascii_lowercase();
        self.verbs.iter().any(|v| *v == verb)
    }

    /// Assemble built state from parts, compiling the per-variable checks.
    pub(crate) fn assemble(parts: BuiltParts) -> RoutingResult<Self> {
        let checks = parts
            .vars
            .iter()
            .map(|var| {
                var.constraint
                    .as_ref()
                    .map(|c| compile_constraint(&var.name, c))
                    .transpose()
            })
            .collect::<RoutingResult<Vec<_>>>()?;

        Ok(Self {
            path: parts.path,
            pattern: parts.pattern,
            verbs: parts.verbs,
            alias: parts.alias,
            endpoint: parts.endpoint,
            constraints: parts.constraints,
            defaults: parts.defaults,
            requirements: parts.requirements,
            vars: parts.vars,
            regex: parts.regex,
            checks,
        })
    }
}

/// Built state without the derived per-variable checks.
pub(crate) struct BuiltParts {
    pub path: String,
    pub pattern: Pattern,
    pub verbs: Vec<String>,
    pub alias: Option<String>,
    pub endpoint: Option<PathToken>,
    pub constraints: BTreeMap<String, Constraint>,
    pub defaults: BTreeMap<String, String>,
    pub requirements: BTreeMap<String, Constraint>,
    pub vars: Vec<Variable>,
    pub regex: Regex,
}

/// A route definition, compiled lazily by [`Route::build`].
#[derive(Debug)]
pub struct Route {
    path: String,
    to: RouteTarget,
    options: RouteOptions,
    scope: Scope,
    built: OnceLock<BuiltRoute>,
}

impl Route {
    /// Store a definition. Nothing is validated until `build`.
    pub fn new(path: impl Into<String>, to: impl Into<RouteTarget>, options: RouteOptions) -> Self {
        Self::scoped(path, to, options, Scope::default())
    }

    /// Store a definition nested in `scope`.
    pub fn scoped(
        path: impl Into<String>,
        to: impl Into<RouteTarget>,
        options: RouteOptions,
        scope: Scope,
    ) -> Self {
        Self {
            path: path.into(),
            to: to.into(),
            options,
            scope,
            built: OnceLock::new(),
        }
    }

    /// Route that is already built, e.g. rehydrated from a snapshot.
    pub(crate) fn prebuilt(
        path: String,
        to: RouteTarget,
        options: RouteOptions,
        scope: Scope,
        built: BuiltRoute,
    ) -> Self {
        Self {
            path,
            to,
            options,
            scope,
            built: OnceLock::from(built),
        }
    }

    /// Raw path as defined.
    pub fn raw_path(&self) -> &str {
        &self.path
    }

    /// Normalized path once built, raw path before.
    pub fn path(&self) -> &str {
        self.built.get().map_or(self.path.as_str(), |b| b.path.as_str())
    }

    pub fn to(&self) -> &RouteTarget {
        &self.to
    }

    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn alias(&self) -> Option<&str> {
        self.options.alias.as_deref()
    }

    pub fn is_built(&self) -> bool {
        self.built.get().is_some()
    }

    /// Built state, if `build` already ran.
    pub fn built(&self) -> Option<&BuiltRoute> {
        self.built.get()
    }

    /// Compile the route. Later calls return the first result unchanged.
    pub fn build(&self) -> RoutingResult<&BuiltRoute> {
        if let Some(built) = self.built.get() {
            return Ok(built);
        }
        let built = Builder::new(self).run()?;
        tracing::debug!(
            path = %built.path,
            regex = %built.regex.as_str(),
            vars = built.vars.len(),
            "Route built"
        );
        // A concurrent build of the same definition yields the same state.
        Ok(self.built.get_or_init(|| built))
    }
}

impl Clone for Route {
    fn clone(&self) -> Self {
        let built = self
            .built
            .get()
            .map_or_else(OnceLock::new, |b| OnceLock::from(b.clone()));
        Self {
            path: self.path.clone(),
            to: self.to.clone(),
            options: self.options.clone(),
            scope: self.scope.clone(),
            built,
        }
    }
}

/// Working state of a single `build` run.
struct Builder<'a> {
    route: &'a Route,
    path: String,
    verbs: Vec<String>,
    endpoint: Option<PathToken>,
    constraints: BTreeMap<String, Constraint>,
    defaults: BTreeMap<String, String>,
}

impl<'a> Builder<'a> {
    fn new(route: &'a Route) -> Self {
        Self {
            route,
            path: route.path.clone(),
            verbs: Vec::new(),
            endpoint: None,
            constraints: BTreeMap::new(),
            defaults: BTreeMap::new(),
        }
    }

    fn options(&self) -> &'a RouteOptions {
        &self.route.options
    }

    fn scope(&self) -> &'a Scope {
        &self.route.scope
    }

    fn run(mut self) -> RoutingResult<BuiltRoute> {
        self.normalize_options()?;
        self.normalize_path()?;
        self.normalize_defaults();
        let pattern = Pattern::parse(&self.path)?;
        let mut vars = self.extract_vars(&pattern)?;
        let requirements = self.normalize_requirements(&vars);
        let regex = self.generate_path_regex(&pattern, &mut vars)?;

        BuiltRoute::assemble(BuiltParts {
            path: self.path,
            pattern,
            verbs: self.verbs,
            alias: self.route.options.alias.clone(),
            endpoint: self.endpoint,
            constraints: self.constraints,
            defaults: self.defaults,
            requirements,
            vars,
            regex,
        })
    }

    fn invalid(&self, reason: impl Into<String>) -> RoutingError {
        RoutingError::InvalidRouteOptions {
            path: self.route.path.clone(),
            reason: reason.into(),
        }
    }

    fn normalize_options(&mut self) -> RoutingResult<()> {
        let options = self.options();
        let scope = self.scope();

        if options.verbs.is_empty() {
            return Err(self.invalid("option 'verbs' must be present and non-empty"));
        }
        for verb in &options.verbs {
            let verb = verb.trim().to_ascii_lowercase();
            if verb.is_empty() {
                return Err(self.invalid("verbs can't be blank"));
            }
            if !self.verbs.contains(&verb) {
                self.verbs.push(verb);
            }
        }

        if let Some(alias) = &options.alias {
            let valid = !alias.is_empty()
                && alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(self.invalid(format!("alias '{}' must be of format \\w+", alias)));
            }
        }

        self.endpoint = match &self.route.to {
            RouteTarget::Token(token) => {
                let token = PathToken::parse(token, scope.current.as_ref())?;
                Some(token.nested_in(&scope.namespace))
            }
            RouteTarget::Handler(_) => None,
        };

        // Resolved constraint map, later entries win.
        let mut raw: BTreeMap<String, String> = scope.constraints.clone();
        for (key, value) in &options.extra {
            if is_regexp(value) {
                raw.insert(key.clone(), value.clone());
            }
        }
        raw.extend(options.constraints.clone());

        let path_without_format = self
            .route
            .path
            .strip_suffix("(.:format)")
            .unwrap_or(&self.route.path);

        if options.format.is_mandatory() {
            if let Some(name) = trailing_wildcard(path_without_format) {
                raw.entry(name).or_insert_with(|| LAZY_ANY.to_string());
            }
        }

        let declares_controller = Pattern::parse(path_without_format)?
            .variables()
            .iter()
            .any(|v| v.kind == VarKind::Segment && v.name == CONTROLLER);
        if declares_controller {
            if !scope.namespace.is_empty() {
                return Err(self.invalid(
                    ":controller segment is not allowed within a namespace block",
                ));
            }
            raw.entry(CONTROLLER.to_string())
                .or_insert_with(|| LAZY_ANY.to_string());
        }

        if let FormatPolicy::Constrained(format) = &options.format {
            raw.entry(FORMAT.to_string())
                .or_insert_with(|| format.clone());
        }

        for (name, value) in raw {
            let constraint = Constraint::parse(&value);
            verify_constraint(&name, &constraint)?;
            self.constraints.insert(name, constraint);
        }

        Ok(())
    }

    fn normalize_path(&mut self) -> RoutingResult<()> {
        if self.path.trim().is_empty() {
            return Err(RoutingError::EmptyPath);
        }

        let prefix = self.scope().path_prefix.trim_matches('/');
        let path = self.path.trim_matches('/');
        let joined = match (prefix.is_empty(), path.is_empty()) {
            (true, _) => path.to_string(),
            (false, true) => prefix.to_string(),
            (false, false) => format!("{}/{}", prefix, path),
        };
        self.path = format!("/{}", joined);

        let declares_format = self.path.contains(":format");
        match &self.options().format {
            format if format.is_mandatory() => {
                if !declares_format {
                    self.path.push_str(".:format");
                }
            }
            FormatPolicy::Optional => {
                if !declares_format && !self.path.ends_with('/') {
                    self.path.push_str("(.:format)");
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn normalize_defaults(&mut self) {
        let options = self.options();
        let mut defaults = self.scope().defaults.clone();
        defaults.extend(options.defaults.clone());

        for (key, value) in &options.extra {
            if !is_regexp(value) {
                defaults.insert(key.clone(), value.clone());
            }
        }

        if let Some(endpoint) = &self.endpoint {
            defaults.insert(CONTROLLER.to_string(), endpoint.controller().to_string());
            defaults.insert(ACTION.to_string(), endpoint.action().to_string());
        }

        for (key, value) in &options.constraints {
            if !URL_OPTIONS.contains(&key.as_str()) && !is_regexp(value) {
                defaults.insert(key.clone(), value.clone());
            }
        }

        if let FormatPolicy::Constrained(format) = &options.format {
            if is_regexp(format) {
                defaults.remove(FORMAT);
            } else {
                defaults.insert(FORMAT.to_string(), format.clone());
            }
        }

        self.defaults = defaults;
    }

    fn extract_vars(&self, pattern: &Pattern) -> RoutingResult<Vec<Variable>> {
        let mut vars: Vec<Variable> = Vec::new();
        for var in pattern.variables() {
            if vars.iter().any(|v| v.name == var.name) {
                return Err(RoutingError::MalformedPattern {
                    path: self.path.clone(),
                    reason: format!("variable '{}' appears more than once", var.name),
                });
            }
            vars.push(Variable {
                name: var.name.to_string(),
                kind: var.kind,
                constraint: self.constraints.get(var.name).cloned(),
                default: self.defaults.get(var.name).cloned(),
                optional: var.optional,
                group: 0,
            });
        }
        Ok(vars)
    }

    fn normalize_requirements(&self, vars: &[Variable]) -> BTreeMap<String, Constraint> {
        let mut requirements: BTreeMap<String, Constraint> = self
            .constraints
            .iter()
            .filter(|(name, _)| {
                name.as_str() != CONTROLLER
                    && !vars.iter().any(|v| !v.optional && v.name == **name)
            })
            .map(|(name, c)| (name.clone(), c.clone()))
            .collect();

        match &self.options().format {
            FormatPolicy::Required => {
                requirements
                    .entry(FORMAT.to_string())
                    .or_insert_with(|| Constraint::Regex(".+".to_string()));
            }
            FormatPolicy::Constrained(format) => {
                requirements.insert(FORMAT.to_string(), Constraint::parse(format));
            }
            _ => {}
        }

        requirements
    }

    fn generate_path_regex(&self, pattern: &Pattern, vars: &mut [Variable]) -> RoutingResult<Regex> {
        let mut source = String::from(r"\A");
        let mut groups = 0;
        write_segments(pattern.segments(), vars, &mut source, &mut groups)?;
        source.push_str(r"\z");

        Regex::new(&source).map_err(|e| RoutingError::MalformedPattern {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

fn write_segments(
    segments: &[Segment],
    vars: &mut [Variable],
    out: &mut String,
    groups: &mut usize,
) -> RoutingResult<()> {
    for segment in segments {
        match segment {
            Segment::Literal { text } => out.push_str(&regex::escape(text)),
            Segment::Optional { segments } => {
                out.push_str("(?:");
                write_segments(segments, vars, out, groups)?;
                out.push_str(")?");
            }
            Segment::Variable { kind, name } => {
                let Some(var) = vars.iter_mut().find(|v| v.name == *name && v.kind == *kind) else {
                    continue;
                };
                *groups += 1;
                var.group = *groups;

                let fragment = match &var.constraint {
                    Some(constraint) => {
                        // Groups inside a constraint shift every later capture.
                        *groups += inner_groups(&var.name, constraint)?;
                        constraint.fragment()
                    }
                    None if var.name == FORMAT => FORMAT_FRAGMENT.to_string(),
                    None if var.kind == VarKind::Wildcard => WILDCARD_FRAGMENT.to_string(),
                    None => SEGMENT_FRAGMENT.to_string(),
                };
                out.push('(');
                out.push_str(&fragment);
                out.push(')');
            }
        }
    }
    Ok(())
}

fn inner_groups(name: &str, constraint: &Constraint) -> RoutingResult<usize> {
    match constraint {
        Constraint::Literal(_) => Ok(0),
        Constraint::Regex(body) => Regex::new(body)
            .map(|re| re.captures_len() - 1)
            .map_err(|e| RoutingError::InvalidConstraint {
                name: name.to_string(),
                reason: e.to_string(),
            }),
    }
}

fn compile_constraint(name: &str, constraint: &Constraint) -> RoutingResult<Regex> {
    constraint.compile().map_err(|e| RoutingError::InvalidConstraint {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn verify_constraint(name: &str, constraint: &Constraint) -> RoutingResult<()> {
    if constraint.has_anchors() {
        return Err(RoutingError::InvalidConstraint {
            name: name.to_string(),
            reason: format!(
                "regexp anchor characters are not allowed in routing requirements: {}",
                constraint.raw()
            ),
        });
    }
    compile_constraint(name, constraint).map(|_| ())
}

/// Name of a `*name` wildcard closing the path, e.g. `/files/*path` or `(/*rest)`.
fn trailing_wildcard(path: &str) -> Option<String> {
    let path = path.trim_end_matches(')');
    let star = path.rfind('*')?;
    let name = &path[star + 1..];
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(path: &str) -> Route {
        Route::new(path, "posts#index", RouteOptions::verbs(["get"]))
    }

    #[test]
    fn test_normalized_path() {
        let route = get("post/show/:id/");
        let built = route.build().unwrap();
        assert_eq!(built.path(), "/post/show/:id(.:format)");

        let root = get("/");
        assert_eq!(root.build().unwrap().path(), "/");

        let dir = Route::new(
            "docs/",
            "docs#index",
            RouteOptions::verbs(["get"]).format(FormatPolicy::Disabled),
        );
        assert_eq!(dir.build().unwrap().path(), "/docs");
    }

    #[test]
    fn test_format_policies() {
        let required = Route::new(
            "/reports/:id",
            "reports#show",
            RouteOptions::verbs(["get"]).format(FormatPolicy::Required),
        );
        let built = required.build().unwrap();
        assert_eq!(built.path(), "/reports/:id.:format");
        assert_eq!(built.requirements()["format"], Constraint::Regex(".+".into()));

        let literal = Route::new(
            "/reports/:id",
            "reports#show",
            RouteOptions::verbs(["get"]).format(FormatPolicy::Constrained("json".into())),
        );
        let built = literal.build().unwrap();
        assert_eq!(built.defaults()["format"], "json");
        assert_eq!(built.var("format").unwrap().constraint, Some(Constraint::Literal("json".into())));

        let declared = get("/feed.:format");
        assert_eq!(declared.build().unwrap().path(), "/feed.:format");
    }

    #[test]
    fn test_build_is_idempotent() {
        let route = get("/post/show/:id(/*tags)");
        let first = route.build().unwrap().path_regex().as_str().to_string();
        let vars = route.build().unwrap().vars().to_vec();
        let second = route.build().unwrap();
        assert_eq!(first, second.path_regex().as_str());
        assert_eq!(vars, second.vars());
        assert!(route.is_built());
    }

    #[test]
    fn test_regex_shape() {
        let route = get("post/show/:id(/*tags)");
        let built = route.build().unwrap();
        assert_eq!(
            built.path_regex().as_str(),
            r"\A/post/show/([^/.]+?)(?:/(.*?))?(?:\.([a-zA-Z0-9]{1,5}))?\z"
        );
    }

    #[test]
    fn test_vars_follow_pattern_order() {
        let route = get("/a(/:b(/*c))/:d");
        let built = route.build().unwrap();
        let names: Vec<_> = built.vars().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["b", "c", "d", "format"]);
        let groups: Vec<_> = built.vars().iter().map(|v| v.group).collect();
        assert_eq!(groups, [1, 2, 3, 4]);
        assert!(built.var("b").unwrap().optional);
        assert!(!built.var("d").unwrap().optional);
    }

    #[test]
    fn test_constraint_groups_shift_captures() {
        let route = Route::new(
            "/shows/:kind/:id",
            "shows#show",
            RouteOptions::verbs(["get"]).constraint("kind", "/(movie|series)/"),
        );
        let built = route.build().unwrap();
        assert_eq!(built.var("kind").unwrap().group, 1);
        assert_eq!(built.var("id").unwrap().group, 3);
    }

    #[test]
    fn test_defaults_merge_order() {
        let scope = Scope {
            defaults: BTreeMap::from([("locale".to_string(), "en".to_string())]),
            ..Scope::default()
        };
        let options = RouteOptions::verbs(["get"])
            .default_value("page", "1")
            .extra("locale", "es")
            .extra("id", r"/\d+/")
            .constraint("host", "example.com")
            .constraint("region", "eu");
        let route = Route::scoped("/posts(/:page)", "posts#index", options, scope);
        let built = route.build().unwrap();

        assert_eq!(built.defaults()["locale"], "es");
        assert_eq!(built.defaults()["page"], "1");
        assert_eq!(built.defaults()["controller"], "posts");
        assert_eq!(built.defaults()["action"], "index");
        assert_eq!(built.defaults()["region"], "eu");
        assert!(!built.defaults().contains_key("host"));
        assert!(!built.defaults().contains_key("id"));
        assert_eq!(built.constraints()["id"], Constraint::Regex(r"\d+".into()));
        assert_eq!(built.var("page").unwrap().default.as_deref(), Some("1"));
    }

    #[test]
    fn test_requirements_skip_mandatory_segments() {
        let options = RouteOptions::verbs(["get"])
            .constraint("id", r"/\d+/")
            .constraint("page", r"/\d+/");
        let route = Route::new("/posts/:id(/:page)", "posts#show", options);
        let built = route.build().unwrap();
        assert!(!built.requirements().contains_key("id"));
        assert!(built.requirements().contains_key("page"));
    }

    #[test]
    fn test_empty_path_rejected() {
        let route = get("   ");
        assert!(matches!(route.build(), Err(RoutingError::EmptyPath)));
        assert!(!route.is_built());
    }

    #[test]
    fn test_missing_verbs_rejected() {
        let route = Route::new("/posts", "posts#index", RouteOptions::default());
        assert!(matches!(
            route.build(),
            Err(RoutingError::InvalidRouteOptions { .. })
        ));
    }

    #[test]
    fn test_invalid_alias_rejected() {
        let route = Route::new(
            "/posts",
            "posts#index",
            RouteOptions::verbs(["get"]).alias("all-posts"),
        );
        assert!(matches!(
            route.build(),
            Err(RoutingError::InvalidRouteOptions { .. })
        ));
    }

    #[test]
    fn test_anchored_constraints_rejected() {
        for raw in [r"/^\d+/", r"/\d+$/", r"/\A\d+/", r"/\d+\z/", r"/\d+\Z/"] {
            let route = Route::new(
                "/posts(/:page)",
                "posts#index",
                RouteOptions::verbs(["get"]).constraint("page", raw),
            );
            assert!(
                matches!(route.build(), Err(RoutingError::InvalidConstraint { .. })),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_controller_segment() {
        let route = Route::new(
            "/:controller(/:action)",
            "pages#index",
            RouteOptions::verbs(["get"]),
        );
        let built = route.build().unwrap();
        assert_eq!(built.constraints()["controller"], Constraint::Regex(".+?".into()));
        assert!(!built.requirements().contains_key("controller"));

        let scope = Scope {
            namespace: vec!["admin".into()],
            ..Scope::default()
        };
        let nested = Route::scoped(
            "/:controller",
            "pages#index",
            RouteOptions::verbs(["get"]),
            scope,
        );
        assert!(matches!(
            nested.build(),
            Err(RoutingError::InvalidRouteOptions { .. })
        ));
    }

    #[test]
    fn test_controller_prefixed_variable_is_ordinary() {
        let scope = Scope {
            namespace: vec!["admin".into()],
            ..Scope::default()
        };
        let route = Route::scoped(
            "/reports/:controller_id",
            "reports#show",
            RouteOptions::verbs(["get"]),
            scope,
        );
        let built = route.build().unwrap();
        assert!(!built.constraints().contains_key("controller"));
        assert_eq!(built.var("controller_id").unwrap().constraint, None);

        let plain = get("/owners/:controllers");
        assert!(!plain.build().unwrap().constraints().contains_key("controller"));
    }

    #[test]
    fn test_trailing_wildcard_gets_implicit_constraint() {
        let route = Route::new(
            "/files/*path",
            "files#show",
            RouteOptions::verbs(["get"]).format(FormatPolicy::Required),
        );
        let built = route.build().unwrap();
        assert_eq!(built.var("path").unwrap().constraint, Some(Constraint::Regex(".+?".into())));

        assert_eq!(trailing_wildcard("/x(/*rest)"), Some("rest".into()));
        assert_eq!(trailing_wildcard("/x/:id"), None);
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let route = get("/posts/:id/comments/:id");
        assert!(matches!(
            route.build(),
            Err(RoutingError::MalformedPattern { .. })
        ));
    }

    #[test]
    fn test_scope_namespace_and_prefix() {
        let scope = Scope {
            namespace: vec!["admin".into()],
            path_prefix: "/admin/".into(),
            ..Scope::default()
        };
        let route = Route::scoped("users/:id", "users#edit", RouteOptions::verbs(["GET"]), scope);
        let built = route.build().unwrap();
        assert_eq!(built.path(), "/admin/users/:id(.:format)");
        assert_eq!(built.verbs(), ["get"]);
        assert_eq!(built.endpoint().unwrap().to_string(), "admin\\users#edit");
    }

    #[test]
    fn test_handler_target_has_no_endpoint() {
        let route = Route::new(
            "/health",
            RouteTarget::Handler("health_check".into()),
            RouteOptions::verbs(["get"]),
        );
        let built = route.build().unwrap();
        assert!(built.endpoint().is_none());
        assert!(!built.defaults().contains_key("controller"));
    }
}
