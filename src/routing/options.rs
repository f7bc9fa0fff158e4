//! Route definition options.
//!
//! # Responsibilities
//! - Describe what a route definition carries before it is built
//! - Model the format policy and per-variable constraints
//! - Carry inherited scope (namespace, path prefix, defaults, constraints)
//!
//! # Design Decisions
//! - Options are plain data; validation happens in `Route::build`
//! - A value written as `/.../` is a regex, anything else a literal
//! - Free-form scalar keys become constraints (regex) or defaults (literal)

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::routing::token::PathToken;

/// Keys that describe URL reconstruction rather than path variables.
pub const URL_OPTIONS: [&str; 5] = ["protocol", "subdomain", "domain", "host", "port"];

/// What a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    /// `ns\controller#action` token.
    Token(String),
    /// Opaque handler name, resolved by the host application.
    Handler(String),
}

impl From<&str> for RouteTarget {
    fn from(token: &str) -> Self {
        RouteTarget::Token(token.to_string())
    }
}

impl From<String> for RouteTarget {
    fn from(token: String) -> Self {
        RouteTarget::Token(token)
    }
}

/// Per-variable validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Constraint {
    /// Regex body, delimiters stripped.
    Regex(String),
    /// Exact value.
    Literal(String),
}

impl Constraint {
    /// Interpret a raw option value: `/body/` is a regex, anything else a literal.
    pub fn parse(raw: &str) -> Self {
        if is_regexp(raw) {
            let body = &raw[1..];
            let body = body.strip_suffix('/').unwrap_or(body);
            Constraint::Regex(body.to_string())
        } else {
            Constraint::Literal(raw.to_string())
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Constraint::Regex(_))
    }

    /// Regex fragment matching exactly what this constraint accepts.
    pub fn fragment(&self) -> String {
        match self {
            Constraint::Regex(body) => body.clone(),
            Constraint::Literal(value) => regex::escape(value),
        }
    }

    /// Anchored regex used to re-check captured or generated values.
    pub fn compile(&self) -> Result<Regex, regex::Error> {
        Regex::new(&format!(r"\A(?:{})\z", self.fragment()))
    }

    /// Raw option form, as written in route definitions.
    pub fn raw(&self) -> String {
        match self {
            Constraint::Regex(body) => format!("/{}/", body),
            Constraint::Literal(value) => value.clone(),
        }
    }

    /// Leading `^`/`\A` or trailing `$`/`\Z`/`\z` in a regex body.
    pub fn has_anchors(&self) -> bool {
        let Constraint::Regex(body) = self else {
            return false;
        };
        if body.starts_with('^') || body.starts_with(r"\A") {
            return true;
        }
        let Some(last) = body.chars().last() else {
            return false;
        };
        // An odd run of backslashes escapes the final character.
        let escaped = trailing_backslashes(&body[..body.len() - last.len_utf8()]) % 2 == 1;
        match last {
            '$' => !escaped,
            'z' | 'Z' => escaped,
            _ => false,
        }
    }
}

fn trailing_backslashes(s: &str) -> usize {
    s.chars().rev().take_while(|c| *c == '\\').count()
}

/// `/`-delimited option values are regexes.
pub fn is_regexp(value: &str) -> bool {
    value.starts_with('/')
}

/// How a trailing `.format` suffix is treated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<FormatValue>", into = "Option<FormatValue>")]
pub enum FormatPolicy {
    /// `(.:format)` appended unless the path declares one or ends in `/`.
    #[default]
    Optional,
    /// `.:format` appended and required.
    Required,
    /// Required, restricted by a regex (`/.../`) or a literal value.
    Constrained(String),
    /// No format segment.
    Disabled,
}

impl FormatPolicy {
    /// Whether the path must end with a format suffix.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, FormatPolicy::Required | FormatPolicy::Constrained(_))
    }
}

/// Wire form of [`FormatPolicy`]: missing/null, a flag, or a constraint string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatValue {
    Flag(bool),
    Value(String),
}

impl From<Option<FormatValue>> for FormatPolicy {
    fn from(value: Option<FormatValue>) -> Self {
        match value {
            None => FormatPolicy::Optional,
            Some(FormatValue::Flag(true)) => FormatPolicy::Required,
            Some(FormatValue::Flag(false)) => FormatPolicy::Disabled,
            Some(FormatValue::Value(s)) => FormatPolicy::Constrained(s),
        }
    }
}

impl From<FormatPolicy> for Option<FormatValue> {
    fn from(policy: FormatPolicy) -> Self {
        match policy {
            FormatPolicy::Optional => None,
            FormatPolicy::Required => Some(FormatValue::Flag(true)),
            FormatPolicy::Disabled => Some(FormatValue::Flag(false)),
            FormatPolicy::Constrained(s) => Some(FormatValue::Value(s)),
        }
    }
}

/// Options given to a single route definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    /// HTTP verbs, required and non-empty.
    pub verbs: Vec<String>,

    /// Unique name for reverse lookup (`\w+`).
    pub alias: Option<String>,

    /// Format suffix policy.
    pub format: FormatPolicy,

    /// Variable constraints; `/.../` values are regexes.
    pub constraints: BTreeMap<String, String>,

    /// Defaults for variables absent from the path.
    pub defaults: BTreeMap<String, String>,

    /// Free-form scalar keys: regex values act as constraints, others as defaults.
    pub extra: BTreeMap<String, String>,
}

impl RouteOptions {
    /// Options for the given verbs.
    pub fn verbs<I, S>(verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            verbs: verbs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn format(mut self, format: FormatPolicy) -> Self {
        self.format = format;
        self
    }

    pub fn constraint(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.constraints.insert(name.into(), value.into());
        self
    }

    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Settings inherited from enclosing definition blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scope {
    /// Controller namespaces, outermost first.
    pub namespace: Vec<String>,

    /// Path prepended to nested route paths.
    pub path_prefix: String,

    /// Inherited defaults.
    pub defaults: BTreeMap<String, String>,

    /// Inherited constraints.
    pub constraints: BTreeMap<String, String>,

    /// Current route token, used to complete `#action` tokens.
    pub current: Option<PathToken>,
}
