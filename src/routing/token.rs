//! Endpoint tokens of the form `ns1\ns2\controller#action`.
//!
//! # Design Decisions
//! - `#` must appear exactly once
//! - Action defaults to `index`
//! - A token like `#create` borrows controller and namespaces from the
//!   current route's token

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::routing::types::{RoutingError, RoutingResult};

/// Separates controller from action.
pub const SEPARATOR: char = '#';

/// Separates namespaces from each other and from the controller.
pub const NAMESPACE_SEPARATOR: char = '\\';

const DEFAULT_ACTION: &str = "index";

/// Parsed `controller#action` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathToken {
    controller: String,
    action: String,
    namespaces: Vec<String>,
}

impl PathToken {
    /// Build a token from its parts.
    pub fn new(
        controller: impl Into<String>,
        action: impl Into<String>,
        namespaces: Vec<String>,
    ) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            namespaces,
        }
    }

    /// Parse a token, completing an empty controller half from `current`.
    pub fn parse(token: &str, current: Option<&PathToken>) -> RoutingResult<Self> {
        let mut namespaces = Vec::new();
        let mut rest = token;

        // Namespaces can only precede the controller, so look before '#'.
        let head = token.find(SEPARATOR).map_or(token, |pos| &token[..pos]);
        if let Some(pos) = head.rfind(NAMESPACE_SEPARATOR) {
            namespaces = token[..pos]
                .split(NAMESPACE_SEPARATOR)
                .filter(|ns| !ns.is_empty())
                .map(str::to_string)
                .collect();
            rest = &token[pos + 1..];
        }

        if rest.matches(SEPARATOR).count() != 1 {
            return Err(RoutingError::MalformedToken(token.to_string()));
        }

        let (controller, action) = rest
            .split_once(SEPARATOR)
            .ok_or_else(|| RoutingError::MalformedToken(token.to_string()))?;

        let controller = if controller.is_empty() {
            let current =
                current.ok_or_else(|| RoutingError::UnresolvedToken(token.to_string()))?;
            namespaces = current.namespaces.clone();
            current.controller.clone()
        } else {
            controller.to_string()
        };

        let action = if action.is_empty() {
            DEFAULT_ACTION.to_string()
        } else {
            action.to_string()
        };

        Ok(Self {
            controller,
            action,
            namespaces,
        })
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Copy of this token with `outer` namespaces placed before its own.
    pub fn nested_in(&self, outer: &[String]) -> Self {
        let mut namespaces = outer.to_vec();
        namespaces.extend(self.namespaces.iter().cloned());
        Self {
            controller: self.controller.clone(),
            action: self.action.clone(),
            namespaces,
        }
    }

    /// Slash-separated form, used to derive view template paths.
    pub fn to_path(&self) -> String {
        self.to_string()
            .replace([SEPARATOR, NAMESPACE_SEPARATOR], "/")
    }
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ns in &self.namespaces {
            write!(f, "{}{}", ns, NAMESPACE_SEPARATOR)?;
        }
        write!(f, "{}{}{}", self.controller, SEPARATOR, self.action)
    }
}

impl FromStr for PathToken {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}
