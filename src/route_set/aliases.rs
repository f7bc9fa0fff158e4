//! Route alias registry.
//!
//! # Responsibilities
//! - Enforce alias uniqueness across every route set that shares it
//!
//! # Design Decisions
//! - Explicit object handed to route sets, not process-global state
//! - Check-and-insert is a single atomic `DashSet::insert`
//! - A batch registers all of its aliases or none of them
//! - Cloning shares the underlying set

use std::sync::Arc;

use dashmap::DashSet;

use crate::routing::types::{RoutingError, RoutingResult};

/// Thread-safe set of aliases already taken.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    inner: Arc<DashSet<String>>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `alias` is still free.
    pub fn validate(&self, alias: &str) -> bool {
        !self.inner.contains(alias)
    }

    /// Claim `alias`, failing if another route already holds it.
    pub fn register(&self, alias: &str) -> RoutingResult<()> {
        if self.inner.insert(alias.to_string()) {
            Ok(())
        } else {
            Err(RoutingError::DuplicateAlias(alias.to_string()))
        }
    }

    /// Claim every alias in `aliases`. On a conflict, aliases claimed by
    /// this call are released again and the registry is left as it was.
    pub fn register_all<'a>(
        &self,
        aliases: impl IntoIterator<Item = &'a str>,
    ) -> RoutingResult<()> {
        let mut claimed: Vec<&str> = Vec::new();
        for alias in aliases {
            if let Err(e) = self.register(alias) {
                for alias in claimed {
                    self.unregister(alias);
                }
                return Err(e);
            }
            claimed.push(alias);
        }
        Ok(())
    }

    /// Release `alias`. Returns whether it was held.
    pub fn unregister(&self, alias: &str) -> bool {
        self.inner.remove(alias).is_some()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.inner.contains(alias)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
