//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at draw time):
//!     path + to + RouteOptions + Scope
//!     → token.rs (resolve "ns\controller#action" endpoint)
//!     → pattern.rs (parse literal / :var / *var / (group) tree)
//!     → route.rs (resolve constraints, defaults, requirements)
//!     → Compile one anchored regex, one capture group per variable
//!     → Freeze as built Route
//!
//! Incoming Request (path, verb):
//!     → matcher.rs (verb check, regex, constraint re-check, defaults)
//!     → Return: parameter map or no-match
//!
//! Reverse lookup:
//!     built Route + params → generator.rs → path
//! ```
//!
//! # Design Decisions
//! - Routes compiled once, immutable afterwards
//! - Configuration errors surface at build time, never at match time
//! - No-match is a value (`Ok(None)`), not an error
//! - Variable order is pattern order, regardless of group nesting

pub mod generator;
pub mod matcher;
pub mod options;
pub mod pattern;
pub mod route;
pub mod token;
pub mod types;

pub use matcher::{normalize_path, Matcher};
pub use options::{Constraint, FormatPolicy, RouteOptions, RouteTarget, Scope};
pub use pattern::{Pattern, Segment, VarKind};
pub use route::{BuiltRoute, Route, Variable};
pub use token::PathToken;
pub use types::{Params, RoutingError, RoutingResult};
