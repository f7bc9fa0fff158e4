//! Rails-style route compiler and matcher.
//!
//! # Architecture Overview
//!
//! ```text
//!   routes.toml ──▶ config ──▶ lifecycle::boot ──▶ RouteSet ◀── snapshot (JSON)
//!                                                    │
//!        (path, verb) ──────────────────────────────▶│ recognize
//!                                                    ▼
//!                                RouteMatch { route, params } ──▶ Endpoint
//! ```
//!
//! - `routing`: compile one route into an anchored regex, match, generate
//! - `route_set`: ordered routes, alias registry, definition DSL, snapshots
//! - `config`, `lifecycle`, `observability`: route files, boot and reload, logs and metrics

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod route_set;
pub mod routing;

pub use config::schema::RouterConfig;
pub use route_set::{AliasRegistry, Endpoint, Mapper, RouteMatch, RouteSet};
pub use routing::{Matcher, Params, Route, RouteOptions, RoutingError, RoutingResult};
