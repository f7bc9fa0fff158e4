//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → snapshot present? → draw_cached
//!                                 else → draw_config → save snapshot
//!
//! Reload (reload.rs):
//!     Watcher update → draw fresh set → atomic swap
//!
//! Signals (signals.rs):
//!     SIGINT → stop watching
//! ```
//!
//! # Design Decisions
//! - Fail fast: a bad route file is fatal at startup
//! - A bad route file on reload keeps the current routes

pub mod reload;
pub mod signals;
pub mod startup;

pub use reload::SharedRoutes;
pub use startup::{boot, draw_fresh};
