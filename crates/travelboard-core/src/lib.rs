//! travelboard-core: domain types, error taxonomy, and configuration for the
//! travel board browsing session.
//!
//! This crate holds the model shared by the session controllers and the CLI:
//! photos as returned by the search provider, normalized weather reports, the
//! error categories every external call is folded into, and the layered
//! configuration (defaults, YAML file, environment overrides).

pub mod config;
pub mod error;
pub mod models;

/// Crate identity label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "travelboard-core"
}
