//! travelboard-session: browsing session controllers for the travel board.
//!
//! Provides transport-agnostic provider traits and the state that sits on
//! top of them:
//! - `SearchSession` / `SearchController`: query, pagination, and accumulated
//!   results kept consistent with navigation (URL) state
//! - `ResultSet`: id-unique accumulation of result pages
//! - `FavoritesStore`: durable favorites over a `KeyValueStore`
//! - `WeatherPanel` / `WeatherController`: per-city weather lookup with a
//!   degraded fallback
//!
//! Controllers emit a `SessionEvent` at each decision point through the
//! `SessionEventSink` trait.

pub mod controller;
pub mod dedup;
pub mod event;
pub mod favorites;
pub mod mock;
pub mod navigation;
pub mod service;
pub mod session;
pub mod storage;
pub mod weather;

/// Stable crate label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "travelboard-session"
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "travelboard-session");
    }
}
