//! Provider traits: the external services the session consumes.
//!
//! Implementations can proxy a real photo/weather API or be mocked for
//! testing. Both are async; the session never blocks while a request is in
//! flight.

use async_trait::async_trait;
use travelboard_core::error::ProviderError;
use travelboard_core::models::{SearchPage, WeatherObservation};

/// Photo search provider.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Fetch page `page` (1-based) of `query`, `page_size` photos per page.
    /// Relevance order is whatever the provider returns.
    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage, ProviderError>;
}

/// Current-weather provider.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Look up current weather for exactly `city`.
    async fn lookup(&self, city: &str) -> Result<WeatherObservation, ProviderError>;
}
