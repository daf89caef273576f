//! Mock providers and navigator for unit testing.
//!
//! Each mock records every call and returns pre-configured responses.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use travelboard_core::error::ProviderError;
use travelboard_core::models::{Photo, SearchPage, WeatherObservation};

use crate::navigation::{NavigationState, Navigator};
use crate::service::{SearchProvider, WeatherProvider};
use crate::storage::lock;

/// A recorded call to `MockSearchProvider`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
}

/// Mock implementation of `SearchProvider`.
///
/// Unscripted `(query, page)` pairs answer with an empty page and an unknown
/// total.
#[derive(Default)]
pub struct MockSearchProvider {
    pages: Mutex<HashMap<(String, u32), SearchPage>>,
    errors: Mutex<HashMap<(String, u32), ProviderError>>,
    calls: Mutex<Vec<SearchCall>>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script page `page` of `query` to return photos with `ids`.
    pub fn with_page(self, query: &str, page: u32, ids: &[&str], total_pages: Option<u32>) -> Self {
        lock(&self.pages).insert((query.to_string(), page), test_page(ids, total_pages));
        self
    }

    /// Script page `page` of `query` to fail with `err`.
    pub fn with_error(self, query: &str, page: u32, err: ProviderError) -> Self {
        lock(&self.errors).insert((query.to_string(), page), err);
        self
    }

    /// Return all recorded calls.
    pub fn calls(&self) -> Vec<SearchCall> {
        lock(&self.calls).clone()
    }

    /// Return the number of recorded calls.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage, ProviderError> {
        lock(&self.calls).push(SearchCall {
            query: query.to_string(),
            page,
            page_size,
        });

        let key = (query.to_string(), page);
        if let Some(err) = lock(&self.errors).get(&key) {
            return Err(err.clone());
        }
        Ok(lock(&self.pages).get(&key).cloned().unwrap_or_default())
    }
}

/// Mock implementation of `WeatherProvider`.
///
/// Unknown cities fail with `ProviderError::NotFound`.
#[derive(Default)]
pub struct MockWeatherProvider {
    observations: Mutex<HashMap<String, WeatherObservation>>,
    errors: Mutex<HashMap<String, ProviderError>>,
    calls: Mutex<Vec<String>>,
}

impl MockWeatherProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(self, city: &str, temperature_celsius: f64, description: &str) -> Self {
        lock(&self.observations).insert(
            city.to_string(),
            WeatherObservation {
                name: city.to_string(),
                temperature_celsius,
                description: description.to_string(),
                icon_id: Some("01d".to_string()),
            },
        );
        self
    }

    pub fn with_error(self, city: &str, err: ProviderError) -> Self {
        lock(&self.errors).insert(city.to_string(), err);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn lookup(&self, city: &str) -> Result<WeatherObservation, ProviderError> {
        lock(&self.calls).push(city.to_string());

        if let Some(err) = lock(&self.errors).get(city) {
            return Err(err.clone());
        }
        lock(&self.observations)
            .get(city)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound {
                what: city.to_string(),
            })
    }
}

/// Navigator that records every write and reports the last one as current.
pub struct RecordingNavigator {
    current: Mutex<NavigationState>,
    writes: Mutex<Vec<NavigationState>>,
}

impl RecordingNavigator {
    pub fn new(initial: NavigationState) -> Self {
        Self {
            current: Mutex::new(initial),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn writes(&self) -> Vec<NavigationState> {
        lock(&self.writes).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current(&self) -> NavigationState {
        lock(&self.current).clone()
    }

    fn replace(&self, state: &NavigationState) {
        *lock(&self.current) = state.clone();
        lock(&self.writes).push(state.clone());
    }
}

/// Helper to create a test photo with sensible defaults.
pub fn test_photo(id: &str) -> Photo {
    Photo {
        id: id.to_string(),
        src: format!("https://images.example/{id}/regular.jpg"),
        thumb: Some(format!("https://images.example/{id}/small.jpg")),
        alt: format!("photo {id}"),
        author: Some("Test Author".to_string()),
        author_link: Some("https://images.example/@test".to_string()),
        location: None,
    }
}

/// Helper to create a page of test photos.
pub fn test_page(ids: &[&str], total_pages: Option<u32>) -> SearchPage {
    SearchPage {
        results: ids.iter().map(|id| test_photo(id)).collect(),
        total: None,
        total_pages,
    }
}
