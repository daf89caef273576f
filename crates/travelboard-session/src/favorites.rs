//! Durable favorites, keyed by photo id.
//!
//! The store is loaded once from key-value storage and writes a full snapshot
//! back after every mutation. Storage failures are logged and swallowed: a
//! favorite that could not be persisted stays valid in memory for the rest of
//! the session. Several stores sharing one storage are not serialized against
//! each other; the last snapshot written wins.
//!
//! The persisted form is a JSON object `{ "<id>": Photo, ... }` in insertion
//! order.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use travelboard_core::error::PersistenceError;
use travelboard_core::models::Photo;

use crate::event::{discarding_sink, SessionEvent, SessionEventKind, SessionEventSink};
use crate::storage::KeyValueStore;

pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    entries: IndexMap<String, Photo>,
    events: Arc<dyn SessionEventSink>,
}

impl FavoritesStore {
    /// Load favorites stored under `key`. Absent, unreadable, or malformed
    /// data yields an empty set.
    pub fn load(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self::load_with_events(storage, key, discarding_sink())
    }

    pub fn load_with_events(
        storage: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        events: Arc<dyn SessionEventSink>,
    ) -> Self {
        let mut store = Self {
            storage,
            key: key.into(),
            entries: IndexMap::new(),
            events,
        };

        match store.storage.get(&store.key) {
            Ok(Some(raw)) => match decode_favorites(&raw) {
                Some(photos) => {
                    for photo in photos {
                        store.entries.insert(photo.id.clone(), photo);
                    }
                }
                None => {
                    tracing::warn!(key = %store.key, "ignoring malformed favorites payload");
                    store.record_failure("malformed favorites payload");
                }
            },
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(key = %store.key, error = %err, "favorites unreadable, starting empty");
                store.record_failure(err.to_string());
            }
        }

        store.events.record(SessionEvent::success(
            &store.key,
            SessionEventKind::FavoritesLoaded,
            format!("{} favorites", store.count()),
        ));
        store
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Photo> {
        self.entries.get(id)
    }

    /// Save `photo`, overwriting any snapshot with the same id.
    pub fn add(&mut self, photo: Photo) {
        let id = photo.id.clone();
        self.entries.insert(id.clone(), photo);
        self.events.record(SessionEvent::success(
            &id,
            SessionEventKind::FavoriteAdded,
            "saved",
        ));
        self.persist();
    }

    /// Remove `id`. Returns whether it was a favorite; removing an absent id
    /// changes nothing and writes nothing.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.entries.shift_remove(id).is_none() {
            return false;
        }
        self.events.record(SessionEvent::success(
            id,
            SessionEventKind::FavoriteRemoved,
            "removed",
        ));
        self.persist();
        true
    }

    /// Flip the favorite state of `photo`. Returns the new state.
    pub fn toggle(&mut self, photo: &Photo) -> bool {
        if self.is_favorite(&photo.id) {
            self.remove(&photo.id);
            false
        } else {
            self.add(photo.clone());
            true
        }
    }

    /// Favorites in the order they were first saved.
    pub fn list(&self) -> Vec<&Photo> {
        self.entries.values().collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Encode the current set in its persisted form.
    pub fn snapshot_json(&self) -> Result<String, PersistenceError> {
        let mut map = Map::new();
        for photo in self.list() {
            let value = serde_json::to_value(photo).map_err(|e| PersistenceError::Encode {
                key: self.key.clone(),
                message: e.to_string(),
            })?;
            map.insert(photo.id.clone(), value);
        }
        serde_json::to_string(&Value::Object(map)).map_err(|e| PersistenceError::Encode {
            key: self.key.clone(),
            message: e.to_string(),
        })
    }

    fn persist(&self) {
        let result = self
            .snapshot_json()
            .and_then(|raw| self.storage.set(&self.key, &raw));
        if let Err(err) = result {
            tracing::warn!(key = %self.key, error = %err, "favorites not persisted");
            self.record_failure(err.to_string());
        }
    }

    fn record_failure(&self, message: impl Into<String>) {
        self.events.record(SessionEvent::failure(
            &self.key,
            SessionEventKind::PersistFailed,
            message,
        ));
    }
}

/// Decode a persisted payload. `None` when it is not a JSON object; entries
/// that do not decode as photos are skipped.
pub fn decode_favorites(raw: &str) -> Option<Vec<Photo>> {
    let map: Map<String, Value> = serde_json::from_str(raw).ok()?;
    let photos = map
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<Photo>(value) {
            Ok(photo) => Some(photo),
            Err(err) => {
                tracing::debug!(key = %key, error = %err, "skipping undecodable favorite");
                None
            }
        })
        .collect();
    Some(photos)
}
