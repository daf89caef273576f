//! Shared mock backend for CLI unit tests.

#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use travelboard_core::config::{Config, LoggingConfig};
use travelboard_core::error::ConfigError;
use travelboard_session::storage::{KeyValueStore, MemoryStore};

use crate::TravelboardBackend;

pub struct MockBackend {
    pub config: Config,
    pub storage: Arc<MemoryStore>,
    config_error: Option<String>,
    config_paths: Mutex<Vec<Option<PathBuf>>>,
    logging_inits: Mutex<usize>,
}

impl MockBackend {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.favorites.data_dir = "/tmp/travelboard-test".into();
        Self {
            config,
            storage: Arc::new(MemoryStore::new()),
            config_error: None,
            config_paths: Mutex::new(Vec::new()),
            logging_inits: Mutex::new(0),
        }
    }

    pub fn with_config_error(mut self, message: &str) -> Self {
        self.config_error = Some(message.to_string());
        self
    }

    pub fn config_paths(&self) -> Vec<Option<PathBuf>> {
        self.config_paths.lock().unwrap().clone()
    }

    pub fn logging_inits(&self) -> usize {
        *self.logging_inits.lock().unwrap()
    }
}

impl TravelboardBackend for MockBackend {
    fn load_config(&self, path: Option<&Path>) -> Result<Config, ConfigError> {
        self.config_paths
            .lock()
            .unwrap()
            .push(path.map(Path::to_path_buf));
        match &self.config_error {
            Some(message) => Err(ConfigError::Invalid(message.clone())),
            None => Ok(self.config.clone()),
        }
    }

    fn open_storage(&self, _config: &Config) -> Arc<dyn KeyValueStore> {
        self.storage.clone()
    }

    fn init_logging(&self, _config: &LoggingConfig) {
        *self.logging_inits.lock().unwrap() += 1;
    }
}
