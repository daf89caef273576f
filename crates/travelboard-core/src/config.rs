//! Configuration types for the travel board.
//!
//! Root configuration struct and nested section types with full defaults,
//! validation, YAML file loading, environment variable overrides, and tilde
//! path expansion.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Schema version of the persisted favorites payload.
pub const FAVORITES_SCHEMA_VERSION: u32 = 1;

/// Largest page size the search provider accepts.
pub const MAX_PAGE_SIZE: u32 = 30;

// ---------------------------------------------------------------------------
// Root config
// ---------------------------------------------------------------------------

/// Root configuration for the travel board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub favorites: FavoritesConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration: defaults, then `path` (or the first config file
    /// found in the search paths), then environment overrides. The result is
    /// path-expanded and validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };
        let mut cfg = match file {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_env_overrides(|key| std::env::var(key).ok())?;
        cfg.expand_paths();
        cfg.validate().map_err(ConfigError::Invalid)?;
        Ok(cfg)
    }

    /// Parse a YAML config file. Missing sections and fields keep defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Apply `TRAVELBOARD_*` overrides using `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TRAVELBOARD_DATA_DIR") {
            self.favorites.data_dir = v;
        }
        if let Some(v) = lookup("TRAVELBOARD_DEFAULT_QUERY") {
            self.search.default_query = v;
        }
        if let Some(v) = lookup("TRAVELBOARD_PAGE_SIZE") {
            self.search.page_size = v.trim().parse().map_err(|_| ConfigError::Env {
                var: "TRAVELBOARD_PAGE_SIZE".into(),
                message: format!("expected a positive integer, got {v:?}"),
            })?;
        }
        if let Some(v) = lookup("TRAVELBOARD_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("TRAVELBOARD_LOG_FORMAT") {
            self.logging.format = v;
        }
        Ok(())
    }

    /// Storage key of the favorites payload, namespaced by schema version.
    pub fn favorites_key(&self) -> String {
        format!(
            "{}:favorites:v{}",
            self.favorites.namespace, FAVORITES_SCHEMA_VERSION
        )
    }

    /// Validates the entire configuration, returning an error message on failure.
    pub fn validate(&self) -> Result<(), String> {
        // Search
        if self.search.default_query.trim().is_empty() {
            return Err("search.default_query is required".into());
        }
        if self.search.page_size < 1 || self.search.page_size > MAX_PAGE_SIZE {
            return Err(format!(
                "search.page_size must be between 1 and {MAX_PAGE_SIZE}"
            ));
        }

        // Favorites
        let ns = self.favorites.namespace.trim();
        if ns.is_empty() {
            return Err("favorites.namespace is required".into());
        }
        if ns.contains(':') {
            return Err("favorites.namespace must not contain ':'".into());
        }
        if self.favorites.data_dir.trim().is_empty() {
            return Err("favorites.data_dir is required".into());
        }

        // Logging
        match self.logging.level.to_lowercase().trim() {
            "debug" | "info" | "warn" | "error" => {}
            _ => return Err("logging.level must be one of debug, info, warn, error".into()),
        }
        match self.logging.format.to_lowercase().trim() {
            "console" | "json" => {}
            _ => return Err("logging.format must be one of console, json".into()),
        }

        Ok(())
    }

    /// Expands `~` to home directory in all path-related config fields.
    pub fn expand_paths(&mut self) {
        self.favorites.data_dir = expand_tilde(&self.favorites.data_dir);
    }
}

// ---------------------------------------------------------------------------
// Section configs
// ---------------------------------------------------------------------------

/// Search session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Query used when the navigation state carries none.
    pub default_query: String,
    pub page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_query: "kyoto".into(),
            page_size: 18,
        }
    }
}

/// Favorites persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FavoritesConfig {
    pub namespace: String,
    pub data_dir: String,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            namespace: "travelboard".into(),
            data_dir: home_dir()
                .join(".local/share/travelboard")
                .display()
                .to_string(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "console".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if path.is_empty() {
        return path.to_string();
    }
    if path == "~" {
        return home_dir().display().to_string();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return home_dir().join(rest).display().to_string();
    }
    path.to_string()
}

/// Search for a configuration file in the standard locations.
/// Returns `None` if no config file is found.
pub fn find_config_file() -> Option<PathBuf> {
    config_search_paths()
        .into_iter()
        .map(|dir| dir.join("config.yaml"))
        .find(|candidate| candidate.is_file())
}

/// Returns the list of directories to search for config files.
fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        paths.push(Path::new(&xdg).join("travelboard"));
    }

    let home = home_dir();
    if home.as_os_str() != "" {
        paths.push(home.join(".config/travelboard"));
    }

    paths.push(PathBuf::from("."));
    paths
}

/// Get the user's home directory, falling back to `/` on failure.
fn home_dir() -> PathBuf {
    #[allow(deprecated)]
    std::env::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn expect_invalid(cfg: &Config) -> String {
        match cfg.validate() {
            Ok(()) => panic!("expected error"),
            Err(err) => err,
        }
    }

    #[test]
    fn config_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.search.default_query, "kyoto");
        assert_eq!(cfg.search.page_size, 18);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.logging.format, "console");
        assert!(cfg.favorites.data_dir.ends_with("travelboard"));
    }

    #[test]
    fn config_default_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn favorites_key_is_versioned() {
        assert_eq!(Config::default().favorites_key(), "travelboard:favorites:v1");
    }

    #[test]
    fn validate_rejects_blank_default_query() {
        let mut cfg = Config::default();
        cfg.search.default_query = "   ".into();
        assert!(expect_invalid(&cfg).contains("default_query"));
    }

    #[test]
    fn validate_page_size_bounds() {
        let mut cfg = Config::default();
        cfg.search.page_size = 0;
        assert!(expect_invalid(&cfg).contains("page_size"));
        cfg.search.page_size = MAX_PAGE_SIZE + 1;
        assert!(expect_invalid(&cfg).contains("page_size"));
    }

    #[test]
    fn validate_rejects_namespace_with_separator() {
        let mut cfg = Config::default();
        cfg.favorites.namespace = "a:b".into();
        assert!(expect_invalid(&cfg).contains("namespace"));
    }

    #[test]
    fn validate_rejects_bad_log_level() {
        let mut cfg = Config::default();
        cfg.logging.level = "bogus".into();
        assert!(expect_invalid(&cfg).contains("logging.level"));
    }

    #[test]
    fn validate_rejects_bad_log_format() {
        let mut cfg = Config::default();
        cfg.logging.format = "xml".into();
        assert!(expect_invalid(&cfg).contains("logging.format"));
    }

    #[test]
    fn yaml_partial_sections_keep_defaults() {
        let cfg = Config::from_yaml_str("search:\n  page_size: 12\nlogging:\n  format: json\n")
            .unwrap();
        assert_eq!(cfg.search.page_size, 12);
        assert_eq!(cfg.search.default_query, "kyoto");
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml_str("\n").unwrap(), Config::default());
    }

    #[test]
    fn from_file_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "search: [not, a, map]\n").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.yaml"), "err={err}");
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let data_dir = dir.path().join("data");
        std::fs::write(
            &path,
            format!(
                "favorites:\n  data_dir: {}\nsearch:\n  default_query: lisbon\n",
                data_dir.display()
            ),
        )
        .unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.favorites.data_dir, data_dir.display().to_string());
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("TRAVELBOARD_DEFAULT_QUERY", "porto"),
            ("TRAVELBOARD_PAGE_SIZE", "24"),
            ("TRAVELBOARD_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();
        let mut cfg = Config::default();
        cfg.apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.search.default_query, "porto");
        assert_eq!(cfg.search.page_size, 24);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn env_override_rejects_bad_page_size() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_env_overrides(|k| (k == "TRAVELBOARD_PAGE_SIZE").then(|| "many".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("TRAVELBOARD_PAGE_SIZE"), "err={err}");
    }

    #[test]
    fn expand_tilde_works() {
        assert_eq!(expand_tilde(""), "");
        assert!(!expand_tilde("~").contains('~'));
        let expanded = expand_tilde("~/foo/bar");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("foo/bar"));
        assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
    }

    #[test]
    fn expand_paths_mutates() {
        let mut cfg = Config::default();
        cfg.favorites.data_dir = "~/travel-data".into();
        cfg.expand_paths();
        assert!(!cfg.favorites.data_dir.starts_with('~'));
    }
}
