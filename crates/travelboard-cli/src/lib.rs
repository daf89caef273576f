//! travelboard-cli: command-line surface for the travel board.
//!
//! Every command runs through [`run_cli`] against a [`TravelboardBackend`],
//! so tests drive the CLI without spawning a process or touching the user's
//! data directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use travelboard_core::config::{Config, LoggingConfig};
use travelboard_core::error::ConfigError;
use travelboard_session::storage::{FileStore, KeyValueStore};

pub mod config_cmd;
pub mod favorites;
pub mod logging;

#[cfg(test)]
pub(crate) mod tests_common;

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "travelboard-cli"
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    pub fn fail(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }
}

/// Environment the commands run against.
pub trait TravelboardBackend {
    /// Resolve configuration, optionally from an explicit file.
    fn load_config(&self, path: Option<&Path>) -> Result<Config, ConfigError>;

    /// Storage holding the favorites payload.
    fn open_storage(&self, config: &Config) -> Arc<dyn KeyValueStore>;

    /// Install the log subscriber once configuration is known.
    fn init_logging(&self, config: &LoggingConfig);
}

/// Real backend: config files and env, a directory-backed store, stderr logs.
pub struct FilesystemBackend;

impl TravelboardBackend for FilesystemBackend {
    fn load_config(&self, path: Option<&Path>) -> Result<Config, ConfigError> {
        Config::load(path)
    }

    fn open_storage(&self, config: &Config) -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::new(&config.favorites.data_dir))
    }

    fn init_logging(&self, config: &LoggingConfig) {
        logging::init(config);
    }
}

/// Browse-session companion for the travel board
#[derive(Debug, Parser)]
#[command(name = "travelboard")]
#[command(version)]
#[command(about = "Manage travel board favorites and configuration", long_about = None)]
pub struct Cli {
    /// Config file (default: first config.yaml in the search paths)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect and edit saved favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },

    /// Inspect the resolved configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// List favorites in the order they were saved
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the number of favorites
    Count,

    /// Save a photo given as a JSON object
    Add {
        /// Photo JSON, e.g. '{"id":"a1","src":"https://...","alt":"..."}'
        photo: String,
    },

    /// Remove the favorite with this photo id
    Remove { id: String },

    /// Save the photo if absent, remove it if present
    Toggle {
        /// Photo JSON
        photo: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration as YAML
    Show,

    /// Load and validate the configuration
    Validate,
}

pub fn run_cli_for_test(args: &[&str], backend: &dyn TravelboardBackend) -> CommandOutput {
    let argv = std::iter::once("travelboard").chain(args.iter().copied());
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => {
            let rendered = err.render().to_string();
            return if err.use_stderr() {
                CommandOutput::fail(err.exit_code(), rendered)
            } else {
                CommandOutput::ok(rendered)
            };
        }
    };

    let config = match backend.load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            return CommandOutput::fail(1, format!("Error: {err}\n"));
        }
    };
    backend.init_logging(&config.logging);
    tracing::debug!(command = ?cli.command, "running command");

    match cli.command {
        Commands::Favorites { action } => favorites::run_favorites(action, &config, backend),
        Commands::Config { action } => config_cmd::run_config(action, &config),
    }
}

pub fn run_cli(args: &[String], backend: &dyn TravelboardBackend) -> CommandOutput {
    let refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    run_cli_for_test(&refs, backend)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests_common::MockBackend;

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "travelboard-cli");
    }

    #[test]
    fn help_goes_to_stdout_exit_0() {
        let backend = MockBackend::new();
        let out = run_cli_for_test(&["--help"], &backend);
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.contains("favorites"), "stdout: {}", out.stdout);
        assert!(out.stdout.contains("config"));
        assert!(out.stderr.is_empty());
    }

    #[test]
    fn version_flag_exit_0() {
        let backend = MockBackend::new();
        let out = run_cli_for_test(&["--version"], &backend);
        assert_eq!(out.exit_code, 0);
        assert!(out.stdout.starts_with("travelboard "), "got {:?}", out.stdout);
    }

    #[test]
    fn missing_subcommand_is_usage_error() {
        let backend = MockBackend::new();
        let out = run_cli_for_test(&[], &backend);
        assert_eq!(out.exit_code, 2);
        assert!(out.stdout.is_empty());
        assert!(!out.stderr.is_empty());
    }

    #[test]
    fn unknown_command_is_usage_error() {
        let backend = MockBackend::new();
        let out = run_cli_for_test(&["nonexistent"], &backend);
        assert_eq!(out.exit_code, 2);
        assert!(out.stderr.contains("nonexistent"), "stderr: {}", out.stderr);
    }

    #[test]
    fn global_config_flag_reaches_backend() {
        let backend = MockBackend::new();
        run_cli_for_test(&["favorites", "count", "--config", "/tmp/tb.yaml"], &backend);
        assert_eq!(
            backend.config_paths(),
            vec![Some(PathBuf::from("/tmp/tb.yaml"))]
        );
    }

    #[test]
    fn config_error_exit_1() {
        let backend = MockBackend::new().with_config_error("search.page_size must be between 1 and 30");
        let out = run_cli_for_test(&["favorites", "count"], &backend);
        assert_eq!(out.exit_code, 1);
        assert!(out.stderr.starts_with("Error: "), "stderr: {}", out.stderr);
        assert!(out.stderr.contains("page_size"));
        assert_eq!(backend.logging_inits(), 0);
    }

    #[test]
    fn logging_is_initialized_from_config() {
        let backend = MockBackend::new();
        run_cli_for_test(&["config", "show"], &backend);
        assert_eq!(backend.logging_inits(), 1);
    }
}
