//! Error taxonomy for the browsing session.
//!
//! Every external call is folded into one of these categories at the point of
//! call. None of them is fatal: validation errors are ignored, provider errors
//! become a status flag plus message, persistence errors are logged and
//! dropped.

use thiserror::Error;

/// Message shown when the search provider answered with a failure status.
pub const SEARCH_REQUEST_FAILED: &str = "Failed to load photos";

/// Message shown for unexpected failures that carry no message of their own.
pub const GENERIC_FAILURE: &str = "Error";

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The candidate query is empty after trimming.
    #[error("query is empty")]
    EmptyQuery,
}

/// Failure of the search or weather provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("provider responded with status {status}")]
    Status { status: u16 },

    /// The requested resource (e.g. a city) could not be resolved.
    #[error("{what:?} not found")]
    NotFound { what: String },

    /// The request never produced a response.
    #[error("{message}")]
    Transport { message: String },

    /// The response could not be decoded.
    #[error("{message}")]
    Decode { message: String },
}

impl ProviderError {
    /// Whether the provider itself reported the failure (as opposed to an
    /// unexpected failure on the way).
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::NotFound { .. })
    }

    /// Human-readable message shown next to the search results.
    pub fn search_message(&self) -> String {
        if self.is_request_failure() {
            return SEARCH_REQUEST_FAILED.to_string();
        }
        match self {
            Self::Transport { message } | Self::Decode { message } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Failure of the durable key-value storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("read {key:?}: {message}")]
    Read { key: String, message: String },

    #[error("write {key:?}: {message}")]
    Write { key: String, message: String },

    #[error("encode {key:?}: {message}")]
    Encode { key: String, message: String },
}

/// Configuration could not be loaded or is invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid environment override {var}: {message}")]
    Env { var: String, message: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}
