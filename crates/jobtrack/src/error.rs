use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobtrackError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

/// The single error kind the application store receives from a persistence
/// backend. The store never distinguishes variants; they exist for logs and
/// for callers using a backend directly.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Application '{id}' not found")]
    NotFound { id: String },

    #[error("No signed-in user")]
    Unauthorized,

    #[error("Invalid application: {message}")]
    Validation { message: String },

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Database(#[from] crate::db::DatabaseError),
}

impl BackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JobtrackError>;
