use thiserror::Error;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported dataset: {0}")]
    UnsupportedDataset(String),
    #[error("Unsupported document schema in {dataset}: {reason}")]
    UnsupportedSchema { dataset: String, reason: String },
    #[error("Failed to process record {id}: {reason}")]
    RecordProcessing { id: String, reason: String },
    #[error("Version '{0}' not found")]
    VersionNotFound(String),
    #[error("Version '{0}' already exists")]
    DuplicateVersion(String),
    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("Database error: {0}")]
    Database(#[from] surrealdb::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
