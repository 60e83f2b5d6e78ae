use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_COLLECTION_PREFIX: &str = "processed_";

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_surrealdb_address")]
    pub surrealdb_address: String,
    #[serde(default = "default_surrealdb_credential")]
    pub surrealdb_username: String,
    #[serde(default = "default_surrealdb_credential")]
    pub surrealdb_password: String,
    #[serde(default = "default_surrealdb_scope")]
    pub surrealdb_namespace: String,
    #[serde(default = "default_surrealdb_scope")]
    pub surrealdb_database: String,
    #[serde(default = "default_collection_prefix")]
    pub collection_prefix: String,
    #[serde(default = "default_datasets_dir")]
    pub datasets_dir: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_sample_limit")]
    pub sample_limit: usize,
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

impl AppConfig {
    /// Whether the configured address selects the embedded in-memory engine.
    pub fn uses_memory_engine(&self) -> bool {
        self.surrealdb_address.starts_with("mem://")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            surrealdb_address: default_surrealdb_address(),
            surrealdb_username: default_surrealdb_credential(),
            surrealdb_password: default_surrealdb_credential(),
            surrealdb_namespace: default_surrealdb_scope(),
            surrealdb_database: default_surrealdb_scope(),
            collection_prefix: default_collection_prefix(),
            datasets_dir: default_datasets_dir(),
            data_dir: default_data_dir(),
            sample_limit: default_sample_limit(),
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

fn default_surrealdb_address() -> String {
    "ws://127.0.0.1:8000".to_string()
}

fn default_surrealdb_credential() -> String {
    "root".to_string()
}

fn default_surrealdb_scope() -> String {
    "ir_system".to_string()
}

fn default_collection_prefix() -> String {
    DEFAULT_COLLECTION_PREFIX.to_string()
}

fn default_datasets_dir() -> String {
    "./datasets".to_string()
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_sample_limit() -> usize {
    10
}

fn default_max_input_bytes() -> usize {
    1024 * 1024
}

pub fn get_config() -> Result<AppConfig, AppError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    from_sources(config)
}

fn from_sources(config: Config) -> Result<AppConfig, AppError> {
    Ok(config.try_deserialize()?)
}
