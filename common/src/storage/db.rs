use std::{collections::BTreeMap, ops::Deref};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use surrealdb::{
    engine::any::{connect, Any},
    opt::auth::Root,
    Error, Surreal,
};
use tracing::{debug, info};

use crate::{error::AppError, utils::config::AppConfig};

use super::types::{RecordKind, StoredRecord};

/// Document-store operations the versioned store is written against.
///
/// A collection is a named bag of rows, each tagged with a [`RecordKind`].
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    async fn create_collection(&self, name: &str) -> Result<(), AppError>;

    async fn insert_record(&self, collection: &str, record: StoredRecord) -> Result<(), AppError>;

    async fn count_records(&self, collection: &str, kind: RecordKind) -> Result<usize, AppError>;

    async fn collection_names(&self) -> Result<Vec<String>, AppError>;

    async fn find_records<T>(
        &self,
        collection: &str,
        kind: RecordKind,
        limit: usize,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send + Sync + 'static;

    async fn drop_collection(&self, name: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SurrealDbClient {
    pub client: Surreal<Any>,
}

impl SurrealDbClient {
    /// # Initialize a new database client
    ///
    /// # Arguments
    /// * `address` - engine address, e.g. `ws://127.0.0.1:8000` or `mem://`
    ///
    /// # Returns
    /// * `SurrealDbClient` initialized
    pub async fn new(
        address: &str,
        username: &str,
        password: &str,
        namespace: &str,
        database: &str,
    ) -> Result<Self, Error> {
        let db = connect(address).await?;

        // Sign in to database
        db.signin(Root { username, password }).await?;

        // Set namespace
        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }

    /// Connect using the application config. Any failure to reach or sign in to
    /// the server is reported as [`AppError::BackendUnavailable`].
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let result = if config.uses_memory_engine() {
            Self::embedded(
                &config.surrealdb_address,
                &config.surrealdb_namespace,
                &config.surrealdb_database,
            )
            .await
        } else {
            Self::new(
                &config.surrealdb_address,
                &config.surrealdb_username,
                &config.surrealdb_password,
                &config.surrealdb_namespace,
                &config.surrealdb_database,
            )
            .await
        };

        let client = result.map_err(|err| {
            AppError::BackendUnavailable(format!("{}: {err}", config.surrealdb_address))
        })?;

        info!(
            address = %config.surrealdb_address,
            namespace = %config.surrealdb_namespace,
            database = %config.surrealdb_database,
            "Connected to SurrealDB"
        );
        Ok(client)
    }

    async fn embedded(address: &str, namespace: &str, database: &str) -> Result<Self, Error> {
        let db = connect(address).await?;

        db.use_ns(namespace).use_db(database).await?;

        Ok(SurrealDbClient { client: db })
    }
}

/// Collection names are spliced into schema statements, so only identifier
/// characters are accepted.
fn ensure_collection_name(name: &str) -> Result<(), AppError> {
    if !name.is_empty() && name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "invalid collection name '{name}'"
        )))
    }
}

#[async_trait]
impl CollectionBackend for SurrealDbClient {
    async fn create_collection(&self, name: &str) -> Result<(), AppError> {
        ensure_collection_name(name)?;
        self.client
            .query(format!("DEFINE TABLE IF NOT EXISTS {name} SCHEMALESS"))
            .await?
            .check()?;
        Ok(())
    }

    async fn insert_record(&self, collection: &str, record: StoredRecord) -> Result<(), AppError> {
        ensure_collection_name(collection)?;
        debug!(collection, kind = %record.kind(), id = %record.label(), "inserting record");
        self.client
            .query("CREATE type::table($table) CONTENT $content")
            .bind(("table", collection.to_owned()))
            .bind(("content", record))
            .await?
            .check()?;
        Ok(())
    }

    async fn count_records(&self, collection: &str, kind: RecordKind) -> Result<usize, AppError> {
        #[derive(Deserialize)]
        struct CountRow {
            count: i64,
        }

        ensure_collection_name(collection)?;
        let mut response = self
            .client
            .query("SELECT count() AS count FROM type::table($table) WHERE kind = $kind GROUP ALL")
            .bind(("table", collection.to_owned()))
            .bind(("kind", kind.as_str()))
            .await?;
        let rows: Vec<CountRow> = response.take(0)?;
        let count = rows.first().map_or(0, |row| row.count);
        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn collection_names(&self) -> Result<Vec<String>, AppError> {
        #[derive(Deserialize)]
        struct DbInfo {
            #[serde(default)]
            tables: BTreeMap<String, String>,
        }

        let mut response = self.client.query("INFO FOR DB").await?;
        let info: Option<DbInfo> = response.take(0)?;
        Ok(info
            .map(|info| info.tables.into_keys().collect())
            .unwrap_or_default())
    }

    async fn find_records<T>(
        &self,
        collection: &str,
        kind: RecordKind,
        limit: usize,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        ensure_collection_name(collection)?;
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut response = self
            .client
            .query(format!(
                "SELECT * FROM type::table($table) WHERE kind = $kind LIMIT {limit}"
            ))
            .bind(("table", collection.to_owned()))
            .bind(("kind", kind.as_str()))
            .await?;
        Ok(response.take(0)?)
    }

    async fn drop_collection(&self, name: &str) -> Result<(), AppError> {
        ensure_collection_name(name)?;
        self.client
            .query(format!("REMOVE TABLE IF EXISTS {name}"))
            .await?
            .check()?;
        Ok(())
    }
}

impl Deref for SurrealDbClient {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl SurrealDbClient {
    /// Create an in-memory SurrealDB client for testing.
    pub async fn memory(namespace: &str, database: &str) -> Result<Self, Error> {
        Self::embedded("mem://", namespace, database).await
    }
}
