use common::storage::{db::SurrealDbClient, store::VersionStore};
use preprocessing_pipeline::{preprocess_batch, TextPipeline};
use std::sync::Arc;
use uuid::Uuid;

use common::storage::types::{ProcessedRecord, Record};

/// Sets up a version store over a fresh in-memory database
pub async fn setup_test_store() -> VersionStore<SurrealDbClient> {
    let namespace = "test_ns";
    let database = Uuid::new_v4().to_string();

    let db = SurrealDbClient::memory(namespace, &database)
        .await
        .expect("Failed to start in-memory surrealdb");

    VersionStore::new(Arc::new(db))
}

/// Runs the default pipeline over `(id, text)` pairs, asserting nothing is skipped
pub fn preprocess_clean(records: &[(&str, &str)]) -> Vec<ProcessedRecord> {
    let pipeline = TextPipeline::default();
    let outcome = preprocess_batch(
        &pipeline,
        records.iter().map(|(id, text)| Record::new(*id, *text)),
    );
    assert!(outcome.is_clean(), "unexpected failures: {:?}", outcome.failures);
    outcome.processed
}
