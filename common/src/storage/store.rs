//! Named, write-once versions of a processed corpus.
//!
//! Every version lives in its own collection whose name starts with the
//! reserved prefix. A version is created by [`VersionStore::write`] and only
//! ever removed wholesale.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{error::AppError, utils::config::DEFAULT_COLLECTION_PREFIX};

use super::{
    db::CollectionBackend,
    types::{
        DocumentSample, ProcessedRecord, Qrel, RecordKind, StoredDocument, StoredRecord,
        VersionManifest,
    },
};

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Everything a single write persists.
#[derive(Debug, Clone, Default)]
pub struct NewVersion {
    pub dataset: String,
    pub documents: Vec<StoredDocument>,
    pub version_name: Option<String>,
    pub queries: Option<Vec<ProcessedRecord>>,
    pub qrels: Option<Vec<Qrel>>,
}

impl NewVersion {
    pub fn new(dataset: impl Into<String>, documents: Vec<StoredDocument>) -> Self {
        Self {
            dataset: dataset.into(),
            documents,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_version_name(mut self, version_name: impl Into<String>) -> Self {
        self.version_name = Some(version_name.into());
        self
    }

    #[must_use]
    pub fn with_queries(mut self, queries: Vec<ProcessedRecord>) -> Self {
        self.queries = Some(queries);
        self
    }

    #[must_use]
    pub fn with_qrels(mut self, qrels: Vec<Qrel>) -> Self {
        self.qrels = Some(qrels);
        self
    }
}

/// Outcome of a write, including records the backend refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub version_id: String,
    pub documents_written: usize,
    pub queries_written: usize,
    pub qrels_written: usize,
    pub failed_records: Vec<String>,
}

impl WriteReport {
    fn new(version_id: String) -> Self {
        Self {
            version_id,
            documents_written: 0,
            queries_written: 0,
            qrels_written: 0,
            failed_records: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed_records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStats {
    pub name: String,
    pub document_count: usize,
    pub query_count: usize,
    pub qrel_count: usize,
    pub manifest: Option<VersionManifest>,
    pub sample: Vec<DocumentSample>,
}

impl VersionStats {
    pub fn dataset(&self) -> Option<&str> {
        self.manifest.as_ref().map(|manifest| manifest.dataset.as_str())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.manifest.as_ref().map(|manifest| manifest.created_at)
    }

    /// Live counts match what the writer intended. A version without a manifest
    /// cannot prove it is whole and counts as incomplete.
    pub fn is_complete(&self) -> bool {
        self.manifest.as_ref().is_some_and(|manifest| {
            manifest.expected_documents == self.document_count
                && manifest.expected_queries == self.query_count
                && manifest.expected_qrels == self.qrel_count
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(String),
    NotFound(String),
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted(name) => write!(f, "Version '{name}' deleted successfully."),
            Self::NotFound(name) => write!(f, "Version '{name}' not found."),
        }
    }
}

pub struct VersionStore<B> {
    backend: Arc<B>,
    prefix: String,
}

impl<B> Clone for VersionStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            prefix: self.prefix.clone(),
        }
    }
}

impl<B: CollectionBackend> VersionStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_prefix(backend, DEFAULT_COLLECTION_PREFIX)
    }

    pub fn with_prefix(backend: Arc<B>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Build the version identifier for a dataset and an optional name.
    /// Blank or missing names fall back to the current UTC timestamp.
    pub fn resolve_version_id(&self, dataset: &str, version_name: Option<&str>) -> String {
        let suffix = match version_name.map(str::trim) {
            Some(name) if !name.is_empty() => sanitize_component(name),
            _ => Utc::now().format(TIMESTAMP_FORMAT).to_string(),
        };
        format!("{}{}_{}", self.prefix, sanitize_component(dataset), suffix)
    }

    #[tracing::instrument(skip_all, fields(dataset = %version.dataset))]
    pub async fn write(&self, version: NewVersion) -> Result<WriteReport, AppError> {
        let version_id = self.resolve_version_id(&version.dataset, version.version_name.as_deref());

        if self.exists(&version_id).await? {
            return Err(AppError::DuplicateVersion(version_id));
        }

        self.backend.create_collection(&version_id).await?;
        info!(version = %version_id, "Created version collection");

        let queries = version.queries.unwrap_or_default();
        let qrels = version.qrels.unwrap_or_default();
        let manifest = StoredRecord::Manifest {
            dataset: version.dataset,
            created_at: Utc::now(),
            expected_documents: version.documents.len(),
            expected_queries: queries.len(),
            expected_qrels: qrels.len(),
        };
        if let Err(err) = self.backend.insert_record(&version_id, manifest).await {
            // Without its manifest the collection cannot be judged complete, so it is removed.
            if let Err(cleanup) = self.backend.drop_collection(&version_id).await {
                warn!(
                    version = %version_id,
                    error = %cleanup,
                    "Failed to remove version without manifest"
                );
            }
            return Err(err);
        }

        let mut report = WriteReport::new(version_id);
        for document in version.documents {
            if self.insert(&mut report, document.into()).await {
                report.documents_written += 1;
            }
        }
        for query in queries {
            if self.insert(&mut report, query.into()).await {
                report.queries_written += 1;
            }
        }
        for qrel in qrels {
            if self.insert(&mut report, qrel.into()).await {
                report.qrels_written += 1;
            }
        }

        if report.is_complete() {
            info!(
                version = %report.version_id,
                documents = report.documents_written,
                queries = report.queries_written,
                qrels = report.qrels_written,
                "Version written"
            );
        } else {
            warn!(
                version = %report.version_id,
                failed = report.failed_records.len(),
                "Version written with failed records"
            );
        }
        Ok(report)
    }

    /// Insert one row; a failure is recorded on the report rather than aborting the write.
    async fn insert(&self, report: &mut WriteReport, record: StoredRecord) -> bool {
        let label = record.label();
        let kind = record.kind();
        match self.backend.insert_record(&report.version_id, record).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    version = %report.version_id,
                    %kind,
                    id = %label,
                    error = %err,
                    "Failed to store record"
                );
                report.failed_records.push(label);
                false
            }
        }
    }

    /// Versions created by this store, sorted by name.
    pub async fn list_versions(&self) -> Result<Vec<String>, AppError> {
        let mut versions: Vec<String> = self
            .backend
            .collection_names()
            .await?
            .into_iter()
            .filter(|name| name.starts_with(&self.prefix))
            .collect();
        versions.sort();
        Ok(versions)
    }

    pub async fn exists(&self, version_id: &str) -> Result<bool, AppError> {
        Ok(self.list_versions().await?.iter().any(|name| name == version_id))
    }

    pub async fn stat(
        &self,
        version_id: &str,
        sample_limit: usize,
    ) -> Result<VersionStats, AppError> {
        if !self.exists(version_id).await? {
            return Err(AppError::VersionNotFound(version_id.to_string()));
        }

        let manifest: Option<VersionManifest> = self
            .backend
            .find_records(version_id, RecordKind::Manifest, 1)
            .await?
            .into_iter()
            .next();

        Ok(VersionStats {
            name: version_id.to_string(),
            document_count: self.backend.count_records(version_id, RecordKind::Document).await?,
            query_count: self.backend.count_records(version_id, RecordKind::Query).await?,
            qrel_count: self.backend.count_records(version_id, RecordKind::Qrel).await?,
            manifest,
            sample: self
                .backend
                .find_records(version_id, RecordKind::Document, sample_limit)
                .await?,
        })
    }

    pub async fn delete(&self, version_id: &str) -> Result<DeleteOutcome, AppError> {
        if !self.exists(version_id).await? {
            info!(version = %version_id, "Delete requested for unknown version");
            return Ok(DeleteOutcome::NotFound(version_id.to_string()));
        }

        self.backend.drop_collection(version_id).await?;
        info!(version = %version_id, "Deleted version");
        Ok(DeleteOutcome::Deleted(version_id.to_string()))
    }

    pub async fn delete_all(&self) -> Result<usize, AppError> {
        let versions = self.list_versions().await?;
        for version in &versions {
            self.backend.drop_collection(version).await?;
        }
        info!(count = versions.len(), "Deleted all versions");
        Ok(versions.len())
    }
}

/// Lowercase ASCII alphanumerics and map everything else to `_`.
fn sanitize_component(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "x".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{db::SurrealDbClient, types::Record};
    use async_trait::async_trait;
    use serde::de::DeserializeOwned;
    use uuid::Uuid;

    /// In-memory backend that refuses to insert rows with the given labels.
    struct RejectingBackend {
        inner: SurrealDbClient,
        rejected: Vec<String>,
    }

    impl RejectingBackend {
        async fn new(rejected: &[&str]) -> Self {
            let database = Uuid::new_v4().to_string();
            let inner = SurrealDbClient::memory("test_ns", &database)
                .await
                .expect("Failed to start in-memory surrealdb");
            Self {
                inner,
                rejected: rejected.iter().map(ToString::to_string).collect(),
            }
        }
    }

    #[async_trait]
    impl CollectionBackend for RejectingBackend {
        async fn create_collection(&self, name: &str) -> Result<(), AppError> {
            self.inner.create_collection(name).await
        }

        async fn insert_record(
            &self,
            collection: &str,
            record: StoredRecord,
        ) -> Result<(), AppError> {
            if self.rejected.contains(&record.label()) {
                return Err(AppError::Validation(format!("rejected {}", record.label())));
            }
            self.inner.insert_record(collection, record).await
        }

        async fn count_records(
            &self,
            collection: &str,
            kind: RecordKind,
        ) -> Result<usize, AppError> {
            self.inner.count_records(collection, kind).await
        }

        async fn collection_names(&self) -> Result<Vec<String>, AppError> {
            self.inner.collection_names().await
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
            self.inner.find_records(collection, kind, limit).await
        }

        async fn drop_collection(&self, name: &str) -> Result<(), AppError> {
            self.inner.drop_collection(name).await
        }
    }

    async fn store() -> VersionStore<SurrealDbClient> {
        let database = Uuid::new_v4().to_string();
        let db = SurrealDbClient::memory("test_ns", &database)
            .await
            .expect("Failed to start in-memory surrealdb");
        VersionStore::new(Arc::new(db))
    }

    fn document(id: &str, text: &str) -> StoredDocument {
        StoredDocument::ProcessedOnly {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn sanitizes_dataset_and_version_components() {
        assert_eq!(sanitize_component("beir/quora/test"), "beir_quora_test");
        assert_eq!(sanitize_component("V1.2"), "v1_2");
        assert_eq!(sanitize_component(""), "x");
    }

    #[tokio::test]
    async fn blank_version_names_fall_back_to_timestamp() {
        let store = store().await;

        let id = store.resolve_version_id("antique/test", Some("   "));
        let suffix = id
            .strip_prefix("processed_antique_test_")
            .expect("prefix and dataset");
        assert_eq!(suffix.len(), "20240101_120000".len());
        assert!(suffix
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch == '_'));
    }

    #[tokio::test]
    async fn write_then_stat_round_trips() {
        let store = store().await;

        let report = store
            .write(
                NewVersion::new("ds/name", vec![document("d1", "hello world")])
                    .with_version_name("v1"),
            )
            .await
            .expect("write version");
        assert_eq!(report.version_id, "processed_ds_name_v1");
        assert_eq!(report.documents_written, 1);
        assert!(report.is_complete());

        let stats = store
            .stat("processed_ds_name_v1", 10)
            .await
            .expect("stat version");
        assert_eq!(stats.document_count, 1);
        assert_eq!(stats.query_count, 0);
        assert_eq!(stats.qrel_count, 0);
        assert_eq!(stats.dataset(), Some("ds/name"));
        assert!(stats.is_complete());
        assert!(stats.sample.iter().any(|doc| doc.doc_id == "d1"));
    }

    #[tokio::test]
    async fn persists_original_text_queries_and_qrels() {
        let store = store().await;
        let processed = ProcessedRecord::new(Record::new("d1", "Cats RUN!"), "cat run".to_string());
        let query = ProcessedRecord::new(Record::new("q1", "running cats"), "run cat".to_string());

        let report = store
            .write(
                NewVersion::new("antique/test", vec![processed.into_stored(true)])
                    .with_version_name("full")
                    .with_queries(vec![query])
                    .with_qrels(vec![Qrel::new("q1", "d1", 4), Qrel::new("q1", "d2", 1)]),
            )
            .await
            .expect("write version");

        let stats = store.stat(&report.version_id, 5).await.expect("stat");
        assert_eq!(stats.document_count, 1);
        assert_eq!(stats.query_count, 1);
        assert_eq!(stats.qrel_count, 2);
        assert_eq!(stats.sample[0].original_text.as_deref(), Some("Cats RUN!"));
        assert_eq!(stats.sample[0].text, "cat run");
    }

    #[tokio::test]
    async fn rejects_duplicate_version_names() {
        let store = store().await;
        store
            .write(NewVersion::new("ds", vec![document("d1", "a")]).with_version_name("v1"))
            .await
            .expect("first write");

        let err = store
            .write(NewVersion::new("ds", vec![document("d2", "b")]).with_version_name("V1"))
            .await
            .expect_err("second write must be rejected");
        assert!(matches!(err, AppError::DuplicateVersion(ref name) if name == "processed_ds_v1"));

        let stats = store.stat("processed_ds_v1", 10).await.expect("stat");
        assert_eq!(stats.document_count, 1);
    }

    #[tokio::test]
    async fn stat_reports_missing_version() {
        let store = store().await;

        let err = store
            .stat("processed_nope_v1", 10)
            .await
            .expect_err("missing version");
        assert!(matches!(err, AppError::VersionNotFound(_)));
    }

    #[tokio::test]
    async fn stat_flags_versions_with_fewer_records_than_intended() {
        let store = store().await;
        let backend = Arc::clone(&store.backend);
        backend
            .create_collection("processed_partial_v1")
            .await
            .expect("create");
        backend
            .insert_record(
                "processed_partial_v1",
                StoredRecord::Manifest {
                    dataset: "partial".to_string(),
                    created_at: Utc::now(),
                    expected_documents: 3,
                    expected_queries: 0,
                    expected_qrels: 0,
                },
            )
            .await
            .expect("manifest");
        backend
            .insert_record("processed_partial_v1", document("d1", "only one").into())
            .await
            .expect("document");

        let stats = store.stat("processed_partial_v1", 10).await.expect("stat");
        assert_eq!(stats.document_count, 1);
        assert!(!stats.is_complete());
    }

    #[tokio::test]
    async fn failed_record_inserts_are_reported_and_later_records_still_land() {
        let store = VersionStore::new(Arc::new(RejectingBackend::new(&["bad"]).await));
        let documents = vec![
            document("d1", "first"),
            document("bad", "rejected"),
            document("d3", "third"),
        ];

        let report = store
            .write(NewVersion::new("ds", documents).with_version_name("v1"))
            .await
            .expect("write continues past a failed record");
        assert_eq!(report.documents_written, 2);
        assert_eq!(report.failed_records, vec!["bad".to_string()]);
        assert!(!report.is_complete());

        let stats = store.stat(&report.version_id, 10).await.expect("stat");
        assert_eq!(stats.document_count, 2);
        assert!(stats.sample.iter().any(|doc| doc.doc_id == "d3"));
        assert!(!stats.is_complete());
    }

    #[tokio::test]
    async fn manifest_failure_leaves_no_version_behind() {
        let store = VersionStore::new(Arc::new(RejectingBackend::new(&["manifest:ds"]).await));

        let err = store
            .write(NewVersion::new("ds", vec![document("d1", "a")]).with_version_name("v1"))
            .await
            .expect_err("manifest insert fails");
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.list_versions().await.unwrap().is_empty());
        assert!(matches!(
            store.stat("processed_ds_v1", 10).await,
            Err(AppError::VersionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn versions_without_manifest_are_not_complete() {
        let store = store().await;
        store
            .backend
            .create_collection("processed_bare_v1")
            .await
            .expect("create");

        let stats = store.stat("processed_bare_v1", 10).await.expect("stat");
        assert!(stats.manifest.is_none());
        assert!(!stats.is_complete());
    }

    #[tokio::test]
    async fn delete_removes_version_and_reports_unknown_names() {
        let store = store().await;
        let report = store
            .write(NewVersion::new("ds", vec![document("d1", "a")]).with_version_name("v1"))
            .await
            .expect("write");

        let outcome = store.delete(&report.version_id).await.expect("delete");
        assert_eq!(outcome, DeleteOutcome::Deleted(report.version_id.clone()));
        assert!(!store.list_versions().await.unwrap().contains(&report.version_id));
        assert!(matches!(
            store.stat(&report.version_id, 10).await,
            Err(AppError::VersionNotFound(_))
        ));

        let again = store.delete(&report.version_id).await.expect("second delete");
        assert_eq!(again.to_string(), "Version 'processed_ds_v1' not found.");
    }

    #[tokio::test]
    async fn delete_all_only_touches_prefixed_collections() {
        let store = store().await;
        for name in ["a", "b", "c"] {
            store
                .write(NewVersion::new("ds", Vec::new()).with_version_name(name))
                .await
                .expect("write");
        }
        store
            .backend
            .create_collection("unrelated")
            .await
            .expect("unrelated table");

        assert_eq!(store.list_versions().await.unwrap().len(), 3);
        assert_eq!(store.delete_all().await.expect("delete all"), 3);
        assert!(store.list_versions().await.unwrap().is_empty());
        assert!(store
            .backend
            .collection_names()
            .await
            .unwrap()
            .contains(&"unrelated".to_string()));
        assert_eq!(
            store.delete("unrelated").await.unwrap(),
            DeleteOutcome::NotFound("unrelated".to_string())
        );
    }
}
