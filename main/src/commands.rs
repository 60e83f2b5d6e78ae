//! Operations the CLI and the interactive menu drive.

use std::{path::Path, sync::Arc};

use anyhow::{bail, Context, Result};
use common::{
    storage::{
        db::SurrealDbClient,
        store::{DeleteOutcome, NewVersion, VersionStats, VersionStore, WriteReport},
        types::ProcessedRecord,
    },
    utils::config::AppConfig,
};
use preprocessing_pipeline::{preprocess_batch, BatchOutcome, PipelineConfig, TextPipeline};
use tracing::info;

use crate::{
    datasets::DatasetKind,
    export::{export_version, ExportPaths},
};

const PREVIEW_CHARS: usize = 200;
const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub version_name: Option<String>,
    pub with_queries: bool,
    pub keep_original: bool,
    pub export: bool,
    pub preview: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            version_name: None,
            with_queries: false,
            keep_original: false,
            export: true,
            preview: 10,
        }
    }
}

#[derive(Debug)]
pub struct ProcessSummary {
    pub report: WriteReport,
    pub skipped_documents: usize,
    pub skipped_queries: usize,
    pub export: Option<ExportPaths>,
}

pub struct App {
    config: AppConfig,
    store: VersionStore<SurrealDbClient>,
    pipeline: TextPipeline,
}

impl App {
    pub fn new(config: AppConfig, db: SurrealDbClient) -> Self {
        let store = VersionStore::with_prefix(Arc::new(db), config.collection_prefix.clone());
        let pipeline = TextPipeline::new(PipelineConfig::from(&config));
        Self {
            config,
            store,
            pipeline,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[tracing::instrument(skip_all, fields(dataset = kind.id()))]
    pub async fn process_dataset(
        &self,
        kind: DatasetKind,
        options: &ProcessOptions,
    ) -> Result<ProcessSummary> {
        let source = kind.open(Path::new(&self.config.datasets_dir));

        let documents = source
            .documents()
            .with_context(|| format!("loading documents for {}", kind.id()))?;
        info!(documents = documents.len(), "Loaded raw documents");
        let documents = preprocess_batch(&self.pipeline, documents);
        report_failures("document", &documents);

        if documents.processed.is_empty() {
            bail!(
                "No documents of {} were processed successfully ({} failed)",
                kind.id(),
                documents.failures.len()
            );
        }

        print_preview(&documents.processed, options.preview);

        let mut version = NewVersion::new(
            source.dataset_id(),
            documents
                .processed
                .iter()
                .cloned()
                .map(|doc| doc.into_stored(options.keep_original))
                .collect(),
        );
        if let Some(name) = options.version_name.as_deref() {
            version = version.with_version_name(name);
        }

        let mut skipped_queries = 0;
        if options.with_queries {
            let queries = source
                .queries()
                .with_context(|| format!("loading queries for {}", kind.id()))?;
            let queries = preprocess_batch(&self.pipeline, queries);
            report_failures("query", &queries);
            skipped_queries = queries.failures.len();

            let qrels = source
                .qrels()
                .with_context(|| format!("loading qrels for {}", kind.id()))?;
            version = version.with_queries(queries.processed).with_qrels(qrels);
        }

        let report = self
            .store
            .write(version)
            .await
            .with_context(|| format!("saving processed {} to the store", kind.id()))?;

        let export = if options.export {
            Some(
                export_version(
                    Path::new(&self.config.data_dir),
                    &report.version_id,
                    self.store.prefix(),
                    &documents.processed,
                )
                .with_context(|| format!("exporting {}", report.version_id))?,
            )
        } else {
            None
        };

        Ok(ProcessSummary {
            report,
            skipped_documents: documents.failures.len(),
            skipped_queries,
            export,
        })
    }

    pub async fn list_versions(&self) -> Result<Vec<String>> {
        self.store.list_versions().await.context("listing versions")
    }

    pub async fn show_version(&self, version_id: &str, limit: usize) -> Result<VersionStats> {
        self.store
            .stat(version_id, limit)
            .await
            .with_context(|| format!("reading version {version_id}"))
    }

    pub async fn delete_version(&self, version_id: &str) -> Result<DeleteOutcome> {
        self.store
            .delete(version_id)
            .await
            .with_context(|| format!("deleting version {version_id}"))
    }

    pub async fn delete_all_versions(&self) -> Result<usize> {
        self.store.delete_all().await.context("deleting all versions")
    }
}

fn report_failures(kind: &str, outcome: &BatchOutcome) {
    if outcome.is_clean() {
        return;
    }
    println!(
        "Skipped {} of {} {kind} records:",
        outcome.failures.len(),
        outcome.attempted()
    );
    for failure in &outcome.failures {
        println!("  - {failure}");
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

pub fn print_preview(documents: &[ProcessedRecord], count: usize) {
    if count == 0 {
        return;
    }
    println!("\n=== First {count} Processed Documents ===");
    for (position, doc) in documents.iter().take(count).enumerate() {
        println!("\n#{} Doc ID: {}", position + 1, doc.id);
        println!("--- Original Text ---\n{}...\n", truncate(&doc.original_text));
        println!("--- Processed Text ---\n{}...", truncate(&doc.processed_text));
        println!("{}", "-".repeat(RULE_WIDTH));
    }
}

pub fn print_summary(summary: &ProcessSummary) {
    let report = &summary.report;
    println!("\nProcessed data saved to version: {}", report.version_id);
    println!(
        "Documents: {} | Queries: {} | Qrels: {}",
        report.documents_written, report.queries_written, report.qrels_written
    );
    if summary.skipped_documents > 0 || summary.skipped_queries > 0 {
        println!(
            "Skipped during preprocessing: {} documents, {} queries",
            summary.skipped_documents, summary.skipped_queries
        );
    }
    if !report.is_complete() {
        println!(
            "Warning: {} records could not be stored: {}",
            report.failed_records.len(),
            report.failed_records.join(", ")
        );
    }
    if let Some(export) = &summary.export {
        println!("Saved local files:");
        for path in export.all() {
            println!("- {}", path.display());
        }
    }
}

pub fn print_versions(versions: &[String]) {
    for (position, version) in versions.iter().enumerate() {
        println!("{}. {version}", position + 1);
    }
}

pub fn print_stats(stats: &VersionStats) {
    println!("\nVersion: {}", stats.name);
    if let Some(dataset) = stats.dataset() {
        println!("Dataset: {dataset}");
    }
    if let Some(created_at) = stats.created_at() {
        println!("Created: {}", created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("Documents: {}", stats.document_count);
    println!("Queries: {}", stats.query_count);
    println!("Qrels: {}", stats.qrel_count);
    if stats.manifest.is_none() {
        println!("Warning: this version has no manifest, so its completeness is unknown.");
    } else if !stats.is_complete() {
        println!("Warning: this version holds fewer records than were intended.");
    }
    println!("\nSample documents:");
    for doc in &stats.sample {
        println!("Doc ID: {}", doc.doc_id);
        println!("Text: {}...", truncate(&doc.text));
        println!("{}", "-".repeat(50));
    }
}
