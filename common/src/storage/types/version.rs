use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::corpus_record::{ProcessedRecord, Qrel};

/// Tag stored in the `kind` field of every row inside a version collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Document,
    Query,
    Qrel,
    Manifest,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Query => "query",
            Self::Qrel => "qrel",
            Self::Manifest => "manifest",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two document shapes a caller may persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredDocument {
    WithOriginal(ProcessedRecord),
    ProcessedOnly { id: String, text: String },
}

/// Row layout written into a version collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoredRecord {
    Document {
        doc_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        original_text: Option<String>,
        text: String,
    },
    Query {
        query_id: String,
        original_text: String,
        text: String,
    },
    Qrel {
        query_id: String,
        doc_id: String,
        relevance: i32,
    },
    Manifest {
        dataset: String,
        created_at: DateTime<Utc>,
        expected_documents: usize,
        expected_queries: usize,
        expected_qrels: usize,
    },
}

impl StoredRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Document { .. } => RecordKind::Document,
            Self::Query { .. } => RecordKind::Query,
            Self::Qrel { .. } => RecordKind::Qrel,
            Self::Manifest { .. } => RecordKind::Manifest,
        }
    }

    /// Identifier used in diagnostics when an insert fails.
    pub fn label(&self) -> String {
        match self {
            Self::Document { doc_id, .. } => doc_id.clone(),
            Self::Query { query_id, .. } => query_id.clone(),
            Self::Qrel {
                query_id, doc_id, ..
            } => format!("{query_id}->{doc_id}"),
            Self::Manifest { dataset, .. } => format!("manifest:{dataset}"),
        }
    }
}

impl From<StoredDocument> for StoredRecord {
    fn from(document: StoredDocument) -> Self {
        match document {
            StoredDocument::WithOriginal(record) => Self::Document {
                doc_id: record.id,
                original_text: Some(record.original_text),
                text: record.processed_text,
            },
            StoredDocument::ProcessedOnly { id, text } => Self::Document {
                doc_id: id,
                original_text: None,
                text,
            },
        }
    }
}

impl From<ProcessedRecord> for StoredRecord {
    fn from(query: ProcessedRecord) -> Self {
        Self::Query {
            query_id: query.id,
            original_text: query.original_text,
            text: query.processed_text,
        }
    }
}

impl From<Qrel> for StoredRecord {
    fn from(qrel: Qrel) -> Self {
        Self::Qrel {
            query_id: qrel.query_id,
            doc_id: qrel.doc_id,
            relevance: qrel.relevance,
        }
    }
}

/// Document row as read back for samples.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentSample {
    pub doc_id: String,
    pub text: String,
    #[serde(default)]
    pub original_text: Option<String>,
}

/// Dataset tag, creation time and intended record counts of a version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionManifest {
    pub dataset: String,
    pub created_at: DateTime<Utc>,
    pub expected_documents: usize,
    pub expected_queries: usize,
    pub expected_qrels: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_rows_omit_missing_original_text() {
        let row = StoredRecord::from(StoredDocument::ProcessedOnly {
            id: "d1".to_string(),
            text: "hello world".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"kind": "document", "doc_id": "d1", "text": "hello world"})
        );
    }

    #[test]
    fn qrel_rows_pass_relevance_through() {
        let row = StoredRecord::from(Qrel::new("q1", "d9", -1));

        assert_eq!(row.kind(), RecordKind::Qrel);
        assert_eq!(row.label(), "q1->d9");
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({"kind": "qrel", "query_id": "q1", "doc_id": "d9", "relevance": -1})
        );
    }

    #[test]
    fn query_rows_keep_both_texts() {
        let row = StoredRecord::from(ProcessedRecord {
            id: "q7".to_string(),
            original_text: "Why are cats?".to_string(),
            processed_text: "cat".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({
                "kind": "query",
                "query_id": "q7",
                "original_text": "Why are cats?",
                "text": "cat"
            })
        );
    }
}
