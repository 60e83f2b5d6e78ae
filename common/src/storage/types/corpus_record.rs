use serde::{Deserialize, Serialize};

use super::version::StoredDocument;

/// A raw `(id, text)` pair as handed over by a corpus source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub text: String,
}

impl Record {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// A record after the linguistic pipeline ran over its text.
///
/// `processed_text` is derived from `original_text` once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub id: String,
    pub original_text: String,
    pub processed_text: String,
}

impl ProcessedRecord {
    pub fn new(record: Record, processed_text: String) -> Self {
        Self {
            id: record.id,
            original_text: record.text,
            processed_text,
        }
    }

    /// Pick the persisted document shape. The store never decides this itself.
    pub fn into_stored(self, keep_original: bool) -> StoredDocument {
        if keep_original {
            StoredDocument::WithOriginal(self)
        } else {
            StoredDocument::ProcessedOnly {
                id: self.id,
                text: self.processed_text,
            }
        }
    }
}

/// Relevance judgment. `relevance` is passed through exactly as the source supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qrel {
    pub query_id: String,
    pub doc_id: String,
    pub relevance: i32,
}

impl Qrel {
    pub fn new(query_id: impl Into<String>, doc_id: impl Into<String>, relevance: i32) -> Self {
        Self {
            query_id: query_id.into(),
            doc_id: doc_id.into(),
            relevance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed() -> ProcessedRecord {
        ProcessedRecord::new(
            Record::new("d1", "Running Dogs!"),
            "run dog".to_string(),
        )
    }

    #[test]
    fn into_stored_keeps_original_when_asked() {
        match processed().into_stored(true) {
            StoredDocument::WithOriginal(record) => {
                assert_eq!(record.original_text, "Running Dogs!");
                assert_eq!(record.processed_text, "run dog");
            }
            other => panic!("expected WithOriginal, got {other:?}"),
        }
    }

    #[test]
    fn into_stored_drops_original_by_request() {
        assert_eq!(
            processed().into_stored(false),
            StoredDocument::ProcessedOnly {
                id: "d1".to_string(),
                text: "run dog".to_string(),
            }
        );
    }
}
