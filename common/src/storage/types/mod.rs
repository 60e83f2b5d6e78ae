pub mod corpus_record;
pub mod version;

pub use corpus_record::{ProcessedRecord, Qrel, Record};
pub use version::{
    DocumentSample, RecordKind, StoredDocument, StoredRecord, VersionManifest,
};
