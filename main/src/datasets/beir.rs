use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use common::{
    error::AppError,
    storage::types::{Qrel, Record},
};
use serde::Deserialize;

use super::{read_lossy_lines, CorpusSource, RawDocument};

#[derive(Debug, Deserialize)]
struct BeirCorpusRow {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
}

impl BeirCorpusRow {
    /// A `text` field wins; otherwise a title plus abstract pair is accepted.
    fn into_raw(self, dataset: &str) -> Result<RawDocument, AppError> {
        match (self.text, self.title, self.abstract_text) {
            (Some(text), _, _) => Ok(RawDocument::Text { id: self.id, text }),
            (None, Some(title), Some(abstract_text)) => Ok(RawDocument::TitleAbstract {
                id: self.id,
                title,
                abstract_text,
            }),
            _ => Err(AppError::UnsupportedSchema {
                dataset: dataset.to_string(),
                reason: format!(
                    "document '{}' has neither a text field nor a title and abstract",
                    self.id
                ),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BeirQueryRow {
    #[serde(rename = "_id")]
    id: String,
    text: String,
}

/// BEIR layout: `corpus.jsonl`, `queries.jsonl` and `qrels/<split>.tsv`.
pub struct BeirSource {
    dataset: String,
    raw_dir: PathBuf,
    split: String,
}

impl BeirSource {
    pub fn new(
        dataset: impl Into<String>,
        raw_dir: impl Into<PathBuf>,
        split: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            raw_dir: raw_dir.into(),
            split: split.into(),
        }
    }

    fn qrels_path(&self) -> PathBuf {
        self.raw_dir.join("qrels").join(format!("{}.tsv", self.split))
    }
}

impl CorpusSource for BeirSource {
    fn dataset_id(&self) -> &str {
        &self.dataset
    }

    fn documents(&self) -> Result<Vec<Record>> {
        let path = self.raw_dir.join("corpus.jsonl");
        let mut documents = Vec::new();

        for (line_number, raw) in read_lossy_lines(&path)? {
            let row: BeirCorpusRow = serde_json::from_str(&raw).with_context(|| {
                format!("parsing corpus JSON on line {line_number} from {}", path.display())
            })?;
            documents.push(row.into_raw(&self.dataset)?.into_record());
        }

        Ok(documents)
    }

    fn queries(&self) -> Result<Vec<Record>> {
        let path = self.raw_dir.join("queries.jsonl");
        let mut queries = Vec::new();

        for (line_number, raw) in read_lossy_lines(&path)? {
            let row: BeirQueryRow = serde_json::from_str(&raw).with_context(|| {
                format!("parsing query JSON on line {line_number} from {}", path.display())
            })?;
            queries.push(Record::new(row.id, row.text));
        }

        Ok(queries)
    }

    fn qrels(&self) -> Result<Vec<Qrel>> {
        let path = self.qrels_path();
        load_qrels(&path)
    }
}

fn load_qrels(path: &Path) -> Result<Vec<Qrel>> {
    let mut qrels = Vec::new();

    for (line_number, raw) in read_lossy_lines(path)? {
        let trimmed = raw.trim();
        if trimmed.starts_with("query-id") {
            continue;
        }
        let mut parts = trimmed.split_whitespace();
        let query_id = parts
            .next()
            .ok_or_else(|| anyhow!("missing query id on line {line_number}"))?;
        let doc_id = parts
            .next()
            .ok_or_else(|| anyhow!("missing document id on line {line_number}"))?;
        let score_raw = parts
            .next()
            .ok_or_else(|| anyhow!("missing score on line {line_number}"))?;
        let relevance: i32 = score_raw.parse().with_context(|| {
            format!(
                "parsing qrels score '{score_raw}' on line {line_number} from {}",
                path.display()
            )
        })?;

        qrels.push(Qrel::new(query_id, doc_id, relevance));
    }

    Ok(qrels)
}
