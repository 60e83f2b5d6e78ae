use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use common::{
    error::AppError,
    storage::types::{Qrel, Record},
};

use super::{read_lossy_lines, CorpusSource, RawDocument};

/// ANTIQUE layout: `collection.tsv` plus `<split>/queries.tsv` and the
/// TREC-style `<split>/qrels` file (`qid iteration docid relevance`).
pub struct AntiqueSource {
    dataset: String,
    raw_dir: PathBuf,
    split: String,
}

impl AntiqueSource {
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

    fn split_dir(&self) -> PathBuf {
        self.raw_dir.join(&self.split)
    }

    fn read_pairs(&self, path: &Path) -> Result<Vec<Record>> {
        read_lossy_lines(path)?
            .into_iter()
            .map(|(line_number, line)| -> Result<Record> {
                let (id, text) = line.split_once('\t').ok_or_else(|| AppError::UnsupportedSchema {
                    dataset: self.dataset.clone(),
                    reason: format!(
                        "line {line_number} of {} is not an id<TAB>text pair",
                        path.display()
                    ),
                })?;
                Ok(RawDocument::Text {
                    id: id.trim().to_string(),
                    text: text.to_string(),
                }
                .into_record())
            })
            .collect()
    }
}

impl CorpusSource for AntiqueSource {
    fn dataset_id(&self) -> &str {
        &self.dataset
    }

    fn documents(&self) -> Result<Vec<Record>> {
        self.read_pairs(&self.raw_dir.join("collection.tsv"))
    }

    fn queries(&self) -> Result<Vec<Record>> {
        self.read_pairs(&self.split_dir().join("queries.tsv"))
    }

    fn qrels(&self) -> Result<Vec<Qrel>> {
        let path = self.split_dir().join("qrels");
        let mut qrels = Vec::new();

        for (line_number, raw) in read_lossy_lines(&path)? {
            let parts: Vec<&str> = raw.split_whitespace().collect();
            let [query_id, _iteration, doc_id, relevance] = parts.as_slice() else {
                return Err(anyhow!(
                    "expected 4 columns on line {line_number} of {}, found {}",
                    path.display(),
                    parts.len()
                ));
            };
            let relevance: i32 = relevance.parse().with_context(|| {
                format!(
                    "parsing relevance '{relevance}' on line {line_number} of {}",
                    path.display()
                )
            })?;
            qrels.push(Qrel::new(*query_id, *doc_id, relevance));
        }

        Ok(qrels)
    }
}
