//! Corpus source adapters: read raw benchmark files from disk and hand the
//! core uniform `(id, text)` records.

mod antique;
mod beir;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::ValueEnum;
use common::{
    error::AppError,
    storage::types::{Qrel, Record},
};

pub use antique::AntiqueSource;
pub use beir::BeirSource;

/// Separator placed between the two halves of a split document.
const FIELD_SEPARATOR: &str = " ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    #[value(name = "antique/test", alias = "antique")]
    AntiqueTest,
    #[value(name = "beir/quora/test", alias = "quora")]
    BeirQuoraTest,
}

impl DatasetKind {
    pub const ALL: [Self; 2] = [Self::AntiqueTest, Self::BeirQuoraTest];

    pub fn id(self) -> &'static str {
        match self {
            Self::AntiqueTest => "antique/test",
            Self::BeirQuoraTest => "beir/quora/test",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AntiqueTest => "ANTIQUE (test)",
            Self::BeirQuoraTest => "Quora (BEIR, test)",
        }
    }

    pub fn from_id(id: &str) -> Result<Self, AppError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id.trim())
            .ok_or_else(|| AppError::UnsupportedDataset(id.trim().to_string()))
    }

    /// Accept a 1-based position in [`DatasetKind::ALL`] or a dataset id.
    pub fn from_choice(choice: &str) -> Result<Self, AppError> {
        let choice = choice.trim();
        match choice.parse::<usize>() {
            Ok(position) => position
                .checked_sub(1)
                .and_then(|index| Self::ALL.get(index).copied())
                .ok_or_else(|| AppError::UnsupportedDataset(choice.to_string())),
            Err(_) => Self::from_id(choice),
        }
    }

    /// Directory under the datasets root holding this corpus.
    fn raw_dir(self, datasets_dir: &Path) -> PathBuf {
        match self {
            Self::AntiqueTest => datasets_dir.join("antique"),
            Self::BeirQuoraTest => datasets_dir.join("beir").join("quora"),
        }
    }

    pub fn open(self, datasets_dir: &Path) -> Box<dyn CorpusSource> {
        let raw_dir = self.raw_dir(datasets_dir);
        match self {
            Self::AntiqueTest => Box::new(AntiqueSource::new(self.id(), raw_dir, "test")),
            Self::BeirQuoraTest => Box::new(BeirSource::new(self.id(), raw_dir, "test")),
        }
    }
}

/// The three producers a dataset exposes to the core.
pub trait CorpusSource {
    fn dataset_id(&self) -> &str;

    fn documents(&self) -> Result<Vec<Record>>;

    fn queries(&self) -> Result<Vec<Record>>;

    fn qrels(&self) -> Result<Vec<Qrel>>;
}

/// Document shapes found in source corpora, resolved to a single `(id, text)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawDocument {
    Text {
        id: String,
        text: String,
    },
    TitleAbstract {
        id: String,
        title: String,
        abstract_text: String,
    },
}

impl RawDocument {
    pub fn into_record(self) -> Record {
        match self {
            Self::Text { id, text } => Record::new(id, text),
            Self::TitleAbstract {
                id,
                title,
                abstract_text,
            } => Record::new(id, format!("{title}{FIELD_SEPARATOR}{abstract_text}")),
        }
    }
}

/// Read a file line by line, replacing undecodable bytes with U+FFFD so a
/// single bad line surfaces later as a per-record failure instead of aborting the load.
fn read_lossy_lines(path: &Path) -> Result<Vec<(usize, String)>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buffer = Vec::new();
    let mut number = 0usize;

    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .with_context(|| format!("reading line {} from {}", number + 1, path.display()))?;
        if read == 0 {
            break;
        }
        number += 1;
        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }
        lines.push((number, line.to_string()));
    }

    Ok(lines)
}
