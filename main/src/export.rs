//! Local file dumps of a processed version: pretty JSON, TSV and a compact
//! JSON blob, all carrying `doc_id` and processed `text` only.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use common::{error::AppError, storage::types::ProcessedRecord};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    doc_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub json: PathBuf,
    pub tsv: PathBuf,
    pub msi: PathBuf,
}

impl ExportPaths {
    pub fn all(&self) -> [&Path; 3] {
        [&self.json, &self.tsv, &self.msi]
    }
}

/// Write the three dump formats under `data_dir/<version_id>/`.
pub fn export_version(
    data_dir: &Path,
    version_id: &str,
    prefix: &str,
    documents: &[ProcessedRecord],
) -> Result<ExportPaths, AppError> {
    let base_dir = data_dir.join(version_id);
    fs::create_dir_all(&base_dir)?;

    let base_name = version_id.strip_prefix(prefix).unwrap_or(version_id);
    let paths = ExportPaths {
        json: base_dir.join(format!("{base_name}.msi.json")),
        tsv: base_dir.join(format!("{base_name}.tsv")),
        msi: base_dir.join(format!("{base_name}.msi")),
    };

    let rows: Vec<ExportRow<'_>> = documents
        .iter()
        .map(|doc| ExportRow {
            doc_id: &doc.id,
            text: &doc.processed_text,
        })
        .collect();

    let mut json = BufWriter::new(File::create(&paths.json)?);
    serde_json::to_writer_pretty(&mut json, &rows)?;
    json.flush()?;

    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(&paths.tsv)?;
    for row in &rows {
        tsv.serialize(row)?;
    }
    tsv.flush()?;

    fs::write(&paths.msi, serde_json::to_vec(&rows)?)?;

    info!(
        version = %version_id,
        documents = rows.len(),
        directory = %base_dir.display(),
        "Exported version files"
    );
    Ok(paths)
}
