use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use common::utils::config::AppConfig;

use crate::{commands::ProcessOptions, datasets::DatasetKind};

#[derive(Debug, Parser)]
#[command(
    name = "ir-corpus",
    about = "Preprocess IR benchmark corpora and manage stored versions"
)]
pub struct Cli {
    /// SurrealDB address (`mem://` runs an in-memory engine)
    #[arg(long, global = true)]
    pub db_address: Option<String>,

    /// Directory for exported version files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Root directory of the raw datasets
    #[arg(long, global = true)]
    pub datasets_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Preprocess a dataset and save it as a new version
    Process(ProcessArgs),
    /// List stored versions
    List,
    /// Show counts and sample documents of a version
    Show {
        version: String,
        /// Number of sample documents to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete a single version
    Delete { version: String },
    /// Delete every stored version
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Interactive menu (default)
    Menu,
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    #[arg(value_enum)]
    pub dataset: DatasetKind,

    /// Version name; defaults to a UTC timestamp
    #[arg(long)]
    pub version_name: Option<String>,

    /// Also preprocess and store queries and qrels
    #[arg(long)]
    pub with_queries: bool,

    /// Store original document text next to the processed text
    #[arg(long)]
    pub keep_original: bool,

    /// Skip writing local JSON/TSV/MSI files
    #[arg(long)]
    pub no_export: bool,

    /// Number of processed documents to preview
    #[arg(long, default_value_t = 10)]
    pub preview: usize,
}

impl From<&ProcessArgs> for ProcessOptions {
    fn from(args: &ProcessArgs) -> Self {
        Self {
            version_name: args.version_name.clone(),
            with_queries: args.with_queries,
            keep_original: args.keep_original,
            export: !args.no_export,
            preview: args.preview,
        }
    }
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(address) = &self.db_address {
            config.surrealdb_address.clone_from(address);
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.display().to_string();
        }
        if let Some(dir) = &self.datasets_dir {
            config.datasets_dir = dir.display().to_string();
        }
    }
}
