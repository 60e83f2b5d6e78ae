#![allow(clippy::missing_docs_in_private_items, clippy::result_large_err)]

pub mod batch;
pub mod lemmatizer;
pub mod normalizer;
pub mod pipeline;
pub mod resources;

pub use batch::{preprocess_batch, BatchOutcome, RecordFailure};
pub use normalizer::normalize;
pub use pipeline::{PipelineConfig, PipelineError, TextPipeline};
pub use resources::LinguisticResources;
