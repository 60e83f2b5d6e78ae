use std::fmt;

use common::{
    error::AppError,
    storage::types::{ProcessedRecord, Record},
};
use tracing::{info, warn};

use crate::pipeline::{PipelineError, TextPipeline};

/// A record the pipeline refused, kept so callers can report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub id: String,
    pub error: PipelineError,
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.error)
    }
}

impl From<RecordFailure> for AppError {
    fn from(failure: RecordFailure) -> Self {
        AppError::RecordProcessing {
            id: failure.id,
            reason: failure.error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: Vec<ProcessedRecord>,
    pub failures: Vec<RecordFailure>,
}

impl BatchOutcome {
    pub fn attempted(&self) -> usize {
        self.processed.len().saturating_add(self.failures.len())
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Run the pipeline over every record, in order. A failing record is logged,
/// collected in [`BatchOutcome::failures`] and skipped; the rest of the batch continues.
pub fn preprocess_batch<I>(pipeline: &TextPipeline, records: I) -> BatchOutcome
where
    I: IntoIterator<Item = Record>,
{
    let mut outcome = BatchOutcome::default();

    for record in records {
        match pipeline.process(&record.text) {
            Ok(processed_text) => outcome
                .processed
                .push(ProcessedRecord::new(record, processed_text)),
            Err(error) => {
                warn!(
                    record_id = %record.id,
                    error = %error,
                    "Skipping record that failed preprocessing"
                );
                outcome.failures.push(RecordFailure {
                    id: record.id,
                    error,
                });
            }
        }
    }

    info!(
        processed = outcome.processed.len(),
        failed = outcome.failures.len(),
        "Batch preprocessing finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolates_a_failing_record() {
        let pipeline = TextPipeline::default();
        let records = vec![
            Record::new("r1", "Cats are running"),
            Record::new("r2", "bad \u{FFFD} bytes"),
            Record::new("r3", "Dogs were barking"),
        ];

        let outcome = preprocess_batch(&pipeline, records);

        assert_eq!(outcome.processed.len(), 2);
        assert_eq!(outcome.processed[0].id, "r1");
        assert_eq!(outcome.processed[0].original_text, "Cats are running");
        assert_eq!(outcome.processed[0].processed_text, "cat run");
        assert_eq!(outcome.processed[1].id, "r3");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].id, "r2");
        assert_eq!(outcome.attempted(), 3);

        let error: AppError = outcome.failures[0].clone().into();
        assert!(error.to_string().contains("r2"));
    }

    #[test]
    fn empty_and_all_failing_batches_yield_no_records() {
        let pipeline = TextPipeline::default();

        let empty = preprocess_batch(&pipeline, Vec::<Record>::new());
        assert!(empty.processed.is_empty());
        assert!(empty.is_clean());

        let failing = preprocess_batch(
            &pipeline,
            vec![Record::new("x", "\u{FFFD}"), Record::new("y", "\0")],
        );
        assert!(failing.processed.is_empty());
        assert_eq!(failing.failures.len(), 2);
    }
}
