use common::utils::config::AppConfig;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

use crate::{normalizer::normalize, resources::LinguisticResources};

const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("input of {len} bytes exceeds the {max} byte limit")]
    InputTooLarge { len: usize, max: usize },
    #[error("input contains undecodable bytes (U+FFFD)")]
    UndecodableInput,
    #[error("input contains a NUL character")]
    NulCharacter,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_input_bytes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 1024 * 1024,
        }
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_input_bytes: config.max_input_bytes,
        }
    }
}

/// normalize → segment → drop stopwords → lemmatize → stem → join.
pub struct TextPipeline {
    config: PipelineConfig,
    resources: &'static LinguisticResources,
}

impl Default for TextPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl TextPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            resources: LinguisticResources::global(),
        }
    }

    /// Run the full pipeline and join the surviving tokens with single spaces.
    pub fn process(&self, raw: &str) -> Result<String, PipelineError> {
        Ok(self.tokens(raw)?.join(" "))
    }

    pub fn tokens(&self, raw: &str) -> Result<Vec<String>, PipelineError> {
        self.validate(raw)?;

        let normalized = normalize(raw);
        let tokens = normalized
            .unicode_words()
            .filter(|word| !self.resources.is_stopword(word))
            .map(|word| {
                let lemma = self.resources.lemmatize(word);
                self.resources.stem(&lemma).into_owned()
            })
            .collect();

        Ok(tokens)
    }

    fn validate(&self, raw: &str) -> Result<(), PipelineError> {
        if raw.len() > self.config.max_input_bytes {
            return Err(PipelineError::InputTooLarge {
                len: raw.len(),
                max: self.config.max_input_bytes,
            });
        }
        if raw.contains(REPLACEMENT_CHARACTER) {
            return Err(PipelineError::UndecodableInput);
        }
        if raw.contains('\0') {
            return Err(PipelineError::NulCharacter);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn runs_every_stage_in_order() {
        let pipeline = TextPipeline::default();

        assert_eq!(
            pipeline
                .process("The children are running in the gardens!")
                .unwrap(),
            "child run garden"
        );
        assert_eq!(pipeline.process("Hello, World").unwrap(), "hello world");
    }

    #[test]
    fn collapses_elongated_words_before_stemming() {
        let pipeline = TextPipeline::default();

        assert_eq!(
            pipeline.tokens("Sooo many cats!!!").unwrap(),
            vec!["soo".to_string(), "mani".to_string(), "cat".to_string()]
        );
    }

    #[test]
    fn stopword_only_input_yields_empty_string() {
        let pipeline = TextPipeline::default();

        assert_eq!(pipeline.process("The and of to it is was").unwrap(), "");
        assert_eq!(pipeline.process("").unwrap(), "");
        assert_eq!(pipeline.process("1234 !!!").unwrap(), "");
    }

    #[test]
    fn rejects_undecodable_and_oversized_input() {
        let pipeline = TextPipeline::new(PipelineConfig { max_input_bytes: 8 });

        assert_eq!(
            pipeline.process("ab\u{FFFD}"),
            Err(PipelineError::UndecodableInput)
        );
        assert_eq!(
            pipeline.process("way too long"),
            Err(PipelineError::InputTooLarge { len: 12, max: 8 })
        );
        assert_eq!(pipeline.process("a\0b"), Err(PipelineError::NulCharacter));
    }

    proptest! {
        #[test]
        fn processing_is_deterministic(input in "[ -~]{0,120}") {
            let first = TextPipeline::default().process(&input);
            let second = TextPipeline::default().process(&input);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn output_is_single_space_separated(input in "[a-zA-Z .,]{0,120}") {
            let output = TextPipeline::default().process(&input).unwrap();
            prop_assert!(!output.starts_with(' '));
            prop_assert!(!output.ends_with(' '));
            prop_assert!(!output.contains("  "));
        }
    }
}
