//! Process-wide linguistic resources, built once and shared read-only.

use std::collections::HashSet;

use once_cell::sync::OnceCell;
use rust_stemmers::{Algorithm, Stemmer};
use tracing::debug;

use crate::lemmatizer::Lemmatizer;

static RESOURCES: OnceCell<LinguisticResources> = OnceCell::new();

/// English stopword list (the 179 entries shipped with NLTK).
const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't",
    "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't", "wasn", "wasn't",
    "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

pub struct LinguisticResources {
    stopwords: HashSet<&'static str>,
    lemmatizer: Lemmatizer,
    stemmer: Stemmer,
}

impl LinguisticResources {
    /// The shared instance, initialized on first use.
    pub fn global() -> &'static Self {
        RESOURCES.get_or_init(|| {
            debug!("Loading linguistic resources");
            Self::english()
        })
    }

    fn english() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS.iter().copied().collect(),
            lemmatizer: Lemmatizer::english(),
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    pub fn lemmatize<'a>(&self, token: &'a str) -> std::borrow::Cow<'a, str> {
        self.lemmatizer.lemmatize(token)
    }

    pub fn stem<'a>(&self, token: &'a str) -> std::borrow::Cow<'a, str> {
        self.stemmer.stem(token)
    }
}
