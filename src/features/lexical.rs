//! Lexical and statistical features computed locally from token sequences.
//!
//! Every function returns a vector of its declared width. Ratios use the
//! token count (or concatenated character count) as divisor and fall back to
//! all zeros when that divisor is zero.

use ahash::AHashSet;
use async_trait::async_trait;

use crate::core::categories::FUNCTION_WORDS;
use crate::core::document::{Document, PUNCTUATION};
use crate::core::errors::Result;
use crate::core::featureset::{FeatureDefinition, FeatureExtractor};

/// Width of the letter frequency vector (a to z)
pub const LETTER_COUNT: usize = 26;

/// Width of the punctuation frequency vector
pub const PUNCTUATION_COUNT: usize = 32;

/// Total number of tokens.
pub fn word_count(raw: &[String]) -> Vec<f64> {
    vec![raw.len() as f64]
}

/// Share of tokens falling into each function-word category.
pub fn function_word_frequencies(normalized: &[String]) -> Vec<f64> {
    FUNCTION_WORDS.frequencies(normalized.iter().map(String::as_str), normalized.len())
}

/// Mean character length of the tokens.
pub fn average_word_length(raw: &[String]) -> Vec<f64> {
    if raw.is_empty() {
        return vec![0.0];
    }
    let characters: usize = raw.iter().map(|token| token.chars().count()).sum();
    vec![characters as f64 / raw.len() as f64]
}

/// Share of each letter a to z in the concatenation of all tokens.
pub fn letter_frequencies(normalized: &[String]) -> Vec<f64> {
    let mut counts = [0usize; LETTER_COUNT];
    let mut total = 0usize;

    for c in normalized.iter().flat_map(|token| token.chars()) {
        total += 1;
        if c.is_ascii_lowercase() {
            counts[(c as u8 - b'a') as usize] += 1;
        }
    }

    if total == 0 {
        return vec![0.0; LETTER_COUNT];
    }

    counts
        .iter()
        .map(|&count| count as f64 / total as f64)
        .collect()
}

/// Mean per-token occurrence count of each ASCII punctuation symbol.
pub fn punctuation_frequencies(raw: &[String]) -> Vec<f64> {
    if raw.is_empty() {
        return vec![0.0; PUNCTUATION_COUNT];
    }

    let mut counts = [0usize; PUNCTUATION_COUNT];
    for c in raw.iter().flat_map(|token| token.chars()) {
        if let Some(slot) = PUNCTUATION.find(c) {
            counts[slot] += 1;
        }
    }

    counts
        .iter()
        .map(|&count| count as f64 / raw.len() as f64)
        .collect()
}

fn distinct_lowercase(normalized: &[String]) -> usize {
    normalized
        .iter()
        .map(|token| token.to_lowercase())
        .collect::<AHashSet<_>>()
        .len()
}

/// Number of distinct normalized tokens.
pub fn vocabulary_size(normalized: &[String]) -> Vec<f64> {
    vec![distinct_lowercase(normalized) as f64]
}

/// Distinct normalized tokens divided by the token count.
pub fn vocabulary_richness(normalized: &[String]) -> Vec<f64> {
    if normalized.is_empty() {
        return vec![0.0];
    }
    let distinct = normalized.iter().collect::<AHashSet<_>>().len();
    vec![distinct as f64 / normalized.len() as f64]
}

/// Extractor bundling the seven local lexical features.
pub struct LexicalExtractor {
    feature_definitions: Vec<FeatureDefinition>,
}

impl LexicalExtractor {
    /// Create the extractor with its fixed feature list.
    pub fn new() -> Self {
        let feature_definitions = vec![
            FeatureDefinition::new("Word count", "The total number of words in the lyrics."),
            FeatureDefinition::new(
                "Function word frequencies",
                "The fraction of words belonging to each of the 50 most common English \
                 function word groups.",
            )
            .with_dimensions(FUNCTION_WORDS.len()),
            FeatureDefinition::new(
                "Average word length",
                "The mean number of characters per whitespace-delimited word.",
            ),
            FeatureDefinition::new(
                "Letter frequencies",
                "The fraction of characters in the normalized lyrics that are each letter a to z.",
            )
            .with_dimensions(LETTER_COUNT),
            FeatureDefinition::new(
                "Punctuation frequencies",
                "The mean number of occurrences per word of each ASCII punctuation symbol.",
            )
            .with_dimensions(PUNCTUATION_COUNT),
            FeatureDefinition::new(
                "Vocabulary size",
                "The number of distinct words once punctuation and case are removed.",
            ),
            FeatureDefinition::new(
                "Vocabulary richness",
                "The number of distinct words divided by the total number of words.",
            ),
        ];

        Self {
            feature_definitions,
        }
    }
}

impl Default for LexicalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureExtractor for LexicalExtractor {
    fn name(&self) -> &str {
        "lexical"
    }

    fn features(&self) -> &[FeatureDefinition] {
        &self.feature_definitions
    }

    async fn extract(&self, document: &Document) -> Result<Vec<Vec<f64>>> {
        let raw = &document.raw_tokens;
        let normalized = &document.normalized_tokens;

        Ok(vec![
            word_count(raw),
            function_word_frequencies(normalized),
            average_word_length(raw),
            letter_frequencies(normalized),
            punctuation_frequencies(raw),
            vocabulary_size(normalized),
            vocabulary_richness(normalized),
        ])
    }
}
