//! Readability scores from an external Flesch scoring tool.
//!
//! The scorer prints a report whose numbers sit at fixed token positions once
//! decimal commas become points and `?` placeholders become `0`. The position
//! table below is the whole contract with the tool; if its report layout
//! changes, only [`parse_readability_output`] needs to follow.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::document::Document;
use crate::core::errors::{LyricalError, Result};
use crate::core::featureset::{FeatureDefinition, FeatureExtractor};
use crate::features::tool::{ToolInput, ToolInvoker};

/// Token positions read from the normalized report, in field order.
pub const REPORT_POSITIONS: [usize; 6] = [3, 8, 10, 12, 17, 22];

/// The six fields picked out of one readability report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadabilityScores {
    /// Flesch-Kincaid grade level
    pub grade_level: f64,
    /// Flesch reading ease
    pub reading_ease: f64,
    /// Number of sentences
    pub sentence_count: f64,
    /// Field between sentence count and syllables; its meaning is undocumented
    /// so it is kept verbatim and never emitted.
    pub unlabelled: String,
    /// Average syllables per word
    pub syllables_per_word: f64,
    /// Average words per sentence
    pub words_per_sentence: f64,
}

impl ReadabilityScores {
    /// All-zero scores used for empty documents
    pub fn zero() -> Self {
        Self {
            grade_level: 0.0,
            reading_ease: 0.0,
            sentence_count: 0.0,
            unlabelled: String::new(),
            syllables_per_word: 0.0,
            words_per_sentence: 0.0,
        }
    }

    /// Emitted values, one block per feature, in feature order
    pub fn blocks(&self) -> Vec<Vec<f64>> {
        vec![
            vec![self.grade_level],
            vec![self.reading_ease],
            vec![self.sentence_count],
            vec![self.syllables_per_word],
            vec![self.words_per_sentence],
        ]
    }
}

fn report_field<'a>(tool: &str, tokens: &[&'a str], slot: usize) -> Result<&'a str> {
    let position = REPORT_POSITIONS[slot];
    tokens.get(position).copied().ok_or_else(|| {
        LyricalError::external_tool(
            tool,
            format!(
                "report has {} tokens, expected at least {}",
                tokens.len(),
                position + 1
            ),
        )
    })
}

fn report_number(tool: &str, tokens: &[&str], slot: usize) -> Result<f64> {
    let token = report_field(tool, tokens, slot)?;
    token.parse::<f64>().map_err(|_| {
        LyricalError::external_tool(
            tool,
            format!(
                "expected a number at report position {}, found '{}'",
                REPORT_POSITIONS[slot], token
            ),
        )
    })
}

/// Pick the six report fields out of the scorer's raw output.
pub fn parse_readability_output(tool: &str, output: &str) -> Result<ReadabilityScores> {
    let normalized = output.replace(',', ".").replace('?', "0");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    Ok(ReadabilityScores {
        grade_level: report_number(tool, &tokens, 0)?,
        reading_ease: report_number(tool, &tokens, 1)?,
        sentence_count: report_number(tool, &tokens, 2)?,
        unlabelled: report_field(tool, &tokens, 3)?.to_string(),
        syllables_per_word: report_number(tool, &tokens, 4)?,
        words_per_sentence: report_number(tool, &tokens, 5)?,
    })
}

/// Extractor producing the five readability features from one tool call.
pub struct ReadabilityExtractor {
    tool: Arc<dyn ToolInvoker>,
    feature_definitions: Vec<FeatureDefinition>,
}

impl ReadabilityExtractor {
    /// Create the extractor around a scorer invocation
    pub fn new(tool: Arc<dyn ToolInvoker>) -> Self {
        let feature_definitions = vec![
            FeatureDefinition::new(
                "Flesch-Kincaid grade level",
                "The U.S. school grade level at which the lyrics are readable.",
            ),
            FeatureDefinition::new(
                "Flesch reading ease",
                "Flesch reading ease score; higher values are easier to read.",
            ),
            FeatureDefinition::new("Sentence count", "The number of sentences in the lyrics."),
            FeatureDefinition::new(
                "Average syllable count per word",
                "The mean number of syllables per word.",
            ),
            FeatureDefinition::new(
                "Average sentence length",
                "The mean number of words per sentence.",
            ),
        ];

        Self {
            tool,
            feature_definitions,
        }
    }

    /// Score a document. Empty documents score zero without calling the tool.
    pub async fn score(&self, document: &Document) -> Result<ReadabilityScores> {
        if document.is_empty() {
            return Ok(ReadabilityScores::zero());
        }

        let output = self.tool.invoke(ToolInput::path(&document.path)).await?;
        parse_readability_output(self.tool.tool_name(), &output)
    }
}

#[async_trait]
impl FeatureExtractor for ReadabilityExtractor {
    fn name(&self) -> &str {
        "readability"
    }

    fn features(&self) -> &[FeatureDefinition] {
        &self.feature_definitions
    }

    async fn extract(&self, document: &Document) -> Result<Vec<Vec<f64>>> {
        Ok(self.score(document).await?.blocks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tool::testing::CannedTool;

    // Numbers sit at token positions 3, 8, 10, 12, 17 and 22.
    const REPORT: &str = "Flesch report grade: 4,5 \n ease index is : 81,2 sentences: 3 x: ? a b c d: 1,25 e f g h: 6,67";

    #[test]
    fn test_parse_fixed_positions() {
        let scores = parse_readability_output("readability", REPORT).unwrap();

        assert_eq!(scores.grade_level, 4.5);
        assert_eq!(scores.reading_ease, 81.2);
        assert_eq!(scores.sentence_count, 3.0);
        assert_eq!(scores.unlabelled, "0");
        assert_eq!(scores.syllables_per_word, 1.25);
        assert_eq!(scores.words_per_sentence, 6.67);
    }

    #[test]
    fn test_parse_short_report_fails() {
        let err = parse_readability_output("readability", "only a few tokens").unwrap_err();
        assert!(matches!(err, LyricalError::ExternalTool { .. }));
    }

    #[test]
    fn test_parse_non_numeric_field_fails() {
        let broken = REPORT.replace("81,2", "high");
        let err = parse_readability_output("readability", &broken).unwrap_err();
        assert!(err.to_string().contains("'high'"));
    }

    #[tokio::test]
    async fn test_extractor_emits_five_blocks() {
        let tool = Arc::new(CannedTool::new(REPORT));
        let extractor = ReadabilityExtractor::new(tool.clone());
        let doc = Document::from_text("song", "/tmp/song.txt", "Hello there.");

        let blocks = extractor.extract(&doc).await.unwrap();
        extractor.validate_features(&blocks).unwrap();
        assert_eq!(blocks, vec![vec![4.5], vec![81.2], vec![3.0], vec![1.25], vec![6.67]]);
        assert_eq!(tool.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_document_skips_tool() {
        let tool = Arc::new(CannedTool::new(REPORT));
        let extractor = ReadabilityExtractor::new(tool.clone());
        let doc = Document::from_text("empty", "/tmp/empty.txt", "");

        let blocks = extractor.extract(&doc).await.unwrap();
        assert!(blocks.iter().flatten().all(|&v| v == 0.0));
        assert_eq!(tool.call_count(), 0);
    }
}
