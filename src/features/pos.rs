//! Part-of-speech frequencies from an external tagger.
//!
//! The tagger emits whitespace-separated `token_TAG` pairs. Fine-grained Penn
//! Treebank tags are collapsed into the 20 coarse groups of
//! [`TREEBANK_TAGS`], and each group's frequency is its share of all pairs.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::categories::TREEBANK_TAGS;
use crate::core::document::Document;
use crate::core::errors::Result;
use crate::core::featureset::{FeatureDefinition, FeatureExtractor};
use crate::features::tool::{ToolInput, ToolInvoker};

/// Separator between a token and its tag in tagger output
pub const TAG_SEPARATOR: char = '_';

/// Tag of one `token_TAG` pair: the text after the last separator, or empty.
pub fn tag_of(pair: &str) -> &str {
    pair.rsplit_once(TAG_SEPARATOR)
        .map(|(_, tag)| tag)
        .unwrap_or("")
}

/// Coarse tag-group frequencies over a tagger's raw output.
pub fn pos_frequencies(output: &str) -> Vec<f64> {
    let pairs: Vec<&str> = output.split_whitespace().collect();
    TREEBANK_TAGS.frequencies(pairs.iter().map(|pair| tag_of(pair)), pairs.len())
}

/// Extractor running the tagger on a document file.
pub struct PosExtractor {
    tool: Arc<dyn ToolInvoker>,
    feature_definitions: Vec<FeatureDefinition>,
}

impl PosExtractor {
    /// Create the extractor around a tagger invocation
    pub fn new(tool: Arc<dyn ToolInvoker>) -> Self {
        Self {
            tool,
            feature_definitions: vec![FeatureDefinition::new(
                "Part-of-speech frequencies",
                "The fraction of tagged words falling into each of 20 coarse Penn Treebank \
                 part-of-speech groups.",
            )
            .with_dimensions(TREEBANK_TAGS.len())],
        }
    }
}

#[async_trait]
impl FeatureExtractor for PosExtractor {
    fn name(&self) -> &str {
        "part_of_speech"
    }

    fn features(&self) -> &[FeatureDefinition] {
        &self.feature_definitions
    }

    async fn extract(&self, document: &Document) -> Result<Vec<Vec<f64>>> {
        if document.is_empty() {
            return Ok(vec![vec![0.0; TREEBANK_TAGS.len()]]);
        }

        let output = self.tool.invoke(ToolInput::path(&document.path)).await?;
        Ok(vec![pos_frequencies(&output)])
    }
}
