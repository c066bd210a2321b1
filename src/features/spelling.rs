//! Misspelling rate from an external spell checker.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::document::Document;
use crate::core::errors::Result;
use crate::core::featureset::{FeatureDefinition, FeatureExtractor};
use crate::features::tool::{ToolInput, ToolInvoker};

/// Extractor feeding the normalized lyrics to a checker that lists misspellings.
pub struct SpellingExtractor {
    tool: Arc<dyn ToolInvoker>,
    feature_definitions: Vec<FeatureDefinition>,
}

impl SpellingExtractor {
    /// Create the extractor around a spell checker invocation
    pub fn new(tool: Arc<dyn ToolInvoker>) -> Self {
        Self {
            tool,
            feature_definitions: vec![FeatureDefinition::new(
                "Rate of misspelling",
                "The number of words reported as misspelled divided by the total number of words.",
            )],
        }
    }

    /// Fraction of tokens the checker reports as misspelled.
    pub async fn misspelling_rate(&self, document: &Document) -> Result<f64> {
        if document.is_empty() {
            return Ok(0.0);
        }

        let text = document.normalized_tokens.join(" ");
        let output = self.tool.invoke(ToolInput::stdin(&text)).await?;
        let misspelled = output.split_whitespace().count();

        Ok(misspelled as f64 / document.token_count() as f64)
    }
}

#[async_trait]
impl FeatureExtractor for SpellingExtractor {
    fn name(&self) -> &str {
        "spelling"
    }

    fn features(&self) -> &[FeatureDefinition] {
        &self.feature_definitions
    }

    async fn extract(&self, document: &Document) -> Result<Vec<Vec<f64>>> {
        Ok(vec![vec![self.misspelling_rate(document).await?]])
    }
}
