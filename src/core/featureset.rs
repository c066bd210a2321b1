//! Feature extraction framework and data structures.
//!
//! This module provides the core abstractions for feature extraction: feature
//! definitions, the extractor trait shared by local and tool-backed features,
//! the ordered per-document feature vector, and the registry that runs every
//! extractor in declaration order.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::document::{Document, DocumentId};
use crate::core::errors::{LyricalError, Result};

/// Definition of a feature that can be extracted from a document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureDefinition {
    /// Unique name of the feature (also its output label)
    pub name: String,

    /// Human-readable description of what this feature measures
    pub description: String,

    /// Number of values per document, `None` when only known at runtime
    pub dimensions: Option<usize>,

    /// Whether the feature is computed per window rather than per document
    pub is_sequential: bool,
}

impl FeatureDefinition {
    /// Create a new single-valued feature definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            dimensions: Some(1),
            is_sequential: false,
        }
    }

    /// Set the fixed number of values this feature produces
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Mark the feature width as known only at runtime
    pub fn with_variable_dimensions(mut self) -> Self {
        self.dimensions = None;
        self
    }

    /// Check that a computed value list matches the declared width
    pub fn validate_values(&self, values: &[f64]) -> Result<()> {
        if let Some(expected) = self.dimensions {
            if values.len() != expected {
                return Err(LyricalError::validation_mismatch(
                    format!("Feature '{}' produced the wrong number of values", self.name),
                    self.name.clone(),
                    expected,
                    values.len(),
                ));
            }
        }

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(LyricalError::validation(format!(
                "Feature '{}' produced a non-finite value {}",
                self.name, bad
            )));
        }

        Ok(())
    }
}

/// The ordered feature record for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    /// Data set identifier (document id)
    pub data_set_id: DocumentId,

    /// Feature values keyed by name, in registry order
    pub features: IndexMap<String, Vec<f64>>,
}

impl FeatureVector {
    /// Create a new empty feature vector for a document
    pub fn new(data_set_id: impl Into<DocumentId>) -> Self {
        Self {
            data_set_id: data_set_id.into(),
            features: IndexMap::new(),
        }
    }

    /// Append a feature block. Re-adding a name replaces its values in place.
    pub fn add_feature(&mut self, name: impl Into<String>, values: Vec<f64>) -> &mut Self {
        self.features.insert(name.into(), values);
        self
    }

    /// Get a feature's values by name
    pub fn get_feature(&self, name: &str) -> Option<&[f64]> {
        self.features.get(name).map(Vec::as_slice)
    }

    /// Get the number of feature blocks in this vector
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Total number of scalar values across all blocks
    pub fn value_count(&self) -> usize {
        self.features.values().map(Vec::len).sum()
    }

    /// Feature names in output order
    pub fn feature_names(&self) -> impl Iterator<Item = &String> {
        self.features.keys()
    }
}

/// Trait for computing features from lyric documents.
///
/// Extractors declare their features up front; `extract` returns one value
/// list per declared feature, in declaration order. Purely local statistics
/// and external-tool adapters implement the same trait so the registry loop
/// treats them uniformly.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    /// Get the name of this extractor
    fn name(&self) -> &str;

    /// Get the list of features this extractor provides
    fn features(&self) -> &[FeatureDefinition];

    /// Compute the value lists for a document
    async fn extract(&self, document: &Document) -> Result<Vec<Vec<f64>>>;

    /// Get the definition of a specific feature
    fn get_feature_definition(&self, name: &str) -> Option<&FeatureDefinition> {
        self.features().iter().find(|f| f.name == name)
    }

    /// Validate that extracted blocks line up with the declared features
    fn validate_features(&self, blocks: &[Vec<f64>]) -> Result<()> {
        let definitions = self.features();
        if blocks.len() != definitions.len() {
            return Err(LyricalError::validation_mismatch(
                format!("Extractor '{}' returned the wrong number of features", self.name()),
                self.name(),
                definitions.len(),
                blocks.len(),
            ));
        }

        for (definition, values) in definitions.iter().zip(blocks) {
            definition.validate_values(values)?;
        }
        Ok(())
    }
}

/// Registry holding feature extractors in output order
#[derive(Default)]
pub struct FeatureExtractorRegistry {
    /// Registered extractors, in registration order
    extractors: Vec<Arc<dyn FeatureExtractor>>,
}

impl FeatureExtractorRegistry {
    /// Create a new registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a feature extractor. Rejects feature names already registered.
    pub fn register(&mut self, extractor: Arc<dyn FeatureExtractor>) -> Result<()> {
        for feature_def in extractor.features() {
            if self.get_feature_definition(&feature_def.name).is_some() {
                return Err(LyricalError::config_field(
                    format!("Duplicate feature name '{}'", feature_def.name),
                    extractor.name(),
                ));
            }
        }

        self.extractors.push(extractor);
        Ok(())
    }

    /// Get an extractor by name
    pub fn get_extractor(&self, name: &str) -> Option<Arc<dyn FeatureExtractor>> {
        self.extractors.iter().find(|e| e.name() == name).cloned()
    }

    /// Get all registered extractors, in order
    pub fn get_all_extractors(&self) -> impl Iterator<Item = &Arc<dyn FeatureExtractor>> {
        self.extractors.iter()
    }

    /// Get a feature definition by name
    pub fn get_feature_definition(&self, name: &str) -> Option<&FeatureDefinition> {
        self.get_all_feature_definitions().find(|f| f.name == name)
    }

    /// Get all feature definitions, in output order
    pub fn get_all_feature_definitions(&self) -> impl Iterator<Item = &FeatureDefinition> {
        self.extractors.iter().flat_map(|e| e.features().iter())
    }

    /// Number of registered extractors
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Run every extractor in order over a document.
    ///
    /// The first failing extractor aborts the whole document.
    pub async fn extract_all_features(&self, document: &Document) -> Result<FeatureVector> {
        let mut feature_vector = FeatureVector::new(document.id.clone());

        for extractor in &self.extractors {
            debug!(
                "Running extractor '{}' on document '{}'",
                extractor.name(),
                document.id
            );

            let blocks = extractor.extract(document).await?;
            extractor.validate_features(&blocks)?;

            for (definition, values) in extractor.features().iter().zip(blocks) {
                feature_vector.add_feature(definition.name.clone(), values);
            }
        }

        Ok(feature_vector)
    }
}
