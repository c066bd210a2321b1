//! Main extraction engine implementation.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::config::{LyricalConfig, ToolsConfig};
use crate::core::errors::{LyricalError, Result};
use crate::core::featureset::{FeatureDefinition, FeatureExtractorRegistry};
use crate::core::pipeline::{ExtractionPipeline, RunSummary};
use crate::features::lexical::LexicalExtractor;
use crate::features::pos::PosExtractor;
use crate::features::readability::ReadabilityExtractor;
use crate::features::spelling::SpellingExtractor;
use crate::io::ace_xml::{write_feature_definitions, FeatureVectorWriter};
use crate::io::side_output::SideOutput;
use crate::io::sidecar::{self, SidecarReader, SidecarSpec};

/// Build the standard registry: lexical features, readability, spelling and
/// part-of-speech, in output order.
pub fn default_registry(tools: &ToolsConfig) -> Result<FeatureExtractorRegistry> {
    let (readability, spelling, tagger) = tools.named();

    let mut registry = FeatureExtractorRegistry::new();
    registry.register(Arc::new(LexicalExtractor::new()))?;
    registry.register(Arc::new(ReadabilityExtractor::new(Arc::new(readability))))?;
    registry.register(Arc::new(SpellingExtractor::new(Arc::new(spelling))))?;
    registry.register(Arc::new(PosExtractor::new(Arc::new(tagger))))?;
    Ok(registry)
}

/// Main lyric feature extraction engine
pub struct LyricalEngine {
    /// Per-document extraction loop
    pipeline: ExtractionPipeline,

    /// Engine configuration
    config: Arc<LyricalConfig>,
}

impl LyricalEngine {
    /// Create an engine with the standard extractors wired to the configured tools
    pub fn new(config: LyricalConfig) -> Result<Self> {
        let registry = default_registry(&config.tools)?;
        Self::with_registry(config, registry)
    }

    /// Create an engine around a caller-supplied registry
    pub fn with_registry(config: LyricalConfig, registry: FeatureExtractorRegistry) -> Result<Self> {
        config.validate()?;

        for spec in &config.sidecars {
            if registry.get_feature_definition(&spec.name).is_some() {
                return Err(LyricalError::config_field(
                    format!("Sidecar '{}' shadows a computed feature", spec.name),
                    "sidecars",
                ));
            }
        }

        info!(
            "Initialized extraction engine with {} extractors and {} sidecars",
            registry.len(),
            config.sidecars.len()
        );

        let pipeline = ExtractionPipeline::new(registry, config.input.clone());
        Ok(Self {
            pipeline,
            config: Arc::new(config),
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &LyricalConfig {
        &self.config
    }

    /// Extract features for every document in `dir`, streaming the feature
    /// vector file into `out`.
    ///
    /// Sidecars and the side file are opened before anything is written, so a
    /// missing matrix fails the run without producing partial output.
    pub async fn extract_directory<W: Write>(&self, dir: &Path, out: W) -> Result<RunSummary> {
        info!("Starting feature extraction: {}", dir.display());

        let sidecars = sidecar::open_all(&self.config.sidecars)?;
        let mut side_output = SideOutput::open_append(&self.config.output.bigram_side_file)?;
        let mut writer = FeatureVectorWriter::begin(out, &self.config.output.comments)?;

        let summary = self
            .pipeline
            .run(dir, &mut writer, &mut side_output, sidecars)
            .await?;
        writer.finish()?;

        debug!(
            "Appended {} lines to {}",
            side_output.lines_written(),
            self.config.output.bigram_side_file.display()
        );
        Ok(summary)
    }

    /// Definitions of every emitted feature, computed ones first.
    ///
    /// Sidecar widths come from their first row; a sidecar that cannot be read
    /// is declared with variable dimensions.
    pub fn feature_definitions(&self) -> Result<Vec<FeatureDefinition>> {
        let mut definitions: Vec<FeatureDefinition> = self
            .pipeline
            .registry()
            .get_all_feature_definitions()
            .cloned()
            .collect();

        for spec in &self.config.sidecars {
            definitions.push(sidecar_definition(spec)?);
        }
        Ok(definitions)
    }

    /// Write an ACE feature key file for [`Self::feature_definitions`]
    pub fn write_definitions<W: Write>(&self, out: W) -> Result<()> {
        let definitions = self.feature_definitions()?;
        write_feature_definitions(out, &definitions, &self.config.output.comments)
    }
}

fn sidecar_definition(spec: &SidecarSpec) -> Result<FeatureDefinition> {
    let definition = FeatureDefinition::new(
        spec.name.clone(),
        format!("Precomputed values read from {}", spec.path.display()),
    );

    let mut reader = match SidecarReader::open(spec) {
        Ok(reader) => reader,
        Err(LyricalError::Io { .. }) => {
            debug!("Sidecar '{}' unavailable, width unknown", spec.name);
            return Ok(definition.with_variable_dimensions());
        }
        Err(other) => return Err(other),
    };

    Ok(match reader.peek_width()? {
        Some(width) => definition.with_dimensions(width),
        None => definition.with_variable_dimensions(),
    })
}
