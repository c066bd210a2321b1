//! Per-document extraction loop.
//!
//! For every document in the input directory the pipeline runs the registry,
//! appends the bigram vector to the side file, pulls one row from each
//! sidecar and hands the finished record to the writer. Everything happens in
//! sequence on the calling task; the first error ends the run.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::config::InputConfig;
use crate::core::document::Document;
use crate::core::errors::{LyricalError, Result};
use crate::core::featureset::{FeatureExtractorRegistry, FeatureVector};
use crate::features::bigram::bigram_line;
use crate::io::ace_xml::FeatureVectorWriter;
use crate::io::side_output::SideOutput;
use crate::io::sidecar::SidecarReader;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Documents written to the output
    pub documents: usize,
    /// Documents with no tokens at all
    pub empty_documents: usize,
    /// Directory entries skipped (excluded names, subdirectories)
    pub skipped_entries: usize,
}

/// The ordered extraction loop over one input directory
pub struct ExtractionPipeline {
    registry: FeatureExtractorRegistry,
    input: InputConfig,
}

impl ExtractionPipeline {
    /// Create a pipeline around a populated registry
    pub fn new(registry: FeatureExtractorRegistry, input: InputConfig) -> Self {
        Self { registry, input }
    }

    /// The registry the pipeline runs
    pub fn registry(&self) -> &FeatureExtractorRegistry {
        &self.registry
    }

    /// List the documents of a directory in processing order.
    ///
    /// Returns the document paths and the number of skipped entries.
    pub fn list_documents(&self, dir: &Path) -> Result<(Vec<PathBuf>, usize)> {
        if !dir.is_dir() {
            return Err(LyricalError::config_field(
                format!("Input is not a directory: {}", dir.display()),
                "input",
            ));
        }

        let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1);
        if self.input.sort_entries {
            walker = walker.sort_by_file_name();
        }

        let mut documents = Vec::new();
        let mut skipped = 0;
        for entry in walker {
            let entry = entry.map_err(|e| {
                let message = format!("Failed to list {}", dir.display());
                match e.into_io_error() {
                    Some(source) => LyricalError::io(message, source),
                    None => LyricalError::internal(message),
                }
            })?;

            let name = entry.file_name().to_string_lossy();
            if self.input.is_excluded(&name) {
                debug!("Skipping excluded entry {}", name);
                skipped += 1;
                continue;
            }
            if entry.file_type().is_dir() {
                warn!("Skipping subdirectory {}", entry.path().display());
                skipped += 1;
                continue;
            }

            documents.push(entry.into_path());
        }

        Ok((documents, skipped))
    }

    /// Compute the full record for one document.
    pub async fn process_document<R: Read>(
        &self,
        document: &Document,
        side_output: &mut SideOutput,
        sidecars: &mut [SidecarReader<R>],
    ) -> Result<FeatureVector> {
        let mut record = self.registry.extract_all_features(document).await?;

        side_output.append_line(&bigram_line(document))?;

        for sidecar in sidecars.iter_mut() {
            let row = sidecar.next_row()?;
            record.add_feature(sidecar.name().to_string(), row);
        }

        Ok(record)
    }

    /// Process every document of `dir`, writing one record per document.
    ///
    /// Sidecars must hold exactly one row per document; they are checked for
    /// leftover rows once the last document is written.
    pub async fn run<R: Read, W: Write>(
        &self,
        dir: &Path,
        writer: &mut FeatureVectorWriter<W>,
        side_output: &mut SideOutput,
        mut sidecars: Vec<SidecarReader<R>>,
    ) -> Result<RunSummary> {
        let (paths, skipped_entries) = self.list_documents(dir)?;
        info!(
            "Extracting features from {} documents in {}",
            paths.len(),
            dir.display()
        );

        let mut summary = RunSummary {
            skipped_entries,
            ..RunSummary::default()
        };

        for path in &paths {
            let document = Document::load(path).await?;
            debug!(
                "Processing '{}' ({} tokens)",
                document.id,
                document.token_count()
            );
            if document.is_empty() {
                summary.empty_documents += 1;
            }

            let record = self
                .process_document(&document, side_output, &mut sidecars)
                .await?;
            writer.write_record(&record)?;
            summary.documents += 1;
        }

        for sidecar in sidecars {
            sidecar.finish()?;
        }

        info!(
            "Wrote {} records ({} empty, {} entries skipped)",
            summary.documents, summary.empty_documents, summary.skipped_entries
        );
        Ok(summary)
    }
}
