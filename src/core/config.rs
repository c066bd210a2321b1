//! Configuration types and management for lyrical-rs.
//!
//! Every field has a default, and the defaults describe the reference
//! extraction setup: the Flesch command-line scorer, aspell, the Stanford
//! tagger, and the three sidecar matrices in the working directory. A YAML
//! file only needs to mention what differs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{LyricalError, Result, ResultExt};
use crate::features::tool::ToolCommand;
use crate::io::sidecar::SidecarSpec;

/// Main configuration for the extraction engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LyricalConfig {
    /// Input directory handling
    pub input: InputConfig,

    /// External analysis tools
    pub tools: ToolsConfig,

    /// Precomputed matrices read row by row, in output order
    pub sidecars: Vec<SidecarSpec>,

    /// Output settings
    pub output: OutputConfig,
}

impl Default for LyricalConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            tools: ToolsConfig::default(),
            sidecars: vec![
                SidecarSpec::new("Letter-bigram components", "bigram_components.dat"),
                SidecarSpec::new("Topic membership probabilities (10 topics)", "topics10.dat"),
                SidecarSpec::new("Topic membership probabilities (24 topics)", "topics24.dat"),
            ],
            output: OutputConfig::default(),
        }
    }
}

impl LyricalConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.tools.validate()?;

        for (index, sidecar) in self.sidecars.iter().enumerate() {
            if sidecar.name.trim().is_empty() {
                return Err(LyricalError::config_field(
                    format!("Sidecar #{} has an empty name", index + 1),
                    "sidecars",
                ));
            }
            if sidecar.path.as_os_str().is_empty() {
                return Err(LyricalError::config_field(
                    format!("Sidecar '{}' has an empty path", sidecar.name),
                    "sidecars",
                ));
            }
            if self.sidecars[..index].iter().any(|s| s.name == sidecar.name) {
                return Err(LyricalError::config_field(
                    format!("Sidecar name '{}' is used twice", sidecar.name),
                    "sidecars",
                ));
            }
        }

        if self.output.bigram_side_file.as_os_str().is_empty() {
            return Err(LyricalError::config_field(
                "Bigram side file path must not be empty",
                "output.bigram_side_file",
            ));
        }

        Ok(())
    }
}

/// Input directory handling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Directory entries skipped by exact file name
    pub excluded_names: Vec<String>,

    /// Process entries sorted by file name instead of raw listing order
    pub sort_entries: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            excluded_names: vec![".DS_Store".to_string()],
            sort_entries: false,
        }
    }
}

impl InputConfig {
    /// Whether a directory entry name is excluded
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded_names.iter().any(|name| name == file_name)
    }
}

/// External analysis tool commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolsConfig {
    /// Readability scorer, called with the document path
    pub readability: ToolCommand,

    /// Spell checker, fed the normalized lyrics on stdin
    pub spelling: ToolCommand,

    /// Part-of-speech tagger, called with the document path
    pub tagger: ToolCommand,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            readability: ToolCommand::new("readability", "java").with_args(["-jar", "CmdFlesh.jar"]),
            spelling: ToolCommand::new("spelling", "aspell").with_args(["-d", "en", "list"]),
            tagger: ToolCommand::new("tagger", "./stanford-postagger.sh")
                .with_args(["models/bidirectional-distsim-wsj-0-18.tagger"])
                .with_working_dir("stanford-postagger-2009-12-24"),
        }
    }
}

impl ToolsConfig {
    /// Validate tool commands
    pub fn validate(&self) -> Result<()> {
        for (field, tool) in [
            ("tools.readability", &self.readability),
            ("tools.spelling", &self.spelling),
            ("tools.tagger", &self.tagger),
        ] {
            if tool.program.trim().is_empty() {
                return Err(LyricalError::config_field(
                    "Tool program must not be empty",
                    field,
                ));
            }
        }
        Ok(())
    }

    /// Commands with their log names set to the config key when left blank
    pub fn named(&self) -> (ToolCommand, ToolCommand, ToolCommand) {
        let name = |tool: &ToolCommand, fallback: &str| {
            let mut tool = tool.clone();
            if tool.name.is_empty() {
                tool.name = fallback.to_string();
            }
            tool
        };
        (
            name(&self.readability, "readability"),
            name(&self.spelling, "spelling"),
            name(&self.tagger, "tagger"),
        )
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// File the per-document bigram vectors are appended to
    pub bigram_side_file: PathBuf,

    /// Text placed in the `<comments>` element of generated XML
    pub comments: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bigram_side_file: PathBuf::from("bigram_frequencies.dat"),
            comments: "Features extracted for SLAC".to_string(),
        }
    }
}
