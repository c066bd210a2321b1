//! CLI Argument Structures
//!
//! Command and argument definitions for the lyrical binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lyric feature extraction for music classification
#[derive(Parser)]
#[command(name = "lyrical")]
#[command(version = VERSION)]
#[command(about = "Extract lyric features into ACE XML feature vector files")]
#[command(long_about = "
Compute lexical, readability, spelling and part-of-speech features for every
lyrics file in a directory and write them as an ACE XML feature vector file.

Common Usage:

  # Extract features, XML on stdout
  lyrical extract ./lyrics > features.xml

  # Use custom tool commands and sidecar matrices
  lyrical extract --config lyrical.yml ./lyrics --out features.xml

  # Write the matching ACE feature key file
  lyrical definitions --out feature_key.xml

  # Show the features a run emits
  lyrical list-features
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract features for every document in a directory
    Extract(ExtractArgs),

    /// Write the ACE feature key file describing every emitted feature
    Definitions(DefinitionsArgs),

    /// List emitted features in output order
    #[command(name = "list-features")]
    ListFeatures(ListFeaturesArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Validate a lyrical configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Arguments for feature extraction
#[derive(Args)]
pub struct ExtractArgs {
    /// Directory of lyrics files, one song per file
    pub input: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the feature vector file here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for the feature key file
#[derive(Args)]
pub struct DefinitionsArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the feature key file here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Arguments for listing features
#[derive(Args)]
pub struct ListFeaturesArgs {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print definitions as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for configuration validation
#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Configuration file to validate
    pub config: PathBuf,
}
