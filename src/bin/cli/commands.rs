//! Command execution for the lyrical binary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};
use tracing::info;

use lyrical_rs::{LyricalConfig, LyricalEngine};

use crate::cli::args::*;

/// Load configuration from a file, or the defaults when none is given
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<LyricalConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            LyricalConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => Ok(LyricalConfig::default()),
    }
}

fn open_output(path: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    })
}

/// Run feature extraction over one directory
pub async fn extract_command(args: ExtractArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref())?;
    let engine = LyricalEngine::new(config)?;

    let out = open_output(args.out.as_deref())?;
    let summary = engine.extract_directory(&args.input, out).await?;

    eprintln!(
        "{} {} documents ({} empty, {} entries skipped)",
        "Extracted features for".bright_green().bold(),
        summary.documents,
        summary.empty_documents,
        summary.skipped_entries
    );
    if let Some(path) = &args.out {
        eprintln!("   Feature vectors written to {}", path.display().cyan());
    }
    Ok(())
}

/// Write the ACE feature key file
pub async fn definitions_command(args: DefinitionsArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref())?;
    let engine = LyricalEngine::new(config)?;

    let out = open_output(args.out.as_deref())?;
    engine.write_definitions(out)?;

    if let Some(path) = &args.out {
        eprintln!(
            "{} {}",
            "Feature definitions written to".bright_green().bold(),
            path.display().cyan()
        );
    }
    Ok(())
}

/// List emitted features in output order
pub async fn list_features(args: ListFeaturesArgs) -> anyhow::Result<()> {
    let config = load_configuration(args.config.as_deref())?;
    let engine = LyricalEngine::new(config)?;
    let definitions = engine.feature_definitions()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct FeatureRow {
        feature: String,
        width: String,
        description: String,
    }

    let rows: Vec<FeatureRow> = definitions
        .iter()
        .map(|definition| FeatureRow {
            feature: definition.name.clone(),
            width: definition
                .dimensions
                .map_or_else(|| "variable".to_string(), |d| d.to_string()),
            description: definition.description.clone(),
        })
        .collect();

    println!("{}", "Emitted Features".bright_blue().bold());
    println!("   {} features per document", definitions.len());
    println!();

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
    Ok(())
}

/// Print the default configuration as YAML
pub async fn print_default_config() -> anyhow::Result<()> {
    println!("# Default lyrical configuration");
    println!("# Save this to a file and customize as needed");
    println!("# Usage: lyrical extract --config your-config.yml <DIR>");
    println!();

    let yaml = LyricalConfig::default().to_yaml_string()?;
    println!("{}", yaml);
    Ok(())
}

/// Validate a configuration file
pub async fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "Validating configuration:".bright_blue().bold(),
        args.config.display().cyan()
    );

    let config = load_configuration(Some(&args.config))?;

    println!("{}", "Configuration file is valid".bright_green().bold());
    println!();
    println!("   Readability: {}", config.tools.readability.display_command());
    println!("   Spelling:    {}", config.tools.spelling.display_command());
    println!("   Tagger:      {}", config.tools.tagger.display_command());
    for sidecar in &config.sidecars {
        println!("   Sidecar:     {} ({})", sidecar.name, sidecar.path.display());
    }
    println!(
        "   Side file:   {}",
        config.output.bigram_side_file.display()
    );
    Ok(())
}
