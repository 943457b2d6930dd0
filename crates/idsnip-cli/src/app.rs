//! CLI application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use idsnip_deps::{
    cleanup_orphans, export_selection, find_missing, find_orphans, validate_references,
    CleanupOptions, Selection,
};
use idsnip_idml::template::blank_package;
use idsnip_idml::Package;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "idsnip")]
#[command(author, version, about = "Carve minimal snippets out of IDML packages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export selected stories and page items as a standalone package
    Export {
        /// Input IDML file
        input: PathBuf,

        /// Output IDML file
        #[arg(short, long, default_value = "snippet.idml")]
        output: PathBuf,

        /// Story identifier(s) to export
        #[arg(short, long)]
        story: Vec<String>,

        /// Page item identifier(s) to export
        #[arg(short, long)]
        frame: Vec<String>,
    },

    /// List defined-but-unused resources
    Orphans {
        /// Input IDML file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short = 'F', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List referenced-but-undefined resources and where they are used
    Missing {
        /// Input IDML file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short = 'F', long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Create default definitions for every missing resource
        #[arg(long)]
        create_defaults: bool,

        /// Output IDML file when creating defaults (defaults to input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check every internal reference for dangling targets
    Validate {
        /// Input IDML file
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short = 'F', long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Exit with an error code if any issue is found
        #[arg(long)]
        strict: bool,
    },

    /// Remove orphaned resource definitions
    Cleanup {
        /// Input IDML file
        input: PathBuf,

        /// Write the cleaned package (without this flag, only report)
        #[arg(long)]
        apply: bool,

        /// Output IDML file (defaults to input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave style definitions alone
        #[arg(long)]
        keep_styles: bool,

        /// Leave colors and swatches alone
        #[arg(long)]
        keep_colors: bool,

        /// Leave font families alone
        #[arg(long)]
        keep_fonts: bool,

        /// Output format (text or json)
        #[arg(short = 'F', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Scaffold a blank package
    New {
        /// Output IDML file
        output: PathBuf,

        /// Document identifier
        #[arg(long, default_value = "d1")]
        id: String,
    },
}

/// Run the CLI application
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            story,
            frame,
        } => export_command(&input, &output, &story, &frame),
        Commands::Orphans { input, format } => orphans_command(&input, format),
        Commands::Missing {
            input,
            format,
            create_defaults,
            output,
        } => missing_command(&input, format, create_defaults, output.as_deref()),
        Commands::Validate {
            input,
            format,
            strict,
        } => validate_command(&input, format, strict),
        Commands::Cleanup {
            input,
            apply,
            output,
            keep_styles,
            keep_colors,
            keep_fonts,
            format,
        } => {
            let options = CleanupOptions {
                paragraph_styles: !keep_styles,
                character_styles: !keep_styles,
                object_styles: !keep_styles,
                colors: !keep_colors,
                fonts: !keep_fonts,
                dry_run: !apply,
            };
            cleanup_command(&input, &options, output.as_deref(), format)
        }
        Commands::New { output, id } => new_command(&output, &id),
    }
}

fn open_package(input: &Path) -> Result<Package> {
    Package::open(input).with_context(|| format!("Failed to open {}", input.display()))
}

/// Export selected stories and page items into a standalone package
pub fn export_command(
    input: &Path,
    output: &Path,
    stories: &[String],
    frames: &[String],
) -> Result<()> {
    let pkg = open_package(input)?;

    let mut selection = Selection::new();
    for id in stories {
        selection = selection.with_story(id.as_str());
    }
    for id in frames {
        selection = selection.with_frame(id.as_str());
    }

    let bytes = export_selection(&pkg, &selection)
        .with_context(|| format!("Failed to export selection from {}", input.display()))?;
    std::fs::write(output, bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Exported {} story(ies) and {} item(s) to {}",
        selection.stories.len(),
        selection.frames.len(),
        output.display()
    );
    Ok(())
}

/// Report defined-but-unused resources
pub fn orphans_command(input: &Path, format: OutputFormat) -> Result<()> {
    let pkg = open_package(input)?;
    let report = find_orphans(&pkg);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if report.is_empty() {
                println!("No orphaned resources.");
                return Ok(());
            }
            println!("{} orphaned resource(s):", report.len());
            for (kind, id) in report.entries() {
                println!("  {kind}: {id}");
            }
        }
    }
    Ok(())
}

/// Report referenced-but-undefined resources, optionally creating defaults
pub fn missing_command(
    input: &Path,
    format: OutputFormat,
    create_defaults: bool,
    output: Option<&Path>,
) -> Result<()> {
    let mut pkg = open_package(input)?;

    let report = if create_defaults {
        let report = idsnip_deps::create_missing_defaults(&mut pkg);
        let target = output.unwrap_or(input);
        pkg.write_to_file(target)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        report
    } else {
        find_missing(&pkg)
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            if report.is_empty() {
                println!("No missing resources.");
                return Ok(());
            }
            let verb = if create_defaults { "defaulted" } else { "missing" };
            println!("{} {verb} resource(s):", report.len());
            for missing in &report.missing {
                println!("  {}: {}", missing.kind, missing.id);
                for location in &missing.locations {
                    println!("    {} ({})", location.file, location.context);
                }
            }
        }
    }
    Ok(())
}

/// Check internal references for dangling targets
pub fn validate_command(input: &Path, format: OutputFormat, strict: bool) -> Result<()> {
    let pkg = open_package(input)?;
    let issues = validate_references(&pkg);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&issues)?);
        }
        OutputFormat::Text => {
            if issues.is_empty() {
                println!("All references are valid.");
            } else {
                println!("{} issue(s):", issues.len());
                for issue in &issues {
                    println!("  {}: {}", issue.file, issue.message);
                }
            }
        }
    }

    if strict && !issues.is_empty() {
        bail!("{} dangling reference(s) found", issues.len());
    }
    Ok(())
}

/// Remove orphaned resource definitions
pub fn cleanup_command(
    input: &Path,
    options: &CleanupOptions,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut pkg = open_package(input)?;
    let result = cleanup_orphans(&mut pkg, options);

    if !options.dry_run {
        let target = output.unwrap_or(input);
        pkg.write_to_file(target)
            .with_context(|| format!("Failed to write {}", target.display()))?;
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            if result.removed.is_empty() {
                println!("No orphaned resources.");
                return Ok(());
            }
            let verb = if result.dry_run { "Would remove" } else { "Removed" };
            println!("{verb} {} resource(s):", result.removed.len());
            for removed in &result.removed {
                println!("  {}: {} ({})", removed.kind, removed.id, removed.name);
            }
            if result.dry_run {
                println!("Run again with --apply to remove them.");
            }
        }
    }
    Ok(())
}

/// Scaffold a blank package
pub fn new_command(output: &Path, doc_id: &str) -> Result<()> {
    let pkg = blank_package(doc_id);
    pkg.write_to_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Created blank package {}", output.display());
    Ok(())
}
