use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};

use crate::catalog::store::{ReferenceSet, ReferenceSignal};
use crate::cli::{OutputFormat, ReferenceArgs};
use crate::core::types::ReferenceName;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all references in a reference set
    List {
        #[command(flatten)]
        references: ReferenceArgs,
    },

    /// Show the samples of a single reference
    Show {
        /// Reference name
        #[arg(required = true)]
        name: String,

        #[command(flatten)]
        references: ReferenceArgs,
    },

    /// Freeze a directory of reference signals into a JSON catalog
    Export {
        /// Directory of reference signal files
        #[arg(required = true)]
        dir: PathBuf,

        /// Output catalog path
        #[arg(required = true)]
        output: PathBuf,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the reference set cannot be loaded or written, or a
/// requested reference does not exist.
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { references } => run_list(&references, format, verbose),
        CatalogCommands::Show { name, references } => run_show(&name, &references, format),
        CatalogCommands::Export { dir, output } => run_export(dir, output, verbose),
    }
}

fn summary(reference: &ReferenceSignal) -> (usize, Option<(f64, f64)>) {
    (reference.signal.len(), reference.signal.time_range())
}

fn run_list(
    references: &ReferenceArgs,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let set = references.load()?;

    if verbose {
        eprintln!("Loaded {} references", set.len());
    }

    match format {
        OutputFormat::Text => {
            let name_width = set
                .iter()
                .map(|r| r.name.as_str().len())
                .max()
                .unwrap_or(4)
                .max(4);

            println!("Reference Set ({} references)\n", set.len());
            println!(
                "{:<name_w$} {:>10} {:>12} {:>12}",
                "Name",
                "Samples",
                "Start",
                "End",
                name_w = name_width
            );
            println!("{}", "-".repeat(name_width + 37));

            for r in &set {
                let (samples, range) = summary(r);
                let (start, end) = range.map_or_else(
                    || ("-".to_string(), "-".to_string()),
                    |(s, e)| (format!("{s:.3}"), format!("{e:.3}")),
                );
                println!(
                    "{:<name_w$} {:>10} {:>12} {:>12}",
                    r.name,
                    samples,
                    start,
                    end,
                    name_w = name_width
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = set
                .iter()
                .map(|r| {
                    let (samples, range) = summary(r);
                    serde_json::json!({
                        "name": r.name,
                        "sample_count": samples,
                        "time_start": range.map(|(s, _)| s),
                        "time_end": range.map(|(_, e)| e),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("name\tsample_count\ttime_start\ttime_end");
            for r in &set {
                let (samples, range) = summary(r);
                let (start, end) = range.map_or_else(
                    || (String::new(), String::new()),
                    |(s, e)| (s.to_string(), e.to_string()),
                );
                println!("{}\t{}\t{}\t{}", r.name, samples, start, end);
            }
        }
    }

    Ok(())
}

fn run_show(name: &str, references: &ReferenceArgs, format: OutputFormat) -> anyhow::Result<()> {
    let set = references.load()?;
    let name = ReferenceName::new(name);
    let signal = set
        .get(&name)
        .with_context(|| format!("Reference '{name}' not found"))?;

    match format {
        OutputFormat::Text => {
            println!("Reference: {name}");
            println!("Samples:   {}", signal.len());
            if let Some((start, end)) = signal.time_range() {
                println!("Time:      {start} .. {end}");
            }
            println!("\n{:>12} {:>14}", "Time", "Intensity");
            println!("{}", "-".repeat(27));
            for sample in signal.samples() {
                println!("{:>12} {:>14}", sample.time, sample.intensity);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": name,
                "samples": signal,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("time\tintensity");
            for sample in signal.samples() {
                println!("{}\t{}", sample.time, sample.intensity);
            }
        }
    }

    Ok(())
}

#[allow(clippy::needless_pass_by_value)] // values from clap
fn run_export(dir: PathBuf, output: PathBuf, verbose: bool) -> anyhow::Result<()> {
    let set = ReferenceSet::load_from_dir(&dir)
        .with_context(|| format!("loading references from {}", dir.display()))?;

    if verbose {
        eprintln!("Loaded {} references from {}", set.len(), dir.display());
    }

    let json = set.to_json()?;
    std::fs::write(&output, json)?;

    println!("Exported {} references to {}", set.len(), output.display());

    Ok(())
}
