use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_signal, signal_id, MetricArg, OutputFormat, ReferenceArgs};
use crate::matching::aligner::{Aligner, Alignments};

#[derive(Args)]
pub struct AlignArgs {
    /// Experimental signal file, or '-' for stdin
    pub input: PathBuf,

    #[command(flatten)]
    pub references: ReferenceArgs,

    /// Window error metric
    #[arg(long, value_enum, default_value = "squared")]
    pub metric: MetricArg,

    /// Disable parallel alignment
    #[arg(long)]
    pub serial: bool,
}

/// Execute align subcommand
///
/// # Errors
///
/// Returns an error if the input or references cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AlignArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let references = args.references.load()?;
    let experimental = load_signal(&args.input)?;
    let id = signal_id(&args.input);

    if verbose {
        eprintln!(
            "Aligning {id} ({} samples) against {} references",
            experimental.len(),
            references.len()
        );
    }

    let alignments = Aligner::new(args.metric.into())
        .with_parallel(!args.serial)
        .align(&experimental, &references);

    match format {
        OutputFormat::Text => print_text(&id, &alignments),
        OutputFormat::Json => print_json(&id, &alignments)?,
        OutputFormat::Tsv => print_tsv(&alignments),
    }

    Ok(())
}

fn print_text(id: &str, alignments: &Alignments) {
    println!("\n{id}\n");
    for entry in alignments {
        match &entry.outcome {
            Ok(result) => {
                let marker = if result.is_exact() { " (exact)" } else { "" };
                println!(
                    "   {}: offset {}, error {:.6}{marker}",
                    entry.name, result.best_offset, result.best_error
                );
            }
            Err(e) => println!("   {}: skipped, {e}", entry.name),
        }
    }
    println!();
}

fn print_json(id: &str, alignments: &Alignments) -> anyhow::Result<()> {
    let entries: Vec<serde_json::Value> = alignments
        .iter()
        .map(|entry| match &entry.outcome {
            Ok(result) => serde_json::json!({
                "reference": entry.name,
                "best_offset": result.best_offset,
                "best_error": result.best_error,
            }),
            Err(e) => serde_json::json!({
                "reference": entry.name,
                "skipped": e.to_string(),
            }),
        })
        .collect();

    let output = serde_json::json!({
        "signal": id,
        "alignments": entries,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(alignments: &Alignments) {
    println!("reference\tbest_offset\tbest_error\tskipped");
    for entry in alignments {
        match &entry.outcome {
            Ok(result) => println!(
                "{}\t{}\t{}\t",
                entry.name, result.best_offset, result.best_error
            ),
            Err(e) => println!("{}\t\t\t{e}", entry.name),
        }
    }
}
