use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_signal, MetricArg, OutputFormat, ReferenceArgs};
use crate::core::types::ReferenceName;
use crate::matching::aligner::Aligner;
use crate::report::overlay::{build_overlays, write_overlays};

#[derive(Args)]
pub struct OverlayArgs {
    /// Experimental signal file, or '-' for stdin
    pub input: PathBuf,

    #[command(flatten)]
    pub references: ReferenceArgs,

    /// Window error metric
    #[arg(long, value_enum, default_value = "squared")]
    pub metric: MetricArg,

    /// Only export the overlay for this reference
    #[arg(long = "reference")]
    pub reference: Option<String>,

    /// Output file (.json for JSON, .tsv for tab-delimited, otherwise CSV)
    #[arg(short, long, required = true)]
    pub output: PathBuf,
}

/// Execute overlay subcommand
///
/// # Errors
///
/// Returns an error if loading fails, the requested reference is unknown or
/// could not be aligned, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: OverlayArgs, _format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let references = args.references.load()?;
    let experimental = load_signal(&args.input)?;

    let only = args.reference.as_deref().map(ReferenceName::new);
    if let Some(name) = &only {
        if !references.contains(name) {
            anyhow::bail!("Reference '{name}' not found");
        }
    }

    let alignments = Aligner::new(args.metric.into())
        .with_parallel(true)
        .align(&experimental, &references);

    if verbose {
        for (name, error) in alignments.skipped() {
            eprintln!("Skipping {name}: {error}");
        }
    }

    let overlays = build_overlays(&experimental, &references, &alignments, only.as_ref());
    if overlays.is_empty() {
        anyhow::bail!("No reference could be aligned; nothing to export");
    }

    write_overlays(&args.output, &overlays)?;

    println!(
        "Wrote {} overlay(s) to {}",
        overlays.len(),
        args.output.display()
    );

    Ok(())
}
