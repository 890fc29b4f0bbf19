use std::path::PathBuf;

use clap::Args;

use crate::cli::{load_signal, signal_id, MetricArg, OutputFormat, ReferenceArgs};
use crate::core::signal::Signal;
use crate::matching::engine::{MatchResult, MatchingConfig, MatchingEngine};
use crate::matching::normalizer::RankingKind;
use crate::report::writer::{ReportRow, ReportWriter};

#[derive(Args)]
pub struct IdentifyArgs {
    /// Experimental signal files (CSV/TSV with Time and Intensity columns)
    /// Use '-' for stdin
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[command(flatten)]
    pub references: ReferenceArgs,

    /// Window error metric
    #[arg(long, value_enum, default_value = "squared")]
    pub metric: MetricArg,

    /// Append the top two candidates per signal to this report
    /// (tab-delimited for .tsv, comma-delimited otherwise)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Disable parallel alignment
    #[arg(long)]
    pub serial: bool,
}

/// Outcome for one experimental signal
enum Outcome<'a> {
    Matched(&'a MatchResult),
    Failed(String),
}

/// Execute identify subcommand
///
/// Every input is processed even if some fail; the command fails at the end
/// if any input could not be identified.
///
/// # Errors
///
/// Returns an error if the references cannot be loaded, the report cannot be
/// written, or any input could not be identified.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: IdentifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let references = args.references.load()?;

    if verbose {
        eprintln!("Loaded {} reference signals", references.len());
    }

    if references.is_empty() {
        eprintln!("Warning: Reference set is empty, no signal can be ranked.");
    }

    // Load failures keep their input position so output follows input order
    let mut experiments: Vec<(String, Signal)> = Vec::new();
    let mut inputs: Vec<(String, Option<String>)> = Vec::new();
    for path in &args.inputs {
        let id = signal_id(path);
        match load_signal(path) {
            Ok(signal) => {
                if verbose {
                    eprintln!("Parsed {} samples from {id}", signal.len());
                }
                experiments.push((id.clone(), signal));
                inputs.push((id, None));
            }
            Err(e) => inputs.push((id, Some(format!("{e:#}")))),
        }
    }

    let config = MatchingConfig {
        metric: args.metric.into(),
        parallel: !args.serial,
    };
    if verbose {
        eprintln!("Metric: {}, parallel: {}", config.metric, config.parallel);
    }

    let engine = MatchingEngine::with_config(&references, config);
    let results = engine.identify_all(&experiments);

    let mut ranked = results.iter();
    let outcomes: Vec<(&str, Outcome<'_>)> = inputs
        .iter()
        .filter_map(|(id, load_error)| {
            let outcome = match load_error {
                Some(error) => Outcome::Failed(error.clone()),
                None => match &ranked.next()?.1 {
                    Ok(m) => Outcome::Matched(m),
                    Err(e) => Outcome::Failed(e.to_string()),
                },
            };
            Some((id.as_str(), outcome))
        })
        .collect();

    match format {
        OutputFormat::Text => print_text_results(&outcomes, verbose),
        OutputFormat::Json => print_json_results(&outcomes)?,
        OutputFormat::Tsv => print_tsv_results(&outcomes),
    }

    if let Some(path) = &args.report {
        let rows: Vec<ReportRow> = outcomes
            .iter()
            .filter_map(|(id, outcome)| match outcome {
                Outcome::Matched(m) => Some(ReportRow::from_ranking(*id, &m.ranking)),
                Outcome::Failed(_) => None,
            })
            .collect();
        ReportWriter::new(path).append(&rows)?;
        if verbose {
            eprintln!("Appended {} rows to {}", rows.len(), path.display());
        }
    }

    let failed = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, Outcome::Failed(_)))
        .count();
    if failed > 0 {
        anyhow::bail!(
            "{failed} of {} signal(s) could not be identified",
            outcomes.len()
        );
    }

    Ok(())
}

fn kind_label(kind: RankingKind) -> &'static str {
    match kind {
        RankingKind::Weighted => "weighted",
        RankingKind::PerfectMatch => "perfect_match",
    }
}

fn print_text_results(outcomes: &[(&str, Outcome<'_>)], verbose: bool) {
    for (i, (id, outcome)) in outcomes.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(60));
        }
        println!("\n{id}");

        let result = match outcome {
            Outcome::Matched(result) => result,
            Outcome::Failed(error) => {
                println!("   ERROR: {error}");
                continue;
            }
        };

        let ranking = &result.ranking;
        if ranking.is_perfect_match() {
            println!("   Exact match found");
        }

        // Top two always; the full distribution in verbose mode
        let shown = if verbose { ranking.scores().len() } else { 2 };
        for (rank, score) in ranking.scores().iter().take(shown).enumerate() {
            println!(
                "   #{} {} ({}) probability {:.1}%, offset {}, error {:.6}",
                rank + 1,
                score.name,
                ranking.confidence(rank),
                score.probability * 100.0,
                score.best_offset,
                score.best_error,
            );
        }

        let skipped: Vec<String> = result
            .alignments
            .skipped()
            .map(|(name, error)| format!("{name} ({error})"))
            .collect();
        if !skipped.is_empty() {
            println!("\n   Skipped references:");
            for s in skipped {
                println!("   - {s}");
            }
        }
    }

    println!();
}

fn print_json_results(outcomes: &[(&str, Outcome<'_>)]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|(id, outcome)| match outcome {
            Outcome::Matched(m) => {
                let skipped: Vec<serde_json::Value> = m
                    .alignments
                    .skipped()
                    .map(|(name, error)| {
                        serde_json::json!({
                            "reference": name,
                            "error": error.to_string(),
                        })
                    })
                    .collect();

                serde_json::json!({
                    "signal": id,
                    "kind": kind_label(m.ranking.kind()),
                    "best": m.ranking.best(),
                    "second": m.ranking.second(),
                    "scores": m.ranking.scores(),
                    "skipped": skipped,
                })
            }
            Outcome::Failed(error) => serde_json::json!({
                "signal": id,
                "error": error,
            }),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(outcomes: &[(&str, Outcome<'_>)]) {
    println!(
        "signal\tbest_reference\tbest_probability\tsecond_reference\tsecond_probability\tkind"
    );
    for (id, outcome) in outcomes {
        match outcome {
            Outcome::Matched(m) => {
                let best = m.ranking.best();
                let second = m.ranking.second();
                println!(
                    "{}\t{}\t{:.6}\t{}\t{:.6}\t{}",
                    id,
                    best.name,
                    best.probability,
                    second.name,
                    second.probability,
                    kind_label(m.ranking.kind()),
                );
            }
            Outcome::Failed(error) => eprintln!("{id}: {error}"),
        }
    }
}
