use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod core;
mod matching;
mod parsing;
mod report;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("signal_solver=debug,info")
    } else {
        EnvFilter::new("signal_solver=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Identify(args) => {
            cli::identify::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Align(args) => {
            cli::align::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Catalog(args) => {
            cli::catalog::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Overlay(args) => {
            cli::overlay::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
