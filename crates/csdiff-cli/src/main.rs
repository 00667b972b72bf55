mod cli;
mod cmd;
mod error;
mod format;
mod io;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, OutputFormat, PathOrStdin};
use crate::cmd::diff::DiffArgs;
use crate::cmd::neighborhood::NeighborhoodArgs;
use crate::error::CliError;
use crate::format::FormatterConfig;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let formatter = FormatterConfig::from_flags(cli.no_color, cli.verbose);
    let started = std::time::Instant::now();
    let result = dispatch(&cli, &formatter);
    if let Err(e) = format::write_timing_human(
        &mut std::io::stderr(),
        "finished",
        started.elapsed(),
        &formatter,
    ) {
        tracing::warn!("cannot write timing: {e}");
    }

    if let Err(e) = result {
        if !matches!(e, CliError::DiffHasDifferences) {
            eprintln!("{}", e.message());
        }
        std::process::exit(e.exit_code());
    }
}

/// Logs go to stderr; stdout carries only the command result.
///
/// `RUST_LOG` wins over the `--quiet`/`--verbose` defaults.
fn init_logging(cli: &Cli) {
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn dispatch(cli: &Cli, formatter: &FormatterConfig) -> Result<(), CliError> {
    match &cli.command {
        Command::Diff {
            left,
            right,
            summary_only,
            expect_different,
        } => cmd::diff::run(
            &DiffArgs {
                left,
                right,
                summary_only: *summary_only,
                expect_different,
                max_file_size: cli.max_file_size,
            },
            &cli.format,
            formatter,
        ),
        Command::Neighborhood {
            left,
            right,
            code,
            radius,
            max_radius,
        } => cmd::neighborhood::run(
            &NeighborhoodArgs {
                left,
                right,
                code,
                radius: *radius,
                max_radius: *max_radius,
                max_file_size: cli.max_file_size,
            },
            &cli.format,
            formatter,
        ),
    }
}
