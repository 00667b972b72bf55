//! Implementation of `csdiff neighborhood <left> <right> <code>`.
//!
//! Builds the combined graph of both documents and writes the neighborhood
//! around `code` to stdout.
//!
//! Flags:
//! - `--radius <N>`: traversal radius (default 2). The focus has depth 1,
//!   so radius 1 still follows relationships changed between versions.
//! - `--max-radius <N>`: upper bound `--radius` is clamped to.
//!
//! Exit codes: 0 = success, 1 = code defined in neither document,
//! 2 = read, parse or load failure.
use std::io::Write as _;

use csdiff_core::{DiffConfig, Neighborhood};

use crate::cmd::{load_session, stdout_error};
use crate::error::CliError;
use crate::format::{FormatterConfig, write_json, write_neighborhood_human};
use crate::{OutputFormat, PathOrStdin};

/// Arguments of the `neighborhood` subcommand.
#[derive(Debug)]
pub struct NeighborhoodArgs<'a> {
    pub left: &'a PathOrStdin,
    pub right: &'a PathOrStdin,
    pub code: &'a str,
    pub radius: Option<u32>,
    pub max_radius: u32,
    pub max_file_size: u64,
}

/// Runs the `neighborhood` command.
///
/// # Errors
///
/// - [`CliError::FocusNotFound`] (exit 1) when `code` is in neither document.
///   In JSON mode the `not_found` result is still written to stdout.
/// - Exit code 2 errors when either document cannot be loaded.
pub fn run(
    args: &NeighborhoodArgs<'_>,
    format: &OutputFormat,
    formatter: &FormatterConfig,
) -> Result<(), CliError> {
    let config = DiffConfig {
        max_radius: args.max_radius,
        ..DiffConfig::default()
    };
    let session = load_session(args.left, args.right, args.max_file_size, config)?;
    let neighborhood = session.neighborhood(args.code, args.radius);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match (format, &neighborhood) {
        (OutputFormat::Json, _) => write_json(&mut out, &neighborhood),
        (OutputFormat::Human, Neighborhood::Found(subgraph)) => {
            write_neighborhood_human(&mut out, subgraph, formatter)
        }
        (OutputFormat::Human, Neighborhood::NotFound { .. }) => Ok(()),
    }
    .and_then(|()| out.flush())
    .map_err(|e| stdout_error(&e))?;

    match neighborhood {
        Neighborhood::Found(_) => Ok(()),
        Neighborhood::NotFound { focus } => Err(CliError::FocusNotFound { code: focus }),
    }
}
