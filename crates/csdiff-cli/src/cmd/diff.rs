//! Implementation of `csdiff diff <left> <right>`.
//!
//! Loads both documents, builds the session, and writes the diff to stdout.
//!
//! Flags:
//! - `--summary-only`: only print the summary line (human format).
//! - `--expect-different <ITEM>` (repeatable): replace the default set of
//!   metadata items flagged as expected to differ.
//!
//! Exit codes:
//! - 0 = documents are identical
//! - 1 = differences found
//! - 2 = read, parse or load failure on either document
use std::collections::BTreeSet;
use std::io::Write as _;

use csdiff_core::{DiffConfig, MetadataItem};

use crate::cmd::{load_session, stdout_error};
use crate::error::CliError;
use crate::format::{FormatterConfig, write_diff_human, write_json};
use crate::{OutputFormat, PathOrStdin};

/// Arguments of the `diff` subcommand.
#[derive(Debug)]
pub struct DiffArgs<'a> {
    pub left: &'a PathOrStdin,
    pub right: &'a PathOrStdin,
    pub summary_only: bool,
    pub expect_different: &'a [MetadataItem],
    pub max_file_size: u64,
}

/// Runs the `diff` command.
///
/// Returns `Ok(())` when the documents are identical.
///
/// # Errors
///
/// - [`CliError::DiffHasDifferences`] (exit 1) when the diff is non-empty;
///   output has already been written.
/// - Exit code 2 errors when either document cannot be loaded or stdout
///   cannot be written.
pub fn run(
    args: &DiffArgs<'_>,
    format: &OutputFormat,
    formatter: &FormatterConfig,
) -> Result<(), CliError> {
    let mut config = DiffConfig::default();
    if !args.expect_different.is_empty() {
        config.expected_differences = args
            .expect_different
            .iter()
            .copied()
            .collect::<BTreeSet<_>>();
    }

    let session = load_session(args.left, args.right, args.max_file_size, config)?;
    let diff = session.diff();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => write_diff_human(&mut out, &session, args.summary_only, formatter),
        OutputFormat::Json if args.summary_only => write_json(&mut out, &diff.summary()),
        OutputFormat::Json => write_json(&mut out, diff),
    }
    .and_then(|()| out.flush())
    .map_err(|e| stdout_error(&e))?;

    if diff.is_identical() {
        Ok(())
    } else {
        Err(CliError::DiffHasDifferences)
    }
}
