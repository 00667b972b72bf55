/// Command module for the `csdiff` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments and returns `Ok(())` on success or
/// a [`crate::error::CliError`] on failure.
use std::time::Instant;

use csdiff_core::{DiffConfig, DiffSession};

use crate::PathOrStdin;
use crate::error::CliError;
use crate::io::{check_single_stdin, load_code_system};

pub mod diff;
pub mod neighborhood;

/// Loads both documents and builds a [`DiffSession`] over them.
///
/// # Errors
///
/// Any read or parse failure of either document, or a [`CliError::LoadFailed`]
/// when a document's concepts cannot be turned into a graph.
pub fn load_session(
    left: &PathOrStdin,
    right: &PathOrStdin,
    max_file_size: u64,
    config: DiffConfig,
) -> Result<DiffSession, CliError> {
    check_single_stdin(left, right)?;
    let left_doc = load_code_system(left, max_file_size)?;
    let right_doc = load_code_system(right, max_file_size)?;

    let started = Instant::now();
    let session = DiffSession::new(&left_doc, &right_doc, config)?;
    tracing::debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        vertices = session.combined().vertex_count(),
        edges = session.combined().edge_count(),
        "session built"
    );
    Ok(session)
}

/// Maps a stdout write failure to a [`CliError`].
pub(crate) fn stdout_error(e: &std::io::Error) -> CliError {
    CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    }
}
