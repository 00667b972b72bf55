/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `csdiff` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The tool could not read, parse or load
///   one of the documents. Nothing has been written to stdout.
/// - Exit code **1**: logical failure. The tool ran to completion and the
///   result is a well-defined negative answer (differences found, focus code
///   not in either document).
use std::fmt;
use std::path::PathBuf;

use csdiff_core::SessionError;

/// All error conditions that the `csdiff` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound { path: PathBuf },

    /// The process lacks permission to read a file.
    PermissionDenied { path: PathBuf },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, otherwise the filesystem path.
        source: String,
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 { source: String, byte_offset: usize },

    /// An I/O error occurred while reading from stdin.
    StdinReadError { detail: String },

    /// Both documents were given as `-`.
    StdinUsedTwice,

    /// A generic I/O error not covered by the more specific variants above.
    IoError { source: String, detail: String },

    /// The input is not a JSON CodeSystem.
    ParseFailed { source: String, detail: String },

    /// A document parsed but its concepts could not be loaded.
    LoadFailed(SessionError),

    /// Serializing a result failed.
    InternalError { detail: String },

    // --- Exit code 1: logical failures ---
    /// The diff found at least one difference. Output has been written.
    DiffHasDifferences,

    /// The focus code is not defined in either document.
    FocusNotFound { code: String },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::StdinUsedTwice
            | Self::IoError { .. }
            | Self::ParseFailed { .. }
            | Self::LoadFailed(_)
            | Self::InternalError { .. } => 2,

            Self::DiffHasDifferences | Self::FocusNotFound { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::StdinUsedTwice => "error: only one document can be read from stdin".to_owned(),
            Self::IoError { source, detail } => {
                format!("error: I/O error reading {source}: {detail}")
            }
            Self::ParseFailed { source, detail } => {
                format!("error: {source} is not a CodeSystem: {detail}")
            }
            Self::LoadFailed(e) => format!("error: cannot load {e}"),
            Self::InternalError { detail } => format!("error: internal error: {detail}"),
            Self::DiffHasDifferences => "documents differ".to_owned(),
            Self::FocusNotFound { code } => {
                format!("error: concept '{code}' is not defined in either document")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        Self::LoadFailed(e)
    }
}
