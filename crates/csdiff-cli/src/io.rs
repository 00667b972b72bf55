/// Document loading: bounded reads from disk or stdin, then JSON parsing.
///
/// `csdiff-core` never touches the filesystem. Everything the binary reads
/// goes through [`load_code_system`]:
///
/// - disk files are size-checked via `std::fs::metadata` before any read;
/// - stdin is read through `Read::take` so the buffer never exceeds the limit;
/// - bytes must be UTF-8, and the offending offset is reported otherwise.
///
/// Every failure maps to a [`CliError`] with exit code 2.
use std::io::Read as _;
use std::path::Path;

use csdiff_core::CodeSystem;

use crate::PathOrStdin;
use crate::error::CliError;

/// Reads and parses one CodeSystem document.
///
/// # Errors
///
/// Any [`read_input`] failure, or [`CliError::ParseFailed`] when the text is
/// not a JSON CodeSystem.
pub fn load_code_system(source: &PathOrStdin, max_size: u64) -> Result<CodeSystem, CliError> {
    let text = read_input(source, max_size)?;
    let doc: CodeSystem = serde_json::from_str(&text).map_err(|e| CliError::ParseFailed {
        source: label(source),
        detail: e.to_string(),
    })?;
    tracing::debug!(
        source = %label(source),
        bytes = text.len(),
        concepts = doc.concept.len(),
        "loaded document"
    );
    Ok(doc)
}

/// Rejects argument pairs that would read stdin twice.
///
/// # Errors
///
/// [`CliError::StdinUsedTwice`] if both are `-`.
pub fn check_single_stdin(left: &PathOrStdin, right: &PathOrStdin) -> Result<(), CliError> {
    if matches!(left, PathOrStdin::Stdin) && matches!(right, PathOrStdin::Stdin) {
        return Err(CliError::StdinUsedTwice);
    }
    Ok(())
}

/// Reads the entire contents of `source` into a `String`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) when the source is missing, unreadable,
/// larger than `max_size`, or not UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

/// Label used in messages: the path, or `-` for stdin.
pub fn label(source: &PathOrStdin) -> String {
    match source {
        PathOrStdin::Path(path) => path.display().to_string(),
        PathOrStdin::Stdin => "-".to_owned(),
    }
}

fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();
    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    bytes_to_string(bytes, &path.display().to_string())
}

fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == std::io::ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == std::io::ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

/// Reads stdin capped at `max_size` bytes.
///
/// A stream of exactly `max_size` bytes is probed for one more byte to tell
/// "at the limit" from "over the limit".
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let stdin = std::io::stdin();
    let mut handle = stdin.lock();
    let mut buf: Vec<u8> = Vec::new();

    (&mut handle)
        .take(max_size)
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;

    if buf.len() as u64 == max_size {
        let mut probe = [0u8; 1];
        let extra = handle
            .read(&mut probe)
            .map_err(|e| CliError::StdinReadError {
                detail: e.to_string(),
            })?;
        if extra > 0 {
            return Err(CliError::FileTooLarge {
                source: "-".to_owned(),
                limit: max_size,
                actual: None,
            });
        }
    }

    bytes_to_string(buf, "-")
}

fn bytes_to_string(bytes: Vec<u8>, source_label: &str) -> Result<String, CliError> {
    String::from_utf8(bytes).map_err(|e| CliError::InvalidUtf8 {
        source: source_label.to_owned(),
        byte_offset: e.utf8_error().valid_up_to(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use std::io::Write as _;
    use std::path::PathBuf;

    use super::*;

    fn temp_file_with(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("create temp file");
        f.write_all(contents).expect("write temp file");
        f
    }

    fn path_of(f: &tempfile::NamedTempFile) -> PathOrStdin {
        PathOrStdin::Path(f.path().to_path_buf())
    }

    #[test]
    fn file_exactly_at_limit_is_read() {
        let f = temp_file_with(b"hello");
        assert_eq!(read_input(&path_of(&f), 5).expect("at limit"), "hello");
    }

    #[test]
    fn file_over_limit_reports_actual_size() {
        let f = temp_file_with(b"hello world");
        match read_input(&path_of(&f), 4).expect_err("over limit") {
            CliError::FileTooLarge {
                actual: Some(n), ..
            } => assert_eq!(n, 11),
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_reports_offset() {
        let f = temp_file_with(&[b'{', b'"', 0xFF]);
        match read_input(&path_of(&f), 1024).expect_err("bad utf-8") {
            CliError::InvalidUtf8 { byte_offset, .. } => assert_eq!(byte_offset, 2),
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let source = PathOrStdin::Path(PathBuf::from("/no/such/dir/codesystem.json"));
        let err = read_input(&source, 1024).expect_err("missing");
        assert!(matches!(err, CliError::FileNotFound { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn code_system_is_parsed() {
        let f = temp_file_with(
            br#"{"resourceType":"CodeSystem","version":"1","concept":[{"code":"a"}]}"#,
        );
        let doc = load_code_system(&path_of(&f), 1024).expect("parses");
        assert_eq!(doc.version.as_deref(), Some("1"));
        assert_eq!(doc.concept.len(), 1);
    }

    #[test]
    fn non_json_is_parse_failure() {
        let f = temp_file_with(b"not json");
        let err = load_code_system(&path_of(&f), 1024).expect_err("not json");
        assert!(matches!(err, CliError::ParseFailed { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn stdin_twice_is_rejected() {
        let err = check_single_stdin(&PathOrStdin::Stdin, &PathOrStdin::Stdin)
            .expect_err("stdin twice");
        assert!(matches!(err, CliError::StdinUsedTwice));
        assert!(
            check_single_stdin(&PathOrStdin::Stdin, &PathOrStdin::Path(PathBuf::from("b")))
                .is_ok()
        );
    }
}
