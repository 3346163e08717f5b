use std::path::PathBuf;

use itertools::Itertools;

use crate::kind::DataKind;

#[derive(Debug)]
pub enum DataError {
    NotADirectory(PathBuf),
    DuplicateFile {
        kind: DataKind,
        first: String,
        second: String,
    },
    TimestampMismatch {
        file: String,
        expected: String,
        found: String,
    },
    AppnameMismatch {
        file: String,
        expected: String,
        found: String,
    },
    MissingFiles(Vec<DataKind>),
    NotDetected(Vec<DataKind>),
    MissingPartition {
        file: String,
    },
    MalformedRow {
        file: String,
        line: usize,
        column: &'static str,
        value: String,
    },
    TooManyFields {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },
    Io(PathBuf, std::io::Error),
}

fn kind_list(kinds: &[DataKind]) -> String {
    kinds.iter().map(|kind| format!("'{kind}'")).join(", ")
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::NotADirectory(path) => {
                write!(f, "could not find a directory at '{}'", path.display())
            }
            DataError::DuplicateFile {
                kind,
                first,
                second,
            } => write!(
                f,
                "files '{second}' and '{first}' are both {kind} files; ensure only one placement run is in the target directory"
            ),
            DataError::TimestampMismatch {
                file,
                expected,
                found,
            } => write!(
                f,
                "file '{file}' has a different timestamp ({found}, expected {expected}); ensure only one placement run is in the target directory"
            ),
            DataError::AppnameMismatch {
                file,
                expected,
                found,
            } => write!(
                f,
                "file '{file}' has a different appname ({found}, expected {expected}); ensure only one placement run is in the target directory"
            ),
            DataError::MissingFiles(kinds) => {
                write!(f, "files {} missing from target directory", kind_list(kinds))
            }
            DataError::NotDetected(kinds) => {
                write!(f, "files {} have not been detected", kind_list(kinds))
            }
            DataError::MissingPartition { file } => write!(
                f,
                "file '{file}' does not separate core loading from mailbox loading"
            ),
            DataError::MalformedRow {
                file,
                line,
                column,
                value,
            } => write!(
                f,
                "{file}:{line}: invalid value '{value}' for column '{column}'"
            ),
            DataError::TooManyFields {
                file,
                line,
                expected,
                found,
            } => write!(f, "{file}:{line}: expected {expected} fields, found {found}"),
            DataError::Io(path, error) => write!(f, "{}: {error}", path.display()),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(_, error) => Some(error),
            _ => None,
        }
    }
}
