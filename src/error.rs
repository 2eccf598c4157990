//! Error taxonomy shared by payload loading, emission and story writing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by a coderbot run.
///
/// Every variant maps to exit code 1 at the binary boundary; callers that
/// need to know which artifacts landed must inspect the printed summary.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Could not read {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "No files with extensions [{}] found in {}",
        extensions.join(", "),
        root.display()
    )]
    NoMatchingFiles {
        root: PathBuf,
        extensions: Vec<String>,
    },

    #[error("Could not write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("{0}")]
    Unexpected(String),
}

impl Error {
    /// Short machine-friendly name of the variant, used in JSON reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "input_not_found",
            Self::InputUnreadable { .. } => "input_unreadable",
            Self::NoMatchingFiles { .. } => "no_matching_files",
            Self::WriteFailure { .. } => "write_failure",
            Self::Config { .. } => "config",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matching_files_lists_extensions() {
        let err = Error::NoMatchingFiles {
            root: PathBuf::from("src"),
            extensions: vec!["py".to_string(), "ts".to_string()],
        };
        assert_eq!(err.to_string(), "No files with extensions [py, ts] found in src");
        assert_eq!(err.kind(), "no_matching_files");
    }

    #[test]
    fn write_failure_keeps_io_source() {
        let err = Error::WriteFailure {
            path: PathBuf::from("out/x_code.py"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Could not write out/x_code.py"));
    }
}
