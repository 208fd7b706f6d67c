//! Per-file failures raised while reading ebuilds.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A single ebuild that could not be turned into a record.
///
/// Never fatal for an indexing run: failures are collected and the walk goes on.
#[derive(Error, Debug)]
#[error("{}: {kind}", path.display())]
pub struct ParseFailure {
    pub path: PathBuf,
    #[source]
    pub kind: ParseFailureKind,
}

#[derive(Error, Debug)]
pub enum ParseFailureKind {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed ebuild: {0}")]
    Malformed(String),
}

impl ParseFailure {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: ParseFailureKind::Io(source),
        }
    }

    pub fn malformed(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: ParseFailureKind::Malformed(message.into()),
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self.kind, ParseFailureKind::Io(_))
    }
}

impl From<walkdir::Error> for ParseFailure {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        Self {
            path,
            kind: ParseFailureKind::Io(err.into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseFailure>;
