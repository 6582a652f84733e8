//! Error type shared by the scan, resolve and dispose stages.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors. Anything returned as `Err` aborts the run; non-fatal
/// conditions (hash collisions, failed deletions) are reported in the
/// stage results instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The scan root is missing or is not a directory.
    #[error("not a directory: '{}'", .0.display())]
    NotADirectory(PathBuf),

    /// Reading a file that was already enumerated failed.
    #[error("I/O error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file no longer has the size recorded during the scan.
    #[error(
        "'{}' changed size during the run (expected {expected} bytes, read {actual})",
        path.display()
    )]
    SizeChanged {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// The scan root itself could not be walked.
    #[error("failed to walk '{}': {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
