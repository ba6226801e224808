//! Error taxonomy for listing operations

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListError {
    /// A requested top-level path does not exist.
    #[error("cannot access '{}': No such file or directory", .0.display())]
    NotFound(PathBuf),

    /// An existing directory could not be read.
    #[error("cannot open directory '{}': {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output sink rejected a write.
    #[error("error writing output: {0}")]
    Output(#[from] io::Error),
}

impl ListError {
    pub fn read_failure(path: &Path, source: io::Error) -> Self {
        Self::ReadFailure {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(p) | Self::ReadFailure { path: p, .. } => Some(p),
            Self::Output(_) => None,
        }
    }

    /// Whether the whole invocation must stop.
    ///
    /// A missing top-level path is reported and the batch keeps going;
    /// unreadable directories and broken output abort the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NotFound(_))
    }
}
