//! Raw directory entries as produced by a directory read

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, trace};

/// One entry of a directory read.
///
/// `is_dir` comes from the directory read itself and does not follow
/// symlinks, so a link to a directory is not a directory here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_dir,
        }
    }
}

/// Read every entry of `path`, in whatever order the filesystem returns them.
pub fn read_directory(path: &Path) -> io::Result<Vec<DirectoryEntry>> {
    trace!("reading directory {}", path.display());

    let mut entries = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!("skipping unreadable entry in {}: {}", path.display(), e);
                continue;
            }
        };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(DirectoryEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            is_dir,
        });
    }
    Ok(entries)
}
