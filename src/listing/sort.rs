//! Entry ordering
//!
//! Metadata is resolved once per entry before sorting. An entry whose
//! metadata cannot be resolved is never moved: it keeps its position and
//! the resolvable entries are ordered around it.

use std::cmp::Ordering;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use log::debug;

use crate::metadata::{self, EntryMetadata};

use super::config::ListingConfig;
use super::entry::DirectoryEntry;

/// A directory entry paired with its (possibly unavailable) metadata.
#[derive(Debug, Clone)]
pub struct SortedEntry {
    pub entry: DirectoryEntry,
    pub metadata: Option<EntryMetadata>,
}

impl SortedEntry {
    /// Resolve metadata for `entry`, degrading to `None` on failure.
    pub fn resolve(entry: DirectoryEntry) -> Self {
        let metadata = match metadata::resolve(&entry.path) {
            Ok(m) => Some(m),
            Err(e) => {
                debug!("cannot stat {}: {}", entry.path.display(), e);
                None
            }
        };
        Self { entry, metadata }
    }
}

/// Strip a single leading `.` from names longer than one character.
pub fn dot_fold(name: &str) -> &str {
    match name.strip_prefix('.') {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}

/// Compare names on their dot-folded form; ties fall back to the raw name.
pub fn compare_names(a: &str, b: &str, reverse: bool) -> Ordering {
    let ord = dot_fold(a).cmp(dot_fold(b)).then_with(|| a.cmp(b));
    if reverse { ord.reverse() } else { ord }
}

/// Order two resolved entries. Unresolved operands compare equal.
pub fn compare_entries(a: &SortedEntry, b: &SortedEntry, config: &ListingConfig) -> Ordering {
    let (Some(meta_a), Some(meta_b)) = (&a.metadata, &b.metadata) else {
        return Ordering::Equal;
    };

    if config.sort_by_time {
        // Newest first unless reversed.
        let by_time = if config.reverse_sort {
            meta_a.modified.cmp(&meta_b.modified)
        } else {
            meta_b.modified.cmp(&meta_a.modified)
        };
        return by_time
            .then_with(|| compare_names(&a.entry.name, &b.entry.name, config.reverse_sort));
    }

    compare_names(&a.entry.name, &b.entry.name, config.reverse_sort)
}

/// Resolve metadata for every entry and sort them.
pub fn sort_entries(entries: Vec<DirectoryEntry>, config: &ListingConfig) -> Vec<SortedEntry> {
    let mut slots: Vec<Option<SortedEntry>> = entries
        .into_iter()
        .map(|e| Some(SortedEntry::resolve(e)))
        .collect();

    let positions: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.as_ref().is_some_and(|s| s.metadata.is_some()))
        .map(|(i, _)| i)
        .collect();

    let mut movable: Vec<SortedEntry> = positions
        .iter()
        .filter_map(|&i| slots[i].take())
        .collect();
    movable.sort_by(|a, b| compare_entries(a, b, config));

    for (pos, item) in positions.into_iter().zip(movable) {
        slots[pos] = Some(item);
    }

    slots.into_iter().flatten().collect()
}

/// Order top-level path arguments by their first byte only.
///
/// Deliberately coarse: paths sharing a first character keep their
/// command-line order.
pub fn sort_top_level(paths: &mut [PathBuf], reverse: bool) {
    let first = |p: &PathBuf| p.as_os_str().as_bytes().first().copied().unwrap_or(0);
    if reverse {
        paths.sort_by(|a, b| first(b).cmp(&first(a)));
    } else {
        paths.sort_by_key(first);
    }
}
