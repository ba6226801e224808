//! Visibility and type filtering

use super::config::ListingConfig;
use super::entry::DirectoryEntry;

/// Dotfile convention. An empty name is never hidden.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Check whether a single entry survives filtering.
pub fn is_included(entry: &DirectoryEntry, config: &ListingConfig) -> bool {
    if !config.show_all && is_hidden(&entry.name) {
        return false;
    }
    if config.directories_only && !entry.is_dir {
        return false;
    }
    true
}

/// Drop hidden entries (unless `show_all`) and non-directories (when
/// `directories_only`), keeping the relative order of the rest.
pub fn filter_entries(entries: Vec<DirectoryEntry>, config: &ListingConfig) -> Vec<DirectoryEntry> {
    entries
        .into_iter()
        .filter(|entry| is_included(entry, config))
        .collect()
}
