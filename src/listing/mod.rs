//! Directory listing pipeline
//!
//! Entries flow through a fixed sequence of stages:
//!
//! - `entry` - raw directory reads
//! - `filter` - hidden-file and directories-only rules
//! - `sort` - metadata resolution and ordering
//! - `traversal` - per-directory rendering and recursive descent

mod config;
mod entry;
mod filter;
mod sort;
mod traversal;

pub use config::ListingConfig;
pub use entry::{DirectoryEntry, read_directory};
pub use filter::{filter_entries, is_hidden, is_included};
pub use sort::{SortedEntry, compare_entries, compare_names, dot_fold, sort_entries, sort_top_level};
pub use traversal::{
    EXIT_SUCCESS, EXIT_TROUBLE, ListSummary, Lister, ListingOutput, expand_tilde, join_display,
    list,
};
