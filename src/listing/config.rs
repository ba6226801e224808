//! Configuration types for the listing pipeline

/// Flags that drive filtering, sorting, formatting and traversal.
///
/// Built once from the command line and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingConfig {
    pub recursive: bool,
    pub reverse_sort: bool,
    pub sort_by_time: bool,
    /// Include entries whose name starts with `.`
    pub show_all: bool,
    pub long_format: bool,
    pub directories_only: bool,
    pub human_readable: bool,
}
