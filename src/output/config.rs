//! Output configuration types

use crate::listing::ListingConfig;

/// Configuration for output formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
    pub long_format: bool,
    /// Humanize sizes in long format.
    pub human_readable: bool,
}

impl OutputConfig {
    pub fn new(listing: &ListingConfig, use_color: bool) -> Self {
        Self {
            use_color,
            long_format: listing.long_format,
            human_readable: listing.human_readable,
        }
    }
}
