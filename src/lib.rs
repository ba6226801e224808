//! myls - list directory contents
//!
//! The listing pipeline reads a directory, filters and sorts its entries,
//! resolves their metadata and renders them in compact or long form,
//! optionally descending into subdirectories.

pub mod args;
pub mod error;
pub mod identity;
pub mod listing;
pub mod metadata;
pub mod output;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use args::{CliOptions, ColorMode, ParseError, parse_arguments};
pub use error::ListError;
pub use listing::{Lister, ListingConfig, ListingOutput, list};
pub use metadata::{EntryKind, EntryMetadata, LinkTarget, humanize_size, resolve};
pub use output::{EntryStyle, ListingFormatter, OutputConfig};
