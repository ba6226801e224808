//! Listing output
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `style` - Entry kind to color mapping
//! - `formatter` - Compact and long renderers

mod config;
mod formatter;
mod style;

pub use config::OutputConfig;
pub use formatter::{ListingFormatter, format_mtime, format_size_column};
pub use style::EntryStyle;
