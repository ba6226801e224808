//! Color selection by entry kind

use termcolor::{Color, ColorSpec};

use crate::metadata::{EntryMetadata, LinkTarget};

/// How an entry name is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStyle {
    Directory,
    Executable,
    Symlink,
    Plain,
}

impl EntryStyle {
    pub fn of(metadata: &EntryMetadata) -> Self {
        if metadata.is_dir() {
            EntryStyle::Directory
        } else if metadata.is_symlink() {
            EntryStyle::Symlink
        } else if metadata.is_executable() {
            EntryStyle::Executable
        } else {
            EntryStyle::Plain
        }
    }

    /// Style for the part after the arrow. Targets that could not be
    /// resolved keep the link's own style.
    pub fn of_link_target(target: &LinkTarget) -> Self {
        target
            .resolved
            .as_deref()
            .map(Self::of)
            .unwrap_or(EntryStyle::Symlink)
    }

    /// Color for this style; `None` leaves the terminal default.
    pub fn color_spec(&self) -> Option<ColorSpec> {
        let color = match self {
            EntryStyle::Directory => Color::Blue,
            EntryStyle::Executable => Color::Green,
            EntryStyle::Symlink => Color::Cyan,
            EntryStyle::Plain => return None,
        };
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color)).set_bold(true);
        Some(spec)
    }
}
