//! Listing formatter
//!
//! `ListingFormatter` renders entries in compact or long form into any
//! `WriteColor` sink, with diagnostics going to a separate error sink.

use std::io::{self, Write};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::ListError;
use crate::identity::{group_name, user_name};
use crate::listing::ListingOutput;
use crate::metadata::{EntryMetadata, humanize_size};

use super::config::OutputConfig;
use super::style::EntryStyle;

const PROGRAM_NAME: &str = "myls";

/// Format a modification time as `Mon DD HH:MM` in local time.
pub fn format_mtime(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%b %d %H:%M").to_string()
}

/// Size column text: exact bytes, or the humanized form verbatim.
pub fn format_size_column(size: u64, human_readable: bool) -> String {
    if human_readable {
        humanize_size(size)
    } else {
        size.to_string()
    }
}

/// Formatter writing listing output to `W` and diagnostics to `E`.
pub struct ListingFormatter<W: WriteColor, E: Write> {
    config: OutputConfig,
    out: W,
    err: E,
}

impl ListingFormatter<StandardStream, io::Stderr> {
    /// Formatter bound to the process's stdout and stderr.
    pub fn stdio(config: OutputConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self::new(config, StandardStream::stdout(choice), io::stderr())
    }
}

impl<W: WriteColor, E: Write> ListingFormatter<W, E> {
    pub fn new(config: OutputConfig, out: W, err: E) -> Self {
        Self { config, out, err }
    }

    pub fn into_parts(self) -> (W, E) {
        (self.out, self.err)
    }

    /// Write `name` in the style's color, always followed by a reset.
    fn write_styled(&mut self, name: &str, style: EntryStyle) -> io::Result<()> {
        if self.config.use_color
            && let Some(spec) = style.color_spec()
        {
            self.out.set_color(&spec)?;
        }
        write!(self.out, "{}", name)?;
        self.out.reset()
    }

    fn write_compact(&mut self, name: &str, metadata: &EntryMetadata) -> io::Result<()> {
        match &metadata.link_target {
            Some(target) if metadata.is_symlink() => {
                self.write_styled(name, EntryStyle::Symlink)?;
                write!(self.out, " -> ")?;
                self.write_styled(&target.display_name(), EntryStyle::of_link_target(target))?;
            }
            _ => self.write_styled(name, EntryStyle::of(metadata))?,
        }
        write!(self.out, "  ")
    }

    fn write_long(&mut self, name: &str, metadata: &EntryMetadata) -> io::Result<()> {
        if self.config.use_color {
            self.out
                .set_color(ColorSpec::new().set_fg(Some(Color::White)))?;
        }
        write!(
            self.out,
            "{} {:>2} {} {} {:>6} {} ",
            metadata.permission_string(),
            metadata.nlink,
            user_name(metadata.uid),
            group_name(metadata.gid),
            format_size_column(metadata.size, self.config.human_readable),
            format_mtime(metadata.modified),
        )?;
        self.out.reset()?;

        match &metadata.link_target {
            Some(target) if metadata.is_symlink() => {
                // Name and target share the target's color.
                let style = EntryStyle::of_link_target(target);
                self.write_styled(name, style)?;
                write!(self.out, " -> ")?;
                self.write_styled(&target.display_name(), style)?;
            }
            _ => self.write_styled(name, EntryStyle::of(metadata))?,
        }
        writeln!(self.out)
    }
}

impl<W: WriteColor, E: Write> ListingOutput for ListingFormatter<W, E> {
    fn directory_header(&mut self, path: &str) -> io::Result<()> {
        writeln!(self.out, "{}:", path)
    }

    fn section_break(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    fn block_total(&mut self, total: u64) -> io::Result<()> {
        writeln!(self.out, "total {}", total)
    }

    fn entry(&mut self, name: &str, metadata: &EntryMetadata) -> io::Result<()> {
        if self.config.long_format {
            self.write_long(name, metadata)
        } else {
            self.write_compact(name, metadata)
        }
    }

    fn finish_listing(&mut self) -> io::Result<()> {
        // Long lines are already terminated.
        if !self.config.long_format {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    fn report_error(&mut self, error: &ListError) -> io::Result<()> {
        self.out.flush()?;
        writeln!(self.err, "{}: {}", PROGRAM_NAME, error)?;
        self.err.flush()
    }
}
