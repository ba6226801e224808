//! Command-line parsing
//!
//! Parsing is a pure function over the raw argument list. Grouped short
//! flags (`-laR`) are split into single flags before clap sees them.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::listing::ListingConfig;

pub type ParseError = clap::Error;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser, Debug)]
#[command(name = "myls")]
#[command(about = "List directory contents")]
#[command(version, disable_help_flag = true)]
struct Args {
    /// Files or directories to list
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// List subdirectories recursively
    #[arg(short = 'R', long = "recursive")]
    recursive: bool,

    /// Reverse the sort order
    #[arg(short = 'r', long = "reverse")]
    reverse: bool,

    /// Sort by modification time, newest first
    #[arg(short = 't')]
    sort_by_time: bool,

    /// Do not ignore entries starting with .
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Use a long listing format
    #[arg(short = 'l')]
    long: bool,

    /// List directories only
    #[arg(short = 'd', long = "dirs-only")]
    dirs_only: bool,

    /// With -l, print sizes like 1.5K and 2.0M
    #[arg(short = 'h', long = "human-readable")]
    human_readable: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Print help
    #[allow(dead_code)]
    #[arg(long = "help", action = ArgAction::Help)]
    help: Option<bool>,
}

/// Everything the binary needs from its command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub config: ListingConfig,
    pub paths: Vec<PathBuf>,
    pub color: ColorMode,
}

/// Split grouped short flags into one token per flag.
///
/// The first token (program name) is kept as is, long options and lone
/// `-` pass through, and everything after `--` is left untouched. Tokens
/// that are not valid UTF-8 are never flag groups and pass through too.
pub fn expand_short_flags(raw: Vec<OsString>) -> Vec<OsString> {
    let mut expanded = Vec::with_capacity(raw.len());
    let mut iter = raw.into_iter();
    if let Some(program) = iter.next() {
        expanded.push(program);
    }

    while let Some(arg) = iter.next() {
        if arg == "--" {
            expanded.push(arg);
            expanded.extend(iter);
            break;
        }
        match arg.to_str() {
            Some(s) if s.len() > 2 && s.starts_with('-') && !s.starts_with("--") => {
                expanded.extend(s.chars().skip(1).map(|c| OsString::from(format!("-{}", c))));
            }
            _ => expanded.push(arg),
        }
    }
    expanded
}

/// Parse a raw argument list (program name first) into options.
pub fn parse_arguments<I, T>(raw: I) -> Result<CliOptions, ParseError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let raw: Vec<OsString> = raw.into_iter().map(Into::into).collect();
    let args = Args::try_parse_from(expand_short_flags(raw))?;

    Ok(CliOptions {
        config: ListingConfig {
            recursive: args.recursive,
            reverse_sort: args.reverse,
            sort_by_time: args.sort_by_time,
            show_all: args.all,
            long_format: args.long,
            directories_only: args.dirs_only,
            human_readable: args.human_readable,
        },
        paths: args.paths,
        color: args.color,
    })
}
