//! Entry metadata resolution
//!
//! Primary resolution never follows symlinks, so a link is always reported
//! as a link. Link targets get a second, following, best-effort resolution
//! that degrades to "unknown" instead of failing.

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

const S_IFMT: u32 = 0o170_000;
const S_IFSOCK: u32 = 0o140_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFBLK: u32 = 0o060_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFCHR: u32 = 0o020_000;
const S_IFIFO: u32 = 0o010_000;

const S_ISUID: u32 = 0o4000;
const S_ISGID: u32 = 0o2000;
const S_ISVTX: u32 = 0o1000;

/// Coarse entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Regular,
    Directory,
    Symlink,
    /// Devices, pipes, sockets.
    Other,
}

/// Non-following snapshot of a filesystem node.
#[derive(Debug, Clone)]
pub struct EntryMetadata {
    pub kind: EntryKind,
    /// Raw `st_mode`, type bits included.
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    /// Exact byte size. Humanizing happens only at display time.
    pub size: u64,
    /// Allocated 512-byte blocks.
    pub blocks: u64,
    pub modified: SystemTime,
    /// Present only for symlinks whose target could be read.
    pub link_target: Option<LinkTarget>,
}

/// Where a symlink points.
#[derive(Debug, Clone)]
pub struct LinkTarget {
    /// The raw link contents, not normalized.
    pub raw: PathBuf,
    /// Following resolution of the target; `None` for broken or unreadable targets.
    pub resolved: Option<Box<EntryMetadata>>,
}

impl LinkTarget {
    /// Base name of the raw target, as displayed after the arrow.
    pub fn display_name(&self) -> String {
        self.raw
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.raw.to_string_lossy().into_owned())
    }
}

impl EntryMetadata {
    fn from_std(meta: &fs::Metadata) -> Self {
        let file_type = meta.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::Regular
        } else {
            EntryKind::Other
        };

        Self {
            kind,
            mode: meta.mode(),
            nlink: meta.nlink(),
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.len(),
            blocks: meta.blocks(),
            modified: meta.modified().unwrap_or(UNIX_EPOCH),
            link_target: None,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Any execute bit set.
    pub fn is_executable(&self) -> bool {
        self.mode & 0o111 != 0
    }

    pub fn permission_string(&self) -> String {
        permission_string(self.mode, self.kind)
    }
}

/// Resolve `path` without following a final symlink.
pub fn resolve(path: &Path) -> io::Result<EntryMetadata> {
    let meta = fs::symlink_metadata(path)?;
    let mut resolved = EntryMetadata::from_std(&meta);
    if resolved.is_symlink() {
        resolved.link_target = resolve_link_target(path);
    }
    Ok(resolved)
}

/// Read a symlink's target and resolve what it points at.
///
/// Returns `None` only when the link itself cannot be read. A dangling
/// target still yields a `LinkTarget`, with `resolved` left empty.
pub fn resolve_link_target(path: &Path) -> Option<LinkTarget> {
    let raw = match fs::read_link(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("cannot read link {}: {}", path.display(), e);
            return None;
        }
    };

    let resolved = match fs::metadata(path) {
        Ok(meta) => Some(Box::new(EntryMetadata::from_std(&meta))),
        Err(e) => {
            debug!("link target of {} unresolved: {}", path.display(), e);
            None
        }
    };

    Some(LinkTarget { raw, resolved })
}

/// Render a 10-character `ls -l` permission string.
///
/// The leading character comes from the mode's type bits, except that a
/// symlink always shows `l` regardless of what the mode says.
pub fn permission_string(mode: u32, kind: EntryKind) -> String {
    let type_char = if kind == EntryKind::Symlink {
        'l'
    } else {
        match mode & S_IFMT {
            S_IFDIR => 'd',
            S_IFLNK => 'l',
            S_IFCHR => 'c',
            S_IFBLK => 'b',
            S_IFIFO => 'p',
            S_IFSOCK => 's',
            _ if kind == EntryKind::Directory => 'd',
            _ => '-',
        }
    };

    let mut perms = String::with_capacity(10);
    perms.push(type_char);
    push_triplet(&mut perms, mode >> 6, mode & S_ISUID != 0, 's');
    push_triplet(&mut perms, mode >> 3, mode & S_ISGID != 0, 's');
    push_triplet(&mut perms, mode, mode & S_ISVTX != 0, 't');
    perms
}

fn push_triplet(out: &mut String, bits: u32, special: bool, special_char: char) {
    out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
    out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
    let exec = bits & 0o1 != 0;
    out.push(match (exec, special) {
        (true, true) => special_char,
        (false, true) => special_char.to_ascii_uppercase(),
        (true, false) => 'x',
        (false, false) => '-',
    });
}

/// Format a byte count with the largest fitting 1024-based unit.
///
/// Under 1024 bytes the exact count is shown with a `B` suffix; above that,
/// one decimal place and a single-letter unit.
pub fn humanize_size(size: u64) -> String {
    const UNIT: u64 = 1024;
    const SUFFIXES: &[u8] = b"KMGTPE";

    if size < UNIT {
        return format!("{}B", size);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = size / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!(
        "{:.1}{}",
        size as f64 / div as f64,
        SUFFIXES[exp] as char
    )
}

/// Sum of allocated blocks, reported in 1K units like `ls -l`.
pub fn block_total<'a>(entries: impl IntoIterator<Item = &'a EntryMetadata>) -> u64 {
    entries.into_iter().map(|m| m.blocks).sum::<u64>() / 2
}
