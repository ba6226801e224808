//! Traversal engine: filter, sort and render one directory, then
//! optionally descend into its subdirectories.
//!
//! Recursion follows the directory flag of each read entry, which never
//! follows symlinks. There is no cycle detection beyond that: a
//! filesystem loop made of real directories (bind mounts, for instance)
//! recurses without bound.

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::ListError;
use crate::metadata::{self, EntryMetadata};

use super::config::ListingConfig;
use super::entry::read_directory;
use super::filter::filter_entries;
use super::sort::{SortedEntry, sort_entries, sort_top_level};

pub const EXIT_SUCCESS: i32 = 0;
/// Some path could not be accessed, or the run was aborted.
pub const EXIT_TROUBLE: i32 = 2;

/// Sink for rendered listing output, written strictly in traversal order.
pub trait ListingOutput {
    /// `<path>:` line introducing a directory in recursive mode.
    fn directory_header(&mut self, path: &str) -> io::Result<()>;

    /// Blank line between directory blocks.
    fn section_break(&mut self) -> io::Result<()>;

    /// `total <N>` line preceding a long-format listing.
    fn block_total(&mut self, total: u64) -> io::Result<()>;

    fn entry(&mut self, name: &str, metadata: &EntryMetadata) -> io::Result<()>;

    /// Called after the last entry of a listing block.
    fn finish_listing(&mut self) -> io::Result<()>;

    /// Diagnostic on the error channel.
    fn report_error(&mut self, error: &ListError) -> io::Result<()>;
}

/// Counters for one `list` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListSummary {
    pub directories: usize,
    pub files: usize,
    pub missing: usize,
}

/// Drives the listing pipeline over a set of top-level paths.
pub struct Lister {
    config: ListingConfig,
}

impl Lister {
    pub fn new(config: ListingConfig) -> Self {
        Self { config }
    }

    /// List every path in `paths` (or `.` when empty).
    ///
    /// Arguments are ordered on their raw form, before `~` expansion.
    /// Missing paths are reported through `output` and skipped. An
    /// unreadable top-level directory or a failing output aborts the run.
    pub fn run<O: ListingOutput>(
        &self,
        paths: &[PathBuf],
        output: &mut O,
    ) -> Result<ListSummary, ListError> {
        let mut paths: Vec<PathBuf> = if paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            paths.to_vec()
        };
        sort_top_level(&mut paths, self.config.reverse_sort);

        let mut summary = ListSummary::default();
        let mut blocks = 0usize;

        for raw in &paths {
            let path = expand_tilde(raw);
            match self.list_path(&path, blocks, output, &mut summary) {
                Ok(()) => blocks += 1,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    if let Some(p) = err.path() {
                        debug!("cannot access {}", p.display());
                    }
                    summary.missing += 1;
                    output.report_error(&err)?;
                }
            }
        }

        Ok(summary)
    }

    /// Render one top-level argument as its own block. `blocks` counts
    /// the blocks already written.
    fn list_path<O: ListingOutput>(
        &self,
        path: &Path,
        blocks: usize,
        output: &mut O,
        summary: &mut ListSummary,
    ) -> Result<(), ListError> {
        let meta =
            metadata::resolve(path).map_err(|_| ListError::NotFound(path.to_path_buf()))?;

        if self.config.recursive && blocks > 0 {
            output.section_break()?;
        }

        if !meta.is_dir() {
            output.entry(&base_name(path), &meta)?;
            output.finish_listing()?;
            summary.files += 1;
            return Ok(());
        }

        let display = path.to_string_lossy();
        self.list_directory(path, &display, true, output, summary)
    }

    fn list_directory<O: ListingOutput>(
        &self,
        path: &Path,
        display: &str,
        top_level: bool,
        output: &mut O,
        summary: &mut ListSummary,
    ) -> Result<(), ListError> {
        if self.config.recursive && top_level {
            output.directory_header(display)?;
        }

        let entries = match read_directory(path) {
            Ok(entries) => entries,
            Err(e) if top_level => return Err(ListError::read_failure(path, e)),
            Err(e) => {
                debug!("skipping {}: {}", path.display(), e);
                return Ok(());
            }
        };
        summary.directories += 1;

        let entries = filter_entries(entries, &self.config);
        let sorted = sort_entries(entries, &self.config);
        self.render(&sorted, output, summary)?;

        if self.config.recursive {
            for child in sorted.iter().filter(|s| s.entry.is_dir) {
                let child_display = join_display(display, &child.entry.name);
                output.section_break()?;
                output.directory_header(&child_display)?;
                self.list_directory(&child.entry.path, &child_display, false, output, summary)?;
            }
        }

        Ok(())
    }

    fn render<O: ListingOutput>(
        &self,
        sorted: &[SortedEntry],
        output: &mut O,
        summary: &mut ListSummary,
    ) -> Result<(), ListError> {
        if self.config.long_format {
            let total = metadata::block_total(sorted.iter().filter_map(|s| s.metadata.as_ref()));
            output.block_total(total)?;
        }

        for sorted_entry in sorted {
            // Vanished between the read and the stat.
            let Some(meta) = &sorted_entry.metadata else {
                continue;
            };
            output.entry(&sorted_entry.entry.name, meta)?;
            summary.files += 1;
        }
        output.finish_listing()?;
        Ok(())
    }
}

/// List `paths` and map the outcome to a process exit code.
pub fn list<O: ListingOutput>(paths: &[PathBuf], config: ListingConfig, output: &mut O) -> i32 {
    match Lister::new(config).run(paths, output) {
        Ok(summary) => {
            debug!(
                "listed {} directories, {} entries, {} missing",
                summary.directories, summary.files, summary.missing
            );
            if summary.missing > 0 {
                EXIT_TROUBLE
            } else {
                EXIT_SUCCESS
            }
        }
        Err(e) => {
            // Nowhere left to report if the error channel is gone too.
            let _ = output.report_error(&e);
            EXIT_TROUBLE
        }
    }
}

/// Expand a leading `~` to the current user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let bytes = path.as_os_str().as_bytes();
    if bytes != b"~" && !bytes.starts_with(b"~/") {
        return path.to_path_buf();
    }
    let Some(home) = home_dir() else {
        return path.to_path_buf();
    };
    let rest = &bytes[1..];
    let rest = &rest[rest.iter().take_while(|&&b| b == b'/').count()..];
    if rest.is_empty() {
        home
    } else {
        home.join(OsStr::from_bytes(rest))
    }
}

fn home_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME").filter(|h| !h.is_empty()) {
        return Some(PathBuf::from(home));
    }
    use uzers::os::unix::UserExt;
    uzers::get_user_by_uid(uzers::get_current_uid()).map(|u| u.home_dir().to_path_buf())
}

/// Join a child name onto a display path without a redundant `./`.
pub fn join_display(parent: &str, name: &str) -> String {
    if parent == "." {
        name.to_string()
    } else {
        Path::new(parent).join(name).to_string_lossy().into_owned()
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    /// Records calls as plain strings for order assertions.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        errors: Vec<String>,
    }

    impl ListingOutput for Recorder {
        fn directory_header(&mut self, path: &str) -> io::Result<()> {
            self.events.push(format!("header {}", path));
            Ok(())
        }

        fn section_break(&mut self) -> io::Result<()> {
            self.events.push("break".to_string());
            Ok(())
        }

        fn block_total(&mut self, total: u64) -> io::Result<()> {
            self.events.push(format!("total {}", total));
            Ok(())
        }

        fn entry(&mut self, name: &str, _metadata: &EntryMetadata) -> io::Result<()> {
            self.events.push(name.to_string());
            Ok(())
        }

        fn finish_listing(&mut self) -> io::Result<()> {
            self.events.push("end".to_string());
            Ok(())
        }

        fn report_error(&mut self, error: &ListError) -> io::Result<()> {
            self.errors.push(error.to_string());
            Ok(())
        }
    }

    fn tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("sub").join("b.txt"), "b").unwrap();
        dir
    }

    fn path_arg(dir: &TempDir, rel: &str) -> PathBuf {
        dir.path().join(rel)
    }

    #[test]
    fn test_single_directory_listing() {
        let dir = tree();
        let mut rec = Recorder::default();
        let summary = Lister::new(ListingConfig::default())
            .run(&[path_arg(&dir, "root")], &mut rec)
            .unwrap();
        assert_eq!(rec.events, vec!["a.txt", "sub", "end"]);
        assert_eq!(summary.missing, 0);
    }

    #[test]
    fn test_recursive_descent_order() {
        let dir = tree();
        let root = path_arg(&dir, "root");
        let config = ListingConfig {
            recursive: true,
            ..Default::default()
        };
        let mut rec = Recorder::default();
        Lister::new(config).run(&[root.clone()], &mut rec).unwrap();

        assert_eq!(
            rec.events,
            vec![
                format!("header {}", root.display()),
                "a.txt".to_string(),
                "sub".to_string(),
                "end".to_string(),
                "break".to_string(),
                format!("header {}/sub", root.display()),
                "b.txt".to_string(),
                "end".to_string(),
            ]
        );
    }

    #[test]
    fn test_long_format_emits_total_per_directory() {
        let dir = tree();
        let config = ListingConfig {
            recursive: true,
            long_format: true,
            ..Default::default()
        };
        let mut rec = Recorder::default();
        Lister::new(config)
            .run(&[path_arg(&dir, "root")], &mut rec)
            .unwrap();
        let totals = rec.events.iter().filter(|e| e.starts_with("total ")).count();
        assert_eq!(totals, 2);
        assert!(rec.events[1].starts_with("total "));
    }

    #[test]
    fn test_missing_path_is_reported_and_skipped() {
        let dir = tree();
        let mut rec = Recorder::default();
        let missing = path_arg(&dir, "absent");
        let summary = Lister::new(ListingConfig::default())
            .run(&[missing.clone(), path_arg(&dir, "root")], &mut rec)
            .unwrap();

        assert_eq!(summary.missing, 1);
        assert_eq!(
            rec.errors,
            vec![format!(
                "cannot access '{}': No such file or directory",
                missing.display()
            )]
        );
        assert_eq!(rec.events, vec!["a.txt", "sub", "end"]);
    }

    #[test]
    fn test_list_exit_codes() {
        let dir = tree();
        let mut rec = Recorder::default();
        assert_eq!(
            list(&[path_arg(&dir, "root")], ListingConfig::default(), &mut rec),
            EXIT_SUCCESS
        );
        assert_eq!(
            list(&[path_arg(&dir, "nope")], ListingConfig::default(), &mut rec),
            EXIT_TROUBLE
        );
    }

    #[test]
    fn test_file_argument_listed_by_base_name() {
        let dir = tree();
        let mut rec = Recorder::default();
        Lister::new(ListingConfig::default())
            .run(&[path_arg(&dir, "root/a.txt")], &mut rec)
            .unwrap();
        assert_eq!(rec.events, vec!["a.txt", "end"]);
    }

    #[test]
    fn test_broken_symlink_is_listed() {
        let dir = tree();
        symlink("does-not-exist", dir.path().join("root").join("dangling")).unwrap();
        let mut rec = Recorder::default();
        Lister::new(ListingConfig::default())
            .run(&[path_arg(&dir, "root")], &mut rec)
            .unwrap();
        assert_eq!(rec.events, vec!["a.txt", "dangling", "sub", "end"]);
        assert!(rec.errors.is_empty());
    }

    #[test]
    fn test_symlinked_directory_is_not_descended() {
        let dir = tree();
        let root = dir.path().join("root");
        symlink(".", root.join("loop")).unwrap();
        let config = ListingConfig {
            recursive: true,
            ..Default::default()
        };
        let mut rec = Recorder::default();
        Lister::new(config)
            .run(&[path_arg(&dir, "root")], &mut rec)
            .unwrap();
        let headers = rec.events.iter().filter(|e| e.starts_with("header ")).count();
        assert_eq!(headers, 2);
    }

    #[test]
    fn test_hidden_subdirectory_not_descended_without_all() {
        let dir = tree();
        fs::create_dir(dir.path().join("root").join(".cache")).unwrap();
        let config = ListingConfig {
            recursive: true,
            ..Default::default()
        };
        let mut rec = Recorder::default();
        Lister::new(config)
            .run(&[path_arg(&dir, "root")], &mut rec)
            .unwrap();
        assert!(!rec.events.iter().any(|e| e.contains(".cache")));
    }

    #[test]
    fn test_top_level_paths_sorted_by_first_char() {
        let dir = tree();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        // Absolute paths all start with '/', so command-line order is kept.
        let mut rec = Recorder::default();
        Lister::new(ListingConfig::default())
            .run(&[path_arg(&dir, "b.txt"), path_arg(&dir, "a.txt")], &mut rec)
            .unwrap();
        assert_eq!(rec.events, vec!["b.txt", "end", "a.txt", "end"]);
    }

    #[test]
    fn test_join_display() {
        assert_eq!(join_display(".", "sub"), "sub");
        assert_eq!(join_display("root", "sub"), "root/sub");
        assert_eq!(join_display("root/", "sub"), "root/sub");
        assert_eq!(join_display("/", "etc"), "/etc");
    }

    #[test]
    fn test_recursive_file_argument_counts_as_block() {
        let dir = tree();
        let config = ListingConfig {
            recursive: true,
            ..Default::default()
        };
        let mut rec = Recorder::default();
        Lister::new(config)
            .run(&[path_arg(&dir, "root/a.txt"), path_arg(&dir, "root/sub")], &mut rec)
            .unwrap();
        let sub = path_arg(&dir, "root/sub");
        assert_eq!(
            rec.events,
            vec![
                "a.txt".to_string(),
                "end".to_string(),
                "break".to_string(),
                format!("header {}", sub.display()),
                "b.txt".to_string(),
                "end".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_path_does_not_open_a_block() {
        let dir = tree();
        let config = ListingConfig {
            recursive: true,
            ..Default::default()
        };
        let mut rec = Recorder::default();
        let summary = Lister::new(config)
            .run(&[path_arg(&dir, "absent"), path_arg(&dir, "root/a.txt")], &mut rec)
            .unwrap();
        assert_eq!(summary.missing, 1);
        assert_eq!(rec.events, vec!["a.txt", "end"]);
    }

    #[test]
    fn test_unreadable_top_level_directory_aborts() {
        if uzers::get_current_uid() == 0 {
            return;
        }
        use std::os::unix::fs::PermissionsExt;
        let dir = tree();
        let locked = dir.path().join("root").join("sub");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let mut rec = Recorder::default();
        let result = Lister::new(ListingConfig::default())
            .run(&[path_arg(&dir, "root/sub"), path_arg(&dir, "root/a.txt")], &mut rec);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(err.path(), Some(locked.as_path()));
        assert!(rec.events.is_empty());
    }

    #[test]
    fn test_expand_tilde_leaves_other_paths() {
        assert_eq!(expand_tilde(Path::new("src")), PathBuf::from("src"));
        assert_eq!(expand_tilde(Path::new("~user")), PathBuf::from("~user"));
        assert_eq!(expand_tilde(Path::new("a/~")), PathBuf::from("a/~"));
    }

    #[test]
    fn test_expand_tilde_uses_home() {
        let Some(home) = home_dir() else {
            return;
        };
        assert_eq!(expand_tilde(Path::new("~")), home);
        assert_eq!(expand_tilde(Path::new("~/docs")), home.join("docs"));
    }

    #[test]
    fn test_expand_tilde_keeps_non_utf8_rest() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;
        let Some(home) = home_dir() else {
            return;
        };
        let raw = PathBuf::from(OsString::from_vec(b"~/\xffname".to_vec()));
        let expected = home.join(OsStr::from_bytes(b"\xffname"));
        assert_eq!(expand_tilde(&raw), expected);
    }
}
