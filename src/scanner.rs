use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::store::SizeBucketStore;

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub store: SizeBucketStore,
    /// Regular files visited.
    pub files_found: usize,
    /// Entries below the root that could not be read and were left out.
    pub skipped_entries: Vec<PathBuf>,
}

fn scan_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .map(|s| {
            s.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        })
    {
        pb.set_style(style);
    }
    pb.set_message("Scanning files...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Walks `root` and files every regular file into a [`SizeBucketStore`].
///
/// Symlinks are not followed. A subdirectory that cannot be read is
/// skipped with a warning; failing to read `root` itself, or failing to hash
/// a file that was enumerated, aborts the scan.
pub fn scan(root: &Path) -> Result<ScanOutcome> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    info!("Scanning '{}'", root.display());
    let pb = scan_spinner();
    let mut outcome = ScanOutcome::default();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                pb.finish_and_clear();
                return Err(Error::Walk {
                    path: root.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                pb.suspend(|| warn!("Skipping unreadable entry: {}", err));
                if let Some(path) = err.path() {
                    outcome.skipped_entries.push(path.to_path_buf());
                }
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(err) => {
                pb.finish_and_clear();
                return Err(Error::io(entry.path(), err.into()));
            }
        };

        outcome.files_found += 1;
        debug!("Found file: '{}' ({} bytes)", entry.path().display(), size);
        if let Err(err) = outcome.store.insert(entry.into_path(), size) {
            pb.finish_and_clear();
            return Err(err);
        }

        pb.set_message(format!(
            "Scanning files... {} found",
            HumanCount(outcome.files_found as u64)
        ));
    }
    pb.finish_and_clear();

    info!("Files found: {}", HumanCount(outcome.files_found as u64));
    if !outcome.skipped_entries.is_empty() {
        warn!("Skipped {} unreadable entries", outcome.skipped_entries.len());
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SizeBucket;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn rejects_non_directory_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(scan(&file), Err(Error::NotADirectory(_))));
        assert!(matches!(scan(&dir.path().join("missing")), Err(Error::NotADirectory(_))));
    }

    #[test]
    fn empty_directory_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let outcome = scan(dir.path()).unwrap();
        assert_eq!(outcome.files_found, 0);
        assert!(outcome.store.is_empty());
    }

    #[test]
    fn visits_nested_regular_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::write(dir.path().join("top"), b"1").unwrap();
        fs::write(dir.path().join("a/mid"), b"22").unwrap();
        fs::write(dir.path().join("a/b/c/deep"), b"333").unwrap();

        let outcome = scan(dir.path()).unwrap();
        assert_eq!(outcome.files_found, 3);
        assert_eq!(outcome.store.len(), 3);
        assert_eq!(outcome.store.hashed_files(), 0);
    }

    #[test]
    fn same_size_files_share_a_hashed_bucket() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), b"X").unwrap();
        fs::write(dir.path().join("sub/b.txt"), b"X").unwrap();
        fs::write(dir.path().join("c.txt"), b"Y").unwrap();
        fs::write(dir.path().join("long.txt"), b"unique").unwrap();

        let outcome = scan(dir.path()).unwrap();
        assert_eq!(outcome.files_found, 4);
        assert_eq!(outcome.store.hashed_files(), 3);
        match outcome.store.get(1) {
            Some(SizeBucket::Hashed(map)) => {
                let mut lens: Vec<usize> = map.values().map(Vec::len).collect();
                lens.sort();
                assert_eq!(lens, vec![1, 2]);
            }
            other => panic!("unexpected bucket: {other:?}"),
        }
        assert!(matches!(outcome.store.get(6), Some(SizeBucket::Pending(_))));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_counted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("real"), b"data").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let outcome = scan(dir.path()).unwrap();
        assert_eq!(outcome.files_found, 1);
    }

    #[cfg(unix)]
    fn set_mode(path: &Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_skipped() {
        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden"), b"secret").unwrap();
        fs::write(dir.path().join("a"), b"1").unwrap();
        fs::write(dir.path().join("b"), b"22").unwrap();

        set_mode(&locked, 0o000);
        // Privileged users can still list the directory; nothing to check then.
        if fs::read_dir(&locked).is_ok() {
            set_mode(&locked, 0o755);
            return;
        }

        let result = scan(dir.path());
        set_mode(&locked, 0o755);

        let outcome = result.unwrap();
        assert_eq!(outcome.files_found, 2);
        assert_eq!(outcome.skipped_entries, vec![locked]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_root_aborts_scan() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a"), b"1").unwrap();

        set_mode(&root, 0o000);
        if fs::read_dir(&root).is_ok() {
            set_mode(&root, 0o755);
            return;
        }

        let result = scan(&root);
        set_mode(&root, 0o755);

        assert!(matches!(result, Err(Error::Walk { .. })));
    }
}
