//! Removal of empty directories after a run.

use std::fs;
use std::path::Path;

/// Removes every empty directory below `path`, deepest first.
///
/// `path` itself is kept. Directories that cannot be removed (not empty,
/// permission denied) are skipped without error. Returns the number of
/// directories removed.
pub fn remove_empty_folders(path: &Path) -> usize {
    let Ok(entries) = fs::read_dir(path) else {
        log::debug!("cannot list {}, not pruning it", path.display());
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        if !entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }

        let dir = entry.path();
        removed += remove_empty_folders(&dir);
        match fs::remove_dir(&dir) {
            Ok(()) => {
                log::debug!("removed empty folder {}", dir.display());
                removed += 1;
            }
            Err(e) => log::debug!("kept {}: {}", dir.display(), e),
        }
    }
    removed
}
