/// File organization system for moving files into category directories.
///
/// This module moves files into category subdirectories under a destination
/// root, normalizing their names on the way, and keeps the extension ledger
/// used for the end-of-run report.
use crate::config::ConflictPolicy;
use crate::file_category::Category;
use crate::normalize::normalize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions and counters accumulated over one run.
///
/// The extension sets are bookkeeping for the report only and never affect
/// where a file goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionLedger {
    /// Uppercase extensions of files that were placed.
    pub known: BTreeSet<String>,
    /// Empty-string sentinel for extensionless files, and extensions of
    /// archives that could not be unpacked.
    pub unknown: BTreeSet<String>,
    /// Number of files moved into a category folder.
    pub files_moved: usize,
    /// Number of files left in place because the destination was taken.
    pub files_skipped: usize,
    /// Number of archives unpacked.
    pub archives_extracted: usize,
    /// Number of archives that could not be unpacked.
    pub archives_failed: usize,
    /// Number of empty directories removed by the pruner.
    pub folders_removed: usize,
}

impl ExtensionLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the extension of a placed file.
    ///
    /// A non-empty extension goes into `known`; a missing one records the
    /// empty sentinel into `unknown`.
    pub fn record(&mut self, extension: &str) {
        if extension.is_empty() {
            self.unknown.insert(String::new());
        } else {
            self.known.insert(extension.to_uppercase());
        }
    }

    /// Records an extension straight into `known`, even when empty.
    pub fn record_known(&mut self, extension: &str) {
        self.known.insert(extension.to_uppercase());
    }

    /// Records an extension into `unknown`.
    pub fn record_unknown(&mut self, extension: &str) {
        self.unknown.insert(extension.to_uppercase());
    }
}

/// Returns the uppercase last suffix of `path`, or an empty string.
pub fn upper_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Failed to create a category or extraction directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to list the contents of a directory.
    #[error("Failed to read directory {}: {source}", .path.display())]
    DirectoryReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {error}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },
    /// Failed to remove a file or directory after processing it.
    #[error("Failed to remove {}: {source}", .path.display())]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The base directory path is invalid or doesn't exist.
    #[error("Invalid base path {}: {source}", .path.display())]
    InvalidBasePath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Outcome of a single move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file now lives at this path.
    Moved(PathBuf),
    /// The destination was taken and the file was left in place.
    Skipped(PathBuf),
}

/// Moves files into category directories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Ensures `<base_path>/<category>` exists and returns its path.
    pub fn ensure_category_dir(base_path: &Path, category: Category) -> OrganizeResult<PathBuf> {
        if !base_path.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "base path does not exist",
                ),
            });
        }

        let category_path = base_path.join(category.dir_name());
        if !category_path.is_dir() {
            fs::create_dir(&category_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: category_path.clone(),
                source: e,
            })?;
        }
        Ok(category_path)
    }

    /// Moves a file into its category directory under `base_path`.
    ///
    /// The category directory is created if needed and the file name is
    /// normalized. On a successful move the original extension is recorded
    /// into the ledger. When the normalized name is already taken, `policy`
    /// decides between a numbered name, replacing the existing file, or
    /// leaving the source where it is.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use clean_folder::config::ConflictPolicy;
    /// use clean_folder::file_category::Category;
    /// use clean_folder::file_organizer::{ExtensionLedger, FileOrganizer};
    /// use std::path::Path;
    ///
    /// let mut ledger = ExtensionLedger::new();
    /// let outcome = FileOrganizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/Фото.JPG"),
    ///     Category::Image,
    ///     ConflictPolicy::Rename,
    ///     &mut ledger,
    /// );
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category: Category,
        policy: ConflictPolicy,
        ledger: &mut ExtensionLedger,
    ) -> OrganizeResult<MoveOutcome> {
        let category_path = Self::ensure_category_dir(base_path, category)?;

        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                from: file_path.to_path_buf(),
                to: category_path.clone(),
                error: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let new_name = normalize(&file_name.to_string_lossy());
        let mut destination_path = category_path.join(&new_name);

        if destination_path != file_path && destination_path.exists() {
            match policy {
                ConflictPolicy::Rename => {
                    destination_path = Self::free_destination(&category_path, &new_name);
                }
                ConflictPolicy::Overwrite => {
                    if destination_path.is_file() {
                        fs::remove_file(&destination_path).map_err(|e| {
                            OrganizeError::RemoveFailed {
                                path: destination_path.clone(),
                                source: e,
                            }
                        })?;
                    }
                }
                ConflictPolicy::Skip => {
                    log::info!(
                        "{} already exists, leaving {} in place",
                        destination_path.display(),
                        file_path.display()
                    );
                    ledger.files_skipped += 1;
                    return Ok(MoveOutcome::Skipped(file_path.to_path_buf()));
                }
            }
        }

        fs::rename(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            from: file_path.to_path_buf(),
            to: destination_path.clone(),
            error: e,
        })?;

        log::info!(
            "moved {} -> {}",
            file_path.display(),
            destination_path.display()
        );
        ledger.record(&upper_extension(file_path));
        ledger.files_moved += 1;

        Ok(MoveOutcome::Moved(destination_path))
    }

    /// Finds a free `<base>_<n>.<extension>` name inside `dir`.
    ///
    /// A leading dot belongs to the base, so `.bashrc` becomes `.bashrc_1`.
    pub(crate) fn free_destination(dir: &Path, name: &str) -> PathBuf {
        let body_start = usize::from(name.starts_with('.'));
        let (base, extension) = match name[body_start..].split_once('.') {
            Some((base, extension)) => (&name[..body_start + base.len()], Some(extension)),
            None => (name, None),
        };

        (1..)
            .map(|n| match extension {
                Some(extension) => dir.join(format!("{base}_{n}.{extension}")),
                None => dir.join(format!("{base}_{n}")),
            })
            .find(|candidate| !candidate.exists())
            .unwrap_or_else(|| dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_move_to_category_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let mut ledger = ExtensionLedger::new();

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        FileOrganizer::move_to_category(
            base_path,
            &file_path,
            Category::Document,
            ConflictPolicy::Rename,
            &mut ledger,
        )
        .expect("Failed to move file");

        let category_dir = base_path.join("documents");
        assert!(category_dir.is_dir());
        assert!(!file_path.exists());
        assert!(category_dir.join("test.txt").exists());
        assert!(ledger.known.contains("TXT"));
        assert_eq!(ledger.files_moved, 1);
    }

    #[test]
    fn test_move_normalizes_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let mut ledger = ExtensionLedger::new();

        let file_path = base_path.join("Фото.JPG");
        fs::write(&file_path, "jpeg").expect("Failed to write test file");

        let outcome = FileOrganizer::move_to_category(
            base_path,
            &file_path,
            Category::Image,
            ConflictPolicy::Rename,
            &mut ledger,
        )
        .expect("Failed to move file");

        let expected = base_path.join("images").join("Foto.JPG");
        assert_eq!(outcome, MoveOutcome::Moved(expected.clone()));
        assert!(expected.exists());
        assert!(ledger.known.contains("JPG"));
    }

    #[test]
    fn test_extensionless_file_recorded_as_unknown() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let mut ledger = ExtensionLedger::new();

        let file_path = base_path.join("LICENSE");
        fs::write(&file_path, "MIT").expect("Failed to write test file");

        FileOrganizer::move_to_category(
            base_path,
            &file_path,
            Category::Other,
            ConflictPolicy::Rename,
            &mut ledger,
        )
        .expect("Failed to move file");

        assert!(base_path.join("other").join("LICENSE").exists());
        assert!(ledger.known.is_empty());
        assert!(ledger.unknown.contains(""));
    }

    #[test]
    fn test_rename_policy_picks_numbered_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let mut ledger = ExtensionLedger::new();

        fs::create_dir(base_path.join("documents")).unwrap();
        fs::write(base_path.join("documents").join("zvit.txt"), "old").unwrap();
        let file_path = base_path.join("звіт.txt");
        fs::write(&file_path, "new").unwrap();

        FileOrganizer::move_to_category(
            base_path,
            &file_path,
            Category::Document,
            ConflictPolicy::Rename,
            &mut ledger,
        )
        .unwrap();

        let docs = base_path.join("documents");
        assert_eq!(fs::read_to_string(docs.join("zvit.txt")).unwrap(), "old");
        assert_eq!(fs::read_to_string(docs.join("zvit_1.txt")).unwrap(), "new");
    }

    #[test]
    fn test_rename_policy_keeps_hidden_files_hidden() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let mut ledger = ExtensionLedger::new();

        fs::create_dir_all(base_path.join("other")).unwrap();
        fs::write(base_path.join("other").join(".bashrc"), "old").unwrap();
        fs::write(base_path.join("other").join(".env.local"), "old").unwrap();
        let bashrc = base_path.join(".bashrc");
        let env = base_path.join(".env.local");
        fs::write(&bashrc, "new").unwrap();
        fs::write(&env, "new").unwrap();

        for file_path in [&bashrc, &env] {
            FileOrganizer::move_to_category(
                base_path,
                file_path,
                Category::Other,
                ConflictPolicy::Rename,
                &mut ledger,
            )
            .unwrap();
        }

        let other = base_path.join("other");
        assert_eq!(fs::read_to_string(other.join(".bashrc_1")).unwrap(), "new");
        assert_eq!(fs::read_to_string(other.join(".env_1.local")).unwrap(), "new");
        assert!(!other.join("_1.bashrc").exists());
    }

    #[test]
    fn test_overwrite_policy_replaces_existing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let mut ledger = ExtensionLedger::new();

        fs::create_dir(base_path.join("documents")).unwrap();
        fs::write(base_path.join("documents").join("zvit.txt"), "old").unwrap();
        let file_path = base_path.join("звіт.txt");
        fs::write(&file_path, "new").unwrap();

        FileOrganizer::move_to_category(
            base_path,
            &file_path,
            Category::Document,
            ConflictPolicy::Overwrite,
            &mut ledger,
        )
        .unwrap();

        let docs = base_path.join("documents");
        assert_eq!(fs::read_to_string(docs.join("zvit.txt")).unwrap(), "new");
        assert!(!docs.join("zvit_1.txt").exists());
    }

    #[test]
    fn test_skip_policy_leaves_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let mut ledger = ExtensionLedger::new();

        fs::create_dir(base_path.join("documents")).unwrap();
        fs::write(base_path.join("documents").join("zvit.txt"), "old").unwrap();
        let file_path = base_path.join("звіт.txt");
        fs::write(&file_path, "new").unwrap();

        let outcome = FileOrganizer::move_to_category(
            base_path,
            &file_path,
            Category::Document,
            ConflictPolicy::Skip,
            &mut ledger,
        )
        .unwrap();

        assert_eq!(outcome, MoveOutcome::Skipped(file_path.clone()));
        assert!(file_path.exists());
        assert_eq!(ledger.files_skipped, 1);
        assert_eq!(ledger.files_moved, 0);
    }

    #[test]
    fn test_move_to_category_invalid_base_path() {
        let mut ledger = ExtensionLedger::new();
        let result = FileOrganizer::move_to_category(
            Path::new("/non/existent/path"),
            Path::new("/some/file.txt"),
            Category::Document,
            ConflictPolicy::Rename,
            &mut ledger,
        );
        assert!(matches!(result, Err(OrganizeError::InvalidBasePath { .. })));
    }

    #[test]
    fn test_ledger_record_known_keeps_empty_extension() {
        let mut ledger = ExtensionLedger::new();
        ledger.record_known("");
        ledger.record_unknown("zip");
        assert!(ledger.known.contains(""));
        assert!(ledger.unknown.contains("ZIP"));
    }
}
