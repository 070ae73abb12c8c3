//! Directory traversal and dispatch.
//!
//! The walker visits a tree depth-first, sends every file to the file mover
//! or the archive extractor according to its category, and leaves category
//! folders alone so that a second run has nothing to do.

use crate::archive::ArchiveExtractor;
use crate::config::{Layout, Settings};
use crate::file_category::{Category, FileMapper};
use crate::file_organizer::{ExtensionLedger, FileOrganizer, OrganizeError, OrganizeResult};
use crate::prune::remove_empty_folders;
use std::fs;
use std::path::{Path, PathBuf};

/// Runs the whole pipeline on `root`.
///
/// Creates `root` and the six category folders if they are missing, sorts
/// every file under it, then removes the directories left empty.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::config::Settings;
/// use clean_folder::walker::clean_directory;
/// use std::path::Path;
///
/// let ledger = clean_directory(Path::new("Downloads"), &Settings::default())?;
/// println!("moved {} files", ledger.files_moved);
/// # Ok::<(), clean_folder::file_organizer::OrganizeError>(())
/// ```
pub fn clean_directory(root: &Path, settings: &Settings) -> OrganizeResult<ExtensionLedger> {
    fs::create_dir_all(root).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: root.to_path_buf(),
        source: e,
    })?;
    for category in Category::ALL {
        FileOrganizer::ensure_category_dir(root, category)?;
    }

    let mut ledger = ExtensionLedger::new();
    let walker = Walker::new(root, settings);
    walker.process_folder(root, &mut ledger)?;

    ledger.folders_removed = remove_empty_folders(root);
    Ok(ledger)
}

/// Depth-first walker over one scan root.
pub struct Walker<'a> {
    root: &'a Path,
    settings: &'a Settings,
    mapper: FileMapper,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Path, settings: &'a Settings) -> Self {
        Self {
            root,
            settings,
            mapper: FileMapper::default(),
        }
    }

    /// Processes every entry under `folder`.
    ///
    /// Entries are listed up front and sorted by name, so files moved during
    /// the walk do not show up again. Directories named after a category are
    /// skipped.
    pub fn process_folder(
        &self,
        folder: &Path,
        ledger: &mut ExtensionLedger,
    ) -> OrganizeResult<()> {
        for (path, is_dir) in Self::list_entries(folder)? {
            if is_dir {
                let is_category = path
                    .file_name()
                    .is_some_and(|name| Category::is_category_dir(&name.to_string_lossy()));
                if is_category {
                    log::debug!("skipping category folder {}", path.display());
                    continue;
                }
                self.process_folder(&path, ledger)?;
            } else if self.settings.filters.should_include(&path) {
                self.handle_file_or_archive(&path, folder, ledger)?;
            } else {
                log::debug!("leaving filtered file {} in place", path.display());
            }
        }
        Ok(())
    }

    /// Classifies one file and hands it to the mover or the extractor.
    pub fn handle_file_or_archive(
        &self,
        path: &Path,
        folder: &Path,
        ledger: &mut ExtensionLedger,
    ) -> OrganizeResult<()> {
        let base = self.destination_root(folder);
        match self.mapper.categorize_path(path) {
            Category::Archive => {
                ArchiveExtractor::extract_to_category(
                    base,
                    path,
                    self.settings.on_conflict,
                    ledger,
                )?;
            }
            category => {
                FileOrganizer::move_to_category(
                    base,
                    path,
                    category,
                    self.settings.on_conflict,
                    ledger,
                )?;
            }
        }
        Ok(())
    }

    /// Folder under which category folders are resolved for files in `folder`.
    fn destination_root<'b>(&'b self, folder: &'b Path) -> &'b Path {
        match self.settings.layout {
            Layout::PerFolder => folder,
            Layout::Root => self.root,
        }
    }

    fn list_entries(folder: &Path) -> OrganizeResult<Vec<(PathBuf, bool)>> {
        let read_error = |e| OrganizeError::DirectoryReadFailed {
            path: folder.to_path_buf(),
            source: e,
        };

        let mut entries = Vec::new();
        for entry in fs::read_dir(folder).map_err(read_error)? {
            let entry = entry.map_err(read_error)?;
            let is_dir = entry.file_type().map_err(read_error)?.is_dir();
            entries.push((entry.path(), is_dir));
        }
        entries.sort();
        Ok(entries)
    }
}
