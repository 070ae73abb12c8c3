//! Archive extraction.
//!
//! Archives are unpacked into `archives/<normalized stem>/`. The format is
//! chosen from the file name and the header bytes are checked with `infer`
//! before anything is written. A failed extraction is reported to the caller
//! as an [`ArchiveError`]; the extraction folder is cleaned up first.

use crate::config::ConflictPolicy;
use crate::file_category::Category;
use crate::file_organizer::{
    ExtensionLedger, FileOrganizer, OrganizeError, OrganizeResult, upper_extension,
};
use crate::normalize::normalize;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of leading bytes read for signature checks. Covers the tar magic at offset 257.
const HEADER_LEN: u64 = 512;

/// Archive formats that can be unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveFormat {
    /// Picks the format from the file name, case-insensitively.
    ///
    /// A bare `.gz` is not a recognized archive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::TarGz => "gzip-compressed tar",
        }
    }

    fn signature_matches(&self, header: &[u8]) -> bool {
        match self {
            Self::Zip => infer::archive::is_zip(header),
            Self::Tar => infer::archive::is_tar(header),
            Self::TarGz => infer::archive::is_gz(header),
        }
    }
}

/// Reasons an archive could not be unpacked.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("unrecognized archive format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("{} is not a valid {format} file", .path.display())]
    SignatureMismatch {
        path: PathBuf,
        format: &'static str,
    },
    #[error("corrupt zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// What happened to one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Contents were unpacked into this folder.
    Extracted { folder: PathBuf, entries: usize },
    /// The archive could not be unpacked and was left where it was.
    Failed { reason: String },
    /// The extraction folder was already taken and the archive was left where it was.
    Skipped { folder: PathBuf },
}

/// Unpacks archives into the archives category folder.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Extracts `archive_path` into `<base_path>/archives/<normalized stem>`.
    ///
    /// When the folder already exists, `policy` picks a numbered folder,
    /// unpacks over the existing one, or leaves the archive in place.
    ///
    /// On success the archive file is removed and the extraction folder's own
    /// extension (usually empty) is recorded as known. On failure the folder
    /// is removed again if it was created here, the empty sentinel and the
    /// archive's extension are recorded as unknown, and
    /// `Ok(ExtractOutcome::Failed)` is returned. Only filesystem errors outside
    /// the extraction itself are returned as `Err`.
    pub fn extract_to_category(
        base_path: &Path,
        archive_path: &Path,
        policy: ConflictPolicy,
        ledger: &mut ExtensionLedger,
    ) -> OrganizeResult<ExtractOutcome> {
        let category_path = FileOrganizer::ensure_category_dir(base_path, Category::Archive)?;

        let stem = archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let folder_name = normalize(&stem);
        let mut folder = category_path.join(&folder_name);

        if folder.exists() {
            match policy {
                ConflictPolicy::Rename => {
                    folder = FileOrganizer::free_destination(&category_path, &folder_name);
                }
                ConflictPolicy::Overwrite => {
                    if !folder.is_dir() {
                        fs::remove_file(&folder).map_err(|e| OrganizeError::RemoveFailed {
                            path: folder.clone(),
                            source: e,
                        })?;
                    }
                }
                ConflictPolicy::Skip => {
                    log::info!(
                        "{} already exists, leaving {} in place",
                        folder.display(),
                        archive_path.display()
                    );
                    ledger.files_skipped += 1;
                    return Ok(ExtractOutcome::Skipped { folder });
                }
            }
        }

        let created = !folder.exists();
        fs::create_dir_all(&folder).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: folder.clone(),
            source: e,
        })?;

        match Self::unpack(archive_path, &folder) {
            Ok(entries) => {
                fs::remove_file(archive_path).map_err(|e| OrganizeError::RemoveFailed {
                    path: archive_path.to_path_buf(),
                    source: e,
                })?;
                log::info!(
                    "extracted {} entries from {} into {}",
                    entries,
                    archive_path.display(),
                    folder.display()
                );
                ledger.record_known(&upper_extension(&folder));
                ledger.archives_extracted += 1;
                Ok(ExtractOutcome::Extracted { folder, entries })
            }
            Err(e) => {
                log::warn!("could not unpack {}: {}", archive_path.display(), e);
                if created {
                    fs::remove_dir_all(&folder).map_err(|e| OrganizeError::RemoveFailed {
                        path: folder.clone(),
                        source: e,
                    })?;
                }
                ledger.record_unknown("");
                ledger.record_unknown(&upper_extension(archive_path));
                ledger.archives_failed += 1;
                Ok(ExtractOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Unpacks an archive into `dest`, returning the number of entries written.
    pub fn unpack(archive_path: &Path, dest: &Path) -> Result<usize, ArchiveError> {
        let format = ArchiveFormat::from_path(archive_path)
            .ok_or_else(|| ArchiveError::UnsupportedFormat(archive_path.to_path_buf()))?;

        let mut header = Vec::new();
        File::open(archive_path)?
            .take(HEADER_LEN)
            .read_to_end(&mut header)?;
        if !format.signature_matches(&header) {
            return Err(ArchiveError::SignatureMismatch {
                path: archive_path.to_path_buf(),
                format: format.name(),
            });
        }

        let file = File::open(archive_path)?;
        match format {
            ArchiveFormat::Zip => Self::unpack_zip(file, dest),
            ArchiveFormat::Tar => Self::unpack_tar(file, dest),
            ArchiveFormat::TarGz => Self::unpack_tar(GzDecoder::new(file), dest),
        }
    }

    fn unpack_zip(file: File, dest: &Path) -> Result<usize, ArchiveError> {
        let mut archive = zip::ZipArchive::new(file)?;

        let mut count = 0;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;

            let Some(entry_path) = entry.enclosed_name() else {
                log::warn!("skipping unsafe zip entry {}", entry.name());
                continue;
            };
            let output_path = dest.join(entry_path);

            if entry.is_dir() {
                fs::create_dir_all(&output_path)?;
            } else {
                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut outfile = File::create(&output_path)?;
                io::copy(&mut entry, &mut outfile)?;
                count += 1;
            }
        }
        Ok(count)
    }

    fn unpack_tar<R: Read>(reader: R, dest: &Path) -> Result<usize, ArchiveError> {
        let mut archive = tar::Archive::new(reader);

        let mut count = 0;
        for entry in archive.entries()? {
            let mut entry = entry?;
            // unpack_in refuses paths that escape `dest`
            if entry.unpack_in(dest)? && entry.header().entry_type().is_file() {
                count += 1;
            }
        }
        Ok(count)
    }
}
