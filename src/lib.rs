//! clean-folder - sort a cluttered folder by file type
//!
//! This library walks a directory tree, moves every file into one of six
//! category folders with a transliterated ASCII name, unpacks archives, and
//! removes the directories left empty.

pub mod archive;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod normalize;
pub mod output;
pub mod prune;
pub mod walker;

pub use archive::{ArchiveExtractor, ArchiveFormat};
pub use config::{CleanConfig, ConfigError, ConflictPolicy, Layout, Settings};
pub use file_category::{Category, FileMapper};
pub use file_organizer::{ExtensionLedger, FileOrganizer, OrganizeError};
pub use normalize::normalize;
pub use walker::clean_directory;

pub use cli::{Cli, run_cli};
