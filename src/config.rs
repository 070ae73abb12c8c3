//! Run configuration.
//!
//! Settings are read from a TOML file and control where category folders are
//! placed, what happens when a normalized name is already taken, and which
//! files are left untouched. The category table itself is fixed.
//!
//! # Configuration File Format
//!
//! ```toml
//! [organize]
//! layout = "per_folder"
//! on_conflict = "rename"
//!
//! [filters]
//! skip_hidden = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part"]
//! regex = []
//! ```

use clap::ValueEnum;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".cleanfolderrc.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(String),
}

/// Where category folders are created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Next to the files, in whichever folder is being walked.
    #[default]
    PerFolder,
    /// Always under the scan root.
    Root,
}

/// What to do when the normalized destination name already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Append `_1`, `_2`, ... to the base name.
    #[default]
    Rename,
    /// Replace the existing file.
    Overwrite,
    /// Leave the source file where it is.
    Skip,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanConfig {
    #[serde(default)]
    pub organize: OrganizeRules,
    #[serde(default)]
    pub filters: FilterRules,
    /// File this configuration was read from. It is never moved by a run.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Placement rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeRules {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub on_conflict: ConflictPolicy,
}

/// Rules for files that are left in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Leave files whose name starts with "." untouched.
    #[serde(default)]
    pub skip_hidden: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl CleanConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.cleanfolderrc.toml` in the current directory
    /// 3. Look for `~/.config/clean-folder/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("clean-folder")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        log::debug!("loaded configuration from {}", path.display());

        let mut config = Self::from_toml(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile configuration into the settings used by a run.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile(self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            layout: self.organize.layout,
            on_conflict: self.organize.on_conflict,
            filters: CompiledFilters::new(self.filters, self.source.as_deref())?,
        })
    }
}

/// Resolved settings for one run.
#[derive(Debug, Default)]
pub struct Settings {
    pub layout: Layout,
    pub on_conflict: ConflictPolicy,
    pub filters: CompiledFilters,
}

/// Pre-compiled filter rules.
#[derive(Debug, Default)]
pub struct CompiledFilters {
    skip_hidden: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    config_file: Option<PathBuf>,
}

impl CompiledFilters {
    fn new(rules: FilterRules, config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden: rules.skip_hidden,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_patterns,
            exclude_regexes,
            config_file: config_file.and_then(|path| fs::canonicalize(path).ok()),
        })
    }

    fn is_config_file(&self, file_path: &Path) -> bool {
        let Some(config_file) = &self.config_file else {
            return false;
        };
        config_file.file_name() == file_path.file_name()
            && fs::canonicalize(file_path).is_ok_and(|path| &path == config_file)
    }

    /// Check if a file should be organized rather than left in place.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. The configuration file this run was loaded from
    /// 2. Hidden file filter
    /// 3. Exact filename match
    /// 4. Glob pattern match on the file name
    /// 5. Regex pattern match on the file name
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.is_config_file(file_path) {
            return false;
        }

        if self.skip_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}
