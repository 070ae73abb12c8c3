//! Output formatting and the end-of-run summary.
//!
//! Console messages go through [`OutputFormatter`] so styling stays uniform.
//! The summary lists the extension ledger and, per category, every path found
//! under `<root>/<category>`.

use crate::file_category::Category;
use crate::file_organizer::ExtensionLedger;
use clap::ValueEnum;
use colored::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// How the summary is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Manages CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a progress note on stderr, keeping stdout for the report.
    pub fn status(message: &str) {
        eprintln!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }
}

/// Files found under one category folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryListing {
    pub category: Category,
    pub files: Vec<PathBuf>,
}

/// Everything printed at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    #[serde(flatten)]
    pub ledger: ExtensionLedger,
    pub categories: Vec<CategoryListing>,
}

impl Summary {
    /// Builds the summary, globbing each category folder under `root`.
    pub fn collect(root: &Path, ledger: ExtensionLedger) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|category| CategoryListing {
                category: *category,
                files: list_category(root, *category),
            })
            .collect();

        Self { ledger, categories }
    }

    /// Prints the summary in the requested format.
    pub fn print(&self, format: ReportFormat) {
        match format {
            ReportFormat::Text => self.print_text(),
            ReportFormat::Json => match serde_json::to_string_pretty(self) {
                Ok(json) => OutputFormatter::plain(&json),
                Err(e) => OutputFormatter::error(&format!("Could not serialize summary: {}", e)),
            },
        }
    }

    fn print_text(&self) {
        OutputFormatter::plain(&format!(
            "Known Extensions: {}",
            format_set(&self.ledger.known)
        ));
        OutputFormatter::plain(&format!(
            "Unknown Extensions: {}",
            format_set(&self.ledger.unknown)
        ));

        for listing in &self.categories {
            OutputFormatter::header(&format!("{}:", listing.category.description()));
            if listing.files.is_empty() {
                OutputFormatter::plain("No files in this category.");
            } else {
                for file in &listing.files {
                    OutputFormatter::plain(&file.display().to_string());
                }
            }
        }

        let ledger = &self.ledger;
        OutputFormatter::header("Totals:");
        OutputFormatter::success(&format!("{} files moved", ledger.files_moved));
        OutputFormatter::success(&format!("{} archives extracted", ledger.archives_extracted));
        OutputFormatter::success(&format!("{} empty folders removed", ledger.folders_removed));
        if ledger.files_skipped > 0 {
            OutputFormatter::info(&format!(
                "{} files left in place (name already taken)",
                ledger.files_skipped
            ));
        }
        if ledger.archives_failed > 0 {
            OutputFormatter::error(&format!(
                "{} archives could not be unpacked",
                ledger.archives_failed
            ));
        }
    }
}

/// Renders an extension set as `{A, B}`, quoting the empty sentinel.
fn format_set(set: &BTreeSet<String>) -> String {
    let items: Vec<String> = set
        .iter()
        .map(|ext| {
            if ext.is_empty() {
                "''".to_string()
            } else {
                ext.clone()
            }
        })
        .collect();
    format!("{{{}}}", items.join(", "))
}

/// Lists every path below `<root>/<category>`, sorted.
pub fn list_category(root: &Path, category: Category) -> Vec<PathBuf> {
    let base = root.join(category.dir_name());
    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&base.to_string_lossy())
    );

    let mut files: Vec<PathBuf> = match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(e) => {
            log::warn!("bad listing pattern {}: {}", pattern, e);
            Vec::new()
        }
    };
    files.sort();
    files
}
