//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status lines,
//! the rename preview (as an aligned table or JSON), the apply summary, and a
//! progress bar for large batches. Keeping formatting here makes it easy to
//! change globally.

use crate::renamer::{ApplyReport, BatchEntry};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// One row of the machine-readable preview.
#[derive(Serialize)]
struct PreviewRow<'a> {
    from: &'a str,
    to: &'a str,
    changed: bool,
}

/// Manages all CLI output with consistent styling and formatting.
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

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates and returns a progress bar for the apply phase.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the current-to-new preview table, one row per entry.
    ///
    /// Changed names come out green, unchanged ones dimmed, and entries that
    /// already carry a status (a compute failure in keep-going mode) show it
    /// in place of a new name.
    pub fn preview_table(entries: &[BatchEntry]) {
        Self::header("PREVIEW");

        // Column width follows the longest current name.
        let width = entries
            .iter()
            .map(|entry| entry.name.len())
            .max()
            .unwrap_or(0)
            .max(7); // At least "Current" width

        println!(
            "{:<width$}   {}",
            "Current".bold(),
            "New name".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 11));

        for entry in entries {
            if let Some(status) = &entry.status {
                println!("{:<width$} ✗ {}", entry.name, status.red(), width = width);
            } else if entry.new_name == entry.name {
                println!(
                    "{:<width$} → {}",
                    entry.name,
                    entry.new_name.dimmed(),
                    width = width
                );
            } else {
                println!(
                    "{:<width$} → {}",
                    entry.name,
                    entry.new_name.green(),
                    width = width
                );
            }
        }
    }

    /// Encodes the preview as pretty-printed JSON.
    pub fn json_preview(entries: &[BatchEntry]) -> Result<String, String> {
        let rows: Vec<PreviewRow<'_>> = entries
            .iter()
            .map(|entry| PreviewRow {
                from: &entry.name,
                to: &entry.new_name,
                changed: entry.new_name != entry.name,
            })
            .collect();

        serde_json::to_string_pretty(&rows).map_err(|e| format!("JSON encoding failed: {}", e))
    }

    /// Prints the post-apply summary.
    pub fn apply_summary(report: &ApplyReport) {
        Self::header("SUMMARY");
        println!("  Renamed: {}", report.renamed_files.to_string().green());

        if !report.skipped_files.is_empty() {
            println!("  Skipped: {}", report.skipped_files.len());
            for (name, reason) in &report.skipped_files {
                println!("    - {}: {}", name, reason);
            }
        }

        if !report.failed_renames.is_empty() {
            println!(
                "  Failed:  {}",
                report.failed_renames.len().to_string().red()
            );
            for (name, reason) in &report.failed_renames {
                eprintln!("    - {}: {}", name, reason);
            }
        }
    }
}
