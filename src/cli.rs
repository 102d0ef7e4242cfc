//! Command-line interface module for batchren.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing and validation
//! - File ingestion (explicit files, directory listings, glob filtering)
//! - Recomputing target names through the rename pipeline
//! - Preview and apply orchestration

use crate::config::RulesConfig;
use crate::output::OutputFormatter;
use crate::pipeline::RenamePipeline;
use crate::renamer::{ApplyReport, BatchEntry, BatchRenamer};
use crate::rule::Rule;
use clap::{Parser, ValueEnum};
use glob::Pattern;
use rand::Rng;
use std::fs;
use std::path::PathBuf;

/// Entry counts above this get a progress bar during the apply phase.
const PROGRESS_THRESHOLD: usize = 16;

/// Batch ordering by current file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Ascending name order.
    Asc,
    /// Descending name order.
    Desc,
}

/// Rename batches of files by applying an ordered list of rules to each name.
#[derive(Debug, Parser)]
#[command(name = "batchren", version)]
pub struct Cli {
    /// Files to rename; a directory contributes its files (non-recursive).
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Rule-set file (TOML). Falls back to .batchrenrc.toml in the current
    /// directory, then ~/.config/batchren/rules.toml, then no rules at all.
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Only pick up names matching this glob when expanding directories.
    #[arg(long, value_name = "GLOB")]
    pub include: Option<String>,

    /// Batch order by current name.
    #[arg(long, value_enum, default_value = "asc")]
    pub sort: SortOrder,

    /// Preview the computed names without renaming anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the preview as JSON instead of a table (implies --dry-run).
    #[arg(long)]
    pub json: bool,

    /// Keep going when one file fails instead of aborting the whole batch.
    #[arg(long)]
    pub keep_going: bool,
}

/// Runs the CLI application with the given arguments.
///
/// This is the main entry point for CLI operations: it loads the rule set,
/// gathers the batch, recomputes every target name, previews, and applies
/// unless a dry run was requested.
pub fn run_cli(cli: Cli) -> Result<(), String> {
    run_cli_with_pipeline(cli, RenamePipeline::new())
}

/// Runs the CLI application with an explicit pipeline.
///
/// Exists so callers (and tests) can supply a pipeline built around a seeded
/// random source.
pub fn run_cli_with_pipeline<R: Rng>(
    cli: Cli,
    mut pipeline: RenamePipeline<R>,
) -> Result<(), String> {
    let config = RulesConfig::load(cli.rules.as_deref())
        .map_err(|e| format!("Error loading rule set: {}", e))?;
    let rule_set = config.into_rule_set();

    let include = match &cli.include {
        Some(raw) => Some(
            Pattern::new(raw).map_err(|e| format!("Invalid include pattern '{}': {}", raw, e))?,
        ),
        None => None,
    };

    let mut entries = collect_entries(&cli.paths, include.as_ref())?;
    if entries.is_empty() {
        OutputFormatter::warning("No files to rename.");
        return Ok(());
    }

    sort_entries(&mut entries, cli.sort);

    OutputFormatter::info(&format!(
        "Applying {} rules to {} files",
        rule_set.len(),
        entries.len()
    ));

    compute_targets(
        &mut entries,
        rule_set.rules(),
        &mut pipeline,
        cli.keep_going,
    )?;

    if cli.json {
        let payload = OutputFormatter::json_preview(&entries)?;
        OutputFormatter::plain(&payload);
        return Ok(());
    }

    OutputFormatter::preview_table(&entries);

    if cli.dry_run {
        OutputFormatter::success("Dry run complete. No files were modified.");
        return Ok(());
    }

    let report = apply_renames(&mut entries);
    OutputFormatter::apply_summary(&report);

    if !report.failed_renames.is_empty() {
        OutputFormatter::warning("Some files could not be renamed. Please review the errors above.");
    }

    Ok(())
}

/// Gathers batch entries from the given paths.
///
/// Explicit files are taken as-is; directories contribute their regular files
/// (non-recursive), optionally filtered by the include pattern.
fn collect_entries(paths: &[PathBuf], include: Option<&Pattern>) -> Result<Vec<BatchEntry>, String> {
    let mut entries = Vec::new();

    for path in paths {
        if path.is_dir() {
            let listing = fs::read_dir(path)
                .map_err(|e| format!("Error reading directory {}: {}", path.display(), e))?;

            for item in listing.flatten() {
                if let Ok(file_type) = item.file_type()
                    && file_type.is_file()
                {
                    push_entry(&mut entries, item.path(), include);
                }
            }
        } else if path.is_file() {
            // Explicitly named files bypass the include filter.
            push_entry(&mut entries, path.clone(), None);
        } else {
            return Err(format!("No such file or directory: {}", path.display()));
        }
    }

    Ok(entries)
}

fn push_entry(entries: &mut Vec<BatchEntry>, path: PathBuf, include: Option<&Pattern>) {
    let Some(entry) = BatchEntry::new(path.clone()) else {
        OutputFormatter::warning(&format!(
            "Skipping {}: file name is not valid UTF-8",
            path.display()
        ));
        return;
    };

    if let Some(pattern) = include
        && !pattern.matches(&entry.name)
    {
        return;
    }

    entries.push(entry);
}

fn sort_entries(entries: &mut [BatchEntry], order: SortOrder) {
    match order {
        SortOrder::Asc => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::Desc => entries.sort_by(|a, b| b.name.cmp(&a.name)),
    }
}

/// Recomputes every entry's target name from scratch.
///
/// The default contract is whole-batch: any pipeline failure aborts the pass
/// and no entry's computed name is updated. With `keep_going`, failures are
/// recorded on the affected entries instead, and the rest of the batch still
/// gets fresh names.
fn compute_targets<R: Rng>(
    entries: &mut [BatchEntry],
    rules: &[Rule],
    pipeline: &mut RenamePipeline<R>,
    keep_going: bool,
) -> Result<(), String> {
    let names: Vec<String> = entries.iter().map(|entry| entry.name.clone()).collect();

    if keep_going {
        let results = pipeline.compute_each(&names, rules);
        for (entry, result) in entries.iter_mut().zip(results) {
            match result {
                Ok(new_name) => entry.new_name = new_name,
                Err(e) => {
                    entry.status = Some(format!("Could not compute a new name: {}", e));
                }
            }
        }
        return Ok(());
    }

    let computed = pipeline
        .compute_all(&names, rules)
        .map_err(|e| format!("Applying rules failed: {}", e))?;
    for (entry, new_name) in entries.iter_mut().zip(computed) {
        entry.new_name = new_name;
    }

    Ok(())
}

/// Renames every entry whose computed name differs from its current one.
///
/// A single failed rename never aborts the pass: the failure lands on the
/// entry's status and in the report, and the loop moves on.
fn apply_renames(entries: &mut [BatchEntry]) -> ApplyReport {
    let mut report = ApplyReport::new();
    let progress = (entries.len() > PROGRESS_THRESHOLD)
        .then(|| OutputFormatter::create_progress_bar(entries.len() as u64));

    for entry in entries.iter_mut() {
        if let Some(status) = entry.status.clone() {
            // A compute failure was recorded earlier; never touch the file.
            report.skipped_files.push((entry.name.clone(), status));
        } else if entry.new_name == entry.name {
            entry.status = Some("Unchanged".to_string());
            report
                .skipped_files
                .push((entry.name.clone(), "name unchanged".to_string()));
        } else {
            match BatchRenamer::rename_entry(entry) {
                Ok(()) => {
                    entry.status = Some("Renamed".to_string());
                    report.renamed_files += 1;
                }
                Err(e) => {
                    entry.status = Some(format!("Could not rename the file: {}", e));
                    report.failed_renames.push((entry.name.clone(), e.to_string()));
                }
            }
        }

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    report
}
