//! batchren - rule-based batch file renaming
//!
//! This library computes a new name for each file in a batch by folding an
//! ordered list of renaming rules over the file's current name, previews the
//! results, and applies the renames with per-file outcome reporting. Rule
//! sets load from TOML configuration files.

pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod renamer;
pub mod rule;

pub use config::{ConfigError, RulesConfig};
pub use pipeline::{RenameError, RenamePipeline, RenameResult};
pub use renamer::{ApplyError, ApplyReport, BatchEntry, BatchRenamer};
pub use rule::{Rule, RuleSet};

pub use cli::{Cli, run_cli, run_cli_with_pipeline};
