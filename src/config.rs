//! Rule-set files.
//!
//! Rule sets are stored as TOML, one `[[rules]]` table per rule in
//! application order. Operation families with parameters are sub-tables;
//! toggles are plain booleans. Every field is optional, so a sparse rule
//! table is valid.
//!
//! ```toml
//! # Lowercase the stem, tidy whitespace, then underscore the gaps.
//! [[rules]]
//! trim = true
//! collapse_spaces = true
//!
//! [rules.casing]
//! lowercase = true
//!
//! [[rules]]
//! [rules.replace]
//! find = " "
//! with = "_"
//! ```
//!
//! Loading performs no semantic validation of rule contents: a malformed
//! regex or numeric marker surfaces when the pipeline runs, with the failure
//! semantics documented there, so rule data is accepted the same way however
//! it was produced.

use crate::rule::{Rule, RuleSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a rule-set file.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Rule-set file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading the file.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Rule-set file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid rule set: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading rule set: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A rule list as it appears on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RulesConfig {
    /// Load a rule set, with fallback to an empty one.
    ///
    /// Attempts to load in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.batchrenrc.toml` in the current directory
    /// 3. Look for `~/.config/batchren/rules.toml` in the home directory
    /// 4. Fall back to an empty rule list
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file cannot be read, or if
    /// a discovered file fails to parse.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".batchrenrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("batchren")
                .join("rules.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load a rule set from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Hands the loaded rules to a [`RuleSet`], which assigns ids and names.
    pub fn into_rule_set(self) -> RuleSet {
        RuleSet::from_rules(self.rules)
    }
}
