/// Applying computed names to the filesystem.
///
/// This module owns the batch entries (a file's path, its current name, the
/// computed target name, and the status recorded after a rename attempt) and
/// performs the actual renames inside each entry's parent directory.
use std::fs;
use std::path::PathBuf;

/// One file in the batch.
///
/// `new_name` starts out equal to `name` and is overwritten from scratch on
/// every pipeline run; `status` is only set once a rename (or a per-file
/// compute in keep-going mode) has actually been attempted.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// The file's current full path.
    pub path: PathBuf,
    /// The current file name component.
    pub name: String,
    /// The computed target name.
    pub new_name: String,
    /// Outcome of the last attempt on this entry.
    pub status: Option<String>,
}

impl BatchEntry {
    /// Builds an entry from a path. Returns `None` when the path has no file
    /// name component or the name is not valid UTF-8; the pipeline operates
    /// on strings, so such files are skipped rather than renamed lossily.
    pub fn new(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self {
            new_name: name.clone(),
            name,
            path,
            status: None,
        })
    }
}

/// Errors that can occur while renaming a single entry.
#[derive(Debug)]
pub enum ApplyError {
    /// The entry's path has no parent directory to rename within.
    MissingParent { path: PathBuf },
    /// The filesystem rename itself failed.
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParent { path } => {
                write!(f, "No parent directory for {}", path.display())
            }
            Self::RenameFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to rename {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ApplyError {}

/// Result type for apply operations.
pub type ApplyResult<T> = Result<T, ApplyError>;

/// Tallies for one apply pass over the batch.
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Number of files successfully renamed.
    pub renamed_files: usize,
    /// Entries that were left alone, with the reason.
    pub skipped_files: Vec<(String, String)>,
    /// Entries whose rename failed, with the reason.
    pub failed_renames: Vec<(String, String)>,
}

impl ApplyReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of entries processed.
    pub fn total_processed(&self) -> usize {
        self.renamed_files + self.skipped_files.len() + self.failed_renames.len()
    }

    /// Returns true if nothing was skipped or failed.
    pub fn is_complete_success(&self) -> bool {
        self.skipped_files.is_empty() && self.failed_renames.is_empty()
    }
}

/// Renames batch entries in place on the filesystem.
pub struct BatchRenamer;

impl BatchRenamer {
    /// Renames one entry to its computed name, inside its parent directory.
    ///
    /// On success the entry's path and name are updated to the new location,
    /// so a later pass sees the renamed file as its own starting point. The
    /// caller decides what a failure means for the rest of the batch; this
    /// function only ever touches its own entry.
    ///
    /// No conflict detection is performed: if the target name already exists
    /// the outcome is whatever the platform's rename semantics dictate.
    pub fn rename_entry(entry: &mut BatchEntry) -> ApplyResult<()> {
        let parent = entry
            .path
            .parent()
            .ok_or_else(|| ApplyError::MissingParent {
                path: entry.path.clone(),
            })?;
        let target = parent.join(&entry.new_name);

        fs::rename(&entry.path, &target).map_err(|e| ApplyError::RenameFailed {
            from: entry.path.clone(),
            to: target.clone(),
            source: e,
        })?;

        entry.path = target;
        entry.name = entry.new_name.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry_for(dir: &TempDir, name: &str) -> BatchEntry {
        let path = dir.path().join(name);
        fs::write(&path, "content").expect("Failed to write test file");
        BatchEntry::new(path).expect("Failed to build entry")
    }

    #[test]
    fn test_entry_starts_with_identical_names() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let entry = entry_for(&dir, "photo.jpg");

        assert_eq!(entry.name, "photo.jpg");
        assert_eq!(entry.new_name, "photo.jpg");
        assert!(entry.status.is_none());
    }

    #[test]
    fn test_rename_entry_moves_the_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut entry = entry_for(&dir, "old.txt");
        entry.new_name = "new.txt".to_string();

        BatchRenamer::rename_entry(&mut entry).expect("Rename failed");

        assert!(!dir.path().join("old.txt").exists());
        assert!(dir.path().join("new.txt").exists());
        assert_eq!(entry.name, "new.txt");
        assert_eq!(entry.path, dir.path().join("new.txt"));
    }

    #[test]
    fn test_rename_entry_missing_source_fails() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let mut entry = BatchEntry::new(dir.path().join("ghost.txt")).expect("Failed to build");
        entry.new_name = "solid.txt".to_string();

        let result = BatchRenamer::rename_entry(&mut entry);
        assert!(matches!(result, Err(ApplyError::RenameFailed { .. })));
        // The entry keeps pointing at the original location after a failure.
        assert_eq!(entry.name, "ghost.txt");
    }

    #[test]
    fn test_entry_rejects_non_file_paths() {
        assert!(BatchEntry::new(PathBuf::from("/")).is_none());
    }
}
