use batchren::cli::{Cli, SortOrder, run_cli, run_cli_with_pipeline};
/// Integration tests for batchren
///
/// These tests simulate real-world usage scenarios, testing the complete
/// end-to-end functionality of the batch renaming CLI.
///
/// Test categories:
/// 1. Applying rule files to a batch
/// 2. Dry-run and JSON preview modes
/// 3. Batch failure semantics (whole-batch abort vs. keep-going)
/// 4. Directory expansion and include filtering
/// 5. Random-number rules with an injected generator
use batchren::pipeline::RenamePipeline;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary directory with files to rename
/// and a rule-set file.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with a temporary directory.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    /// Get the path to the test directory.
    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file with content in the test directory.
    fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let file_path = self.path().join(name);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
        file_path
    }

    /// Write a rule-set file next to (but distinct from) the batch files.
    fn write_rules(&self, toml: &str) -> PathBuf {
        let rules_path = self.path().join("rules.toml");
        fs::write(&rules_path, toml).expect("Failed to write rules file");
        rules_path
    }

    /// Assert that a file exists at the given relative path.
    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    /// Assert that a file does NOT exist at the given relative path.
    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Names of the files currently in the directory, sorted.
    fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| {
                let entry = entry.ok()?;
                if entry.metadata().ok()?.is_file() {
                    Some(entry.file_name().to_string_lossy().to_string())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        names
    }
}

/// A Cli value with everything defaulted except the paths and rule file.
fn cli_for(paths: Vec<PathBuf>, rules: PathBuf) -> Cli {
    Cli {
        paths,
        rules: Some(rules),
        include: None,
        sort: SortOrder::Asc,
        dry_run: false,
        json: false,
        keep_going: false,
    }
}

const LOWERCASE_UNDERSCORE_RULES: &str = r#"
[[rules]]
[rules.casing]
lowercase = true

[[rules]]
trim = true

[rules.replace]
find = " "
with = "_"
"#;

// ============================================================================
// Applying rule files
// ============================================================================

#[test]
fn test_apply_renames_files_per_rule_file() {
    let fixture = TestFixture::new();
    let photo = fixture.create_file("My Photo.JPG", "jpeg bytes");
    let trip = fixture.create_file("Summer Trip.JPG", "jpeg bytes");
    let rules = fixture.write_rules(LOWERCASE_UNDERSCORE_RULES);

    run_cli(cli_for(vec![photo, trip], rules)).expect("CLI run failed");

    fixture.assert_file_exists("my_photo.JPG");
    fixture.assert_file_exists("summer_trip.JPG");
    fixture.assert_file_not_exists("My Photo.JPG");
    fixture.assert_file_not_exists("Summer Trip.JPG");
}

#[test]
fn test_empty_rule_file_changes_nothing() {
    let fixture = TestFixture::new();
    let file = fixture.create_file("Keep Me.txt", "text");
    let rules = fixture.write_rules("");

    run_cli(cli_for(vec![file], rules)).expect("CLI run failed");

    fixture.assert_file_exists("Keep Me.txt");
}

#[test]
fn test_extension_rule_renames_the_extension_too() {
    let fixture = TestFixture::new();
    let file = fixture.create_file("Photo.JPG", "jpeg bytes");
    let rules = fixture.write_rules(
        r#"
        [[rules]]
        apply_to_extension = true

        [rules.casing]
        lowercase = true
        "#,
    );

    run_cli(cli_for(vec![file], rules)).expect("CLI run failed");

    fixture.assert_file_exists("photo.jpg");
    fixture.assert_file_not_exists("Photo.JPG");
}

// ============================================================================
// Dry-run and JSON preview
// ============================================================================

#[test]
fn test_dry_run_leaves_files_untouched() {
    let fixture = TestFixture::new();
    let photo = fixture.create_file("My Photo.JPG", "jpeg bytes");
    let rules = fixture.write_rules(LOWERCASE_UNDERSCORE_RULES);

    let mut cli = cli_for(vec![photo], rules);
    cli.dry_run = true;
    run_cli(cli).expect("CLI run failed");

    fixture.assert_file_exists("My Photo.JPG");
    fixture.assert_file_not_exists("my_photo.JPG");
}

#[test]
fn test_json_preview_implies_dry_run() {
    let fixture = TestFixture::new();
    let photo = fixture.create_file("My Photo.JPG", "jpeg bytes");
    let rules = fixture.write_rules(LOWERCASE_UNDERSCORE_RULES);

    let mut cli = cli_for(vec![photo], rules);
    cli.json = true;
    run_cli(cli).expect("CLI run failed");

    fixture.assert_file_exists("My Photo.JPG");
    fixture.assert_file_not_exists("my_photo.JPG");
}

// ============================================================================
// Batch failure semantics
// ============================================================================

#[test]
fn test_malformed_regex_aborts_before_touching_any_file() {
    let fixture = TestFixture::new();
    let a = fixture.create_file("alpha.txt", "a");
    let b = fixture.create_file("beta.txt", "b");
    // The first rule is valid; the second one's pattern does not compile.
    let rules = fixture.write_rules(
        r#"
        [[rules]]
        [rules.insert]
        text = "renamed_"
        at = 0

        [[rules]]
        [rules.replace]
        find = "[broken"
        regex = true
        "#,
    );

    let result = run_cli(cli_for(vec![a, b], rules));
    assert!(result.is_err());

    fixture.assert_file_exists("alpha.txt");
    fixture.assert_file_exists("beta.txt");
    fixture.assert_file_not_exists("renamed_alpha.txt");
    fixture.assert_file_not_exists("renamed_beta.txt");
}

#[test]
fn test_keep_going_isolates_per_file_failures() {
    // The removal's literal start marker lands past its numeric end for
    // "abx.txt" but resolves harmlessly for "note.txt".
    const REMOVE_RULES: &str = r#"
    [[rules]]
    [rules.remove]
    start = "x"
    end = "1"
    end_is_offset = true
    "#;

    let strict = TestFixture::new();
    let a = strict.create_file("abx.txt", "a");
    let b = strict.create_file("note.txt", "b");
    let rules = strict.write_rules(REMOVE_RULES);

    let result = run_cli(cli_for(vec![a, b], rules));
    assert!(result.is_err());
    strict.assert_file_exists("abx.txt");
    strict.assert_file_exists("note.txt");

    let isolated = TestFixture::new();
    let a = isolated.create_file("abx.txt", "a");
    let b = isolated.create_file("note.txt", "b");
    let rules = isolated.write_rules(REMOVE_RULES);

    let mut cli = cli_for(vec![a, b], rules);
    cli.keep_going = true;
    run_cli(cli).expect("CLI run failed");

    isolated.assert_file_exists("abx.txt");
    isolated.assert_file_exists("ote.txt");
    isolated.assert_file_not_exists("note.txt");
}

// ============================================================================
// Directory expansion and filtering
// ============================================================================

#[test]
fn test_directory_expansion_with_include_filter() {
    let fixture = TestFixture::new();
    fixture.create_file("song.txt", "t");
    fixture.create_file("song.md", "m");
    let rules = fixture.write_rules(
        r#"
        [[rules]]
        [rules.casing]
        uppercase = true
        "#,
    );

    let mut cli = cli_for(vec![fixture.path().to_path_buf()], rules);
    cli.include = Some("*.txt".to_string());
    run_cli(cli).expect("CLI run failed");

    fixture.assert_file_exists("SONG.txt");
    // The markdown file and the rule file itself were filtered out.
    fixture.assert_file_exists("song.md");
    fixture.assert_file_exists("rules.toml");
}

// ============================================================================
// Random-number rules
// ============================================================================

#[test]
fn test_randomize_rule_with_injected_generator() {
    let fixture = TestFixture::new();
    let file = fixture.create_file("secret.doc", "contents");
    let rules = fixture.write_rules(
        r#"
        [[rules]]
        randomize = true
        "#,
    );

    let pipeline = RenamePipeline::with_rng(StdRng::seed_from_u64(1));
    run_cli_with_pipeline(cli_for(vec![file], rules), pipeline).expect("CLI run failed");

    fixture.assert_file_not_exists("secret.doc");

    let randomized: Vec<String> = fixture
        .file_names()
        .into_iter()
        .filter(|name| name.ends_with(".doc"))
        .collect();
    assert_eq!(randomized.len(), 1);

    let stem = randomized[0].strip_suffix(".doc").unwrap();
    assert_eq!(stem.len(), 9);
    assert!(stem.chars().all(|c| c.is_ascii_digit()));
}
