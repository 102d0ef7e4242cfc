//! The rename engine.
//!
//! [`RenamePipeline`] folds an ordered rule list over a file name: the output
//! of each rule is the input of the next, and the result after the last rule
//! is the file's computed new name. Within one rule, enabled operation
//! families always apply in the same fixed order: insert, replace, remove,
//! casing, trim, collapse spaces, random numbering, full randomization.
//!
//! The extension of the original name is captured once, before any rule runs.
//! A rule that does not opt into the extension sees only the stem and gets
//! the original extension reattached afterward; a rule that does opt in sees
//! stem plus original extension as one string.
//!
//! All offsets are character offsets, not byte offsets. The random source is
//! owned by the pipeline value, so tests construct one around a seeded
//! generator instead of relying on ambient randomness.

use crate::rule::{RemoveOp, Rule};
use rand::Rng;
use rand::rngs::ThreadRng;
use regex::Regex;

/// Lower bound (inclusive) of the full-randomization draw; the upper bound is
/// ten times this, exclusive, which makes every draw exactly nine digits.
const RANDOMIZE_LOW: i64 = 100_000_000;

/// Errors that abort a batch invocation.
///
/// An unparsable numeric marker in a Remove operation is not among them: it
/// falls back to offset 0 and the fold continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameError {
    /// A Replace operation's search text failed to compile as a regex.
    InvalidPattern { pattern: String, reason: String },
    /// An insertion offset below the append sentinel.
    InvalidOffset { offset: i64 },
    /// A removal span whose bounds stayed negative or inverted after
    /// normalization.
    InvalidRange { start: i64, end: i64 },
    /// A random-number digit count whose bounds cannot be represented.
    DigitCountTooLarge { digits: u32 },
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid replace pattern '{}': {}", pattern, reason)
            }
            Self::InvalidOffset { offset } => {
                write!(f, "Invalid insertion offset {}", offset)
            }
            Self::InvalidRange { start, end } => {
                write!(f, "Invalid removal range: start {} to end {}", start, end)
            }
            Self::DigitCountTooLarge { digits } => {
                write!(f, "Random number with {} digits is too large", digits)
            }
        }
    }
}

impl std::error::Error for RenameError {}

/// Result type for pipeline operations.
pub type RenameResult<T> = Result<T, RenameError>;

/// Folds rule lists over file names.
///
/// The pipeline is deterministic for a given input except for the two
/// random-number operations, which draw from the generator it was built with.
///
/// # Examples
///
/// ```
/// use batchren::pipeline::RenamePipeline;
/// use batchren::rule::{CaseOps, Rule};
///
/// let rule = Rule {
///     casing: CaseOps {
///         lowercase: true,
///         ..Default::default()
///     },
///     ..Default::default()
/// };
///
/// let mut pipeline = RenamePipeline::new();
/// assert_eq!(pipeline.compute("Photo.JPG", &[rule]).unwrap(), "photo.JPG");
/// ```
pub struct RenamePipeline<R: Rng = ThreadRng> {
    rng: R,
    word_boundary: fn(char) -> bool,
}

impl RenamePipeline<ThreadRng> {
    /// Creates a pipeline around the thread-local generator.
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl Default for RenamePipeline<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RenamePipeline<R> {
    /// Creates a pipeline around an explicit random source.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            word_boundary: char::is_whitespace,
        }
    }

    /// Overrides the word-boundary predicate used by title casing.
    pub fn with_word_boundary(mut self, boundary: fn(char) -> bool) -> Self {
        self.word_boundary = boundary;
        self
    }

    /// Computes the new name for one file.
    ///
    /// With an empty rule list the name is returned unchanged.
    pub fn compute(&mut self, original: &str, rules: &[Rule]) -> RenameResult<String> {
        let ext = extension_of(original).to_string();
        let mut current = original.to_string();

        for rule in rules {
            // The running name is re-split at its current final dot, but the
            // reattached extension is always the original one.
            let mut subject = strip_extension(&current).to_string();
            if rule.apply_to_extension {
                subject.push_str(&ext);
            }

            let mut subject = self.apply_rule(rule, subject)?;

            if !rule.apply_to_extension {
                subject.push_str(&ext);
            }
            current = subject;
        }

        Ok(current)
    }

    /// Computes new names for a whole batch, index-aligned with `names`.
    ///
    /// Any failure aborts the entire pass: no partial results are returned,
    /// and the caller keeps whatever names the last successful pass produced.
    pub fn compute_all<S: AsRef<str>>(
        &mut self,
        names: &[S],
        rules: &[Rule],
    ) -> RenameResult<Vec<String>> {
        names
            .iter()
            .map(|name| self.compute(name.as_ref(), rules))
            .collect()
    }

    /// Per-file variant of [`compute_all`](Self::compute_all): each file gets
    /// its own result and a failure does not disturb its neighbors.
    pub fn compute_each<S: AsRef<str>>(
        &mut self,
        names: &[S],
        rules: &[Rule],
    ) -> Vec<RenameResult<String>> {
        names
            .iter()
            .map(|name| self.compute(name.as_ref(), rules))
            .collect()
    }

    fn apply_rule(&mut self, rule: &Rule, mut subject: String) -> RenameResult<String> {
        if let Some(op) = &rule.insert {
            subject = splice_chars(&subject, op.at, &op.text)?;
        }

        if let Some(op) = &rule.replace
            && !op.find.is_empty()
        {
            if op.regex {
                let re = Regex::new(&op.find).map_err(|e| RenameError::InvalidPattern {
                    pattern: op.find.clone(),
                    reason: e.to_string(),
                })?;
                subject = re.replace_all(&subject, op.with.as_str()).into_owned();
            } else {
                subject = subject.replace(&op.find, &op.with);
            }
        }

        if let Some(op) = &rule.remove
            && !op.start.is_empty()
            && !op.end.is_empty()
        {
            subject = apply_remove(op, subject)?;
        }

        if rule.casing.lowercase {
            subject = subject.to_lowercase();
        }
        if rule.casing.uppercase {
            subject = subject.to_uppercase();
        }
        if rule.casing.title_words {
            subject = self.title_case(&subject);
        }
        if rule.casing.capitalize_first {
            subject = capitalize_first(&subject);
        }

        if rule.trim {
            subject = subject.trim().to_string();
        }

        if rule.collapse_spaces {
            // Two literal passes, triples then pairs. A long enough run of
            // spaces keeps some residue until a later invocation.
            subject = subject.replace("   ", " ").replace("  ", " ");
        }

        if let Some(op) = &rule.random_number {
            let number = self.random_with_digits(op.digits)?;
            subject = splice_chars(&subject, op.at, &number)?;
        }

        if rule.randomize {
            subject = self
                .rng
                .random_range(RANDOMIZE_LOW..RANDOMIZE_LOW * 10)
                .to_string();
        }

        Ok(subject)
    }

    fn random_with_digits(&mut self, digits: u32) -> RenameResult<String> {
        let low = 10i64
            .checked_pow(digits)
            .ok_or(RenameError::DigitCountTooLarge { digits })?;
        let high = low
            .checked_mul(10)
            .ok_or(RenameError::DigitCountTooLarge { digits })?;
        Ok(self.rng.random_range(low..high).to_string())
    }

    fn title_case(&self, subject: &str) -> String {
        let mut out = String::with_capacity(subject.len());
        let mut word = String::new();

        for ch in subject.chars() {
            if (self.word_boundary)(ch) {
                push_title_word(&mut out, &word);
                word.clear();
                out.push(ch);
            } else {
                word.push(ch);
            }
        }
        push_title_word(&mut out, &word);

        out
    }
}

fn apply_remove(op: &RemoveOp, subject: String) -> RenameResult<String> {
    let len = subject.chars().count() as i64;

    let mut start = if op.start_is_offset {
        let parsed = op.start.trim().parse::<i64>().unwrap_or(0);
        if parsed == -1 { len } else { parsed }
    } else {
        char_index_of(&subject, &op.start)
    };
    if start > len {
        start = len;
    }

    // TODO: a literal end marker resolves to the end of the subject instead
    // of being searched for. Confirm the intended behavior with the product
    // owner before changing this; saved rule files rely on it.
    let mut end = if op.end_is_offset {
        let parsed = op.end.trim().parse::<i64>().unwrap_or(0);
        if parsed == -1 { len } else { parsed }
    } else {
        len
    };
    if end > len {
        end = len;
    }

    if start == end {
        if start < 0 {
            return Err(RenameError::InvalidRange { start, end });
        }
        return Ok(subject.chars().take(start as usize).collect());
    }

    if start == -1 {
        start = 0;
    }
    if end == -1 {
        end = len;
    }
    if start < 0 || end < start {
        return Err(RenameError::InvalidRange { start, end });
    }

    Ok(remove_chars(&subject, start as usize, end as usize))
}

/// Everything from the final `.` on, or empty when there is no extension.
/// A trailing `.` does not count as an extension.
fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => &name[idx..],
        _ => "",
    }
}

/// The name up to its final `.`, or the whole name without one.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Byte position of the character at `char_idx`, saturating to the end.
fn byte_offset(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(idx, _)| idx)
}

/// Inserts `text` at character offset `at`; `-1` or past-the-end appends.
fn splice_chars(subject: &str, at: i64, text: &str) -> RenameResult<String> {
    let len = subject.chars().count() as i64;

    if at == -1 || at > len {
        let mut out = subject.to_string();
        out.push_str(text);
        return Ok(out);
    }
    if at < 0 {
        return Err(RenameError::InvalidOffset { offset: at });
    }

    let split = byte_offset(subject, at as usize);
    let mut out = String::with_capacity(subject.len() + text.len());
    out.push_str(&subject[..split]);
    out.push_str(text);
    out.push_str(&subject[split..]);
    Ok(out)
}

/// Removes the character span `[start, end)`.
fn remove_chars(subject: &str, start: usize, end: usize) -> String {
    let from = byte_offset(subject, start);
    let to = byte_offset(subject, end);
    let mut out = String::with_capacity(subject.len());
    out.push_str(&subject[..from]);
    out.push_str(&subject[to..]);
    out
}

/// Character index of the first occurrence of `needle`, `-1` when absent.
fn char_index_of(haystack: &str, needle: &str) -> i64 {
    match haystack.find(needle) {
        Some(byte) => haystack[..byte].chars().count() as i64,
        None => -1,
    }
}

fn capitalize_first(subject: &str) -> String {
    let mut chars = subject.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn push_title_word(out: &mut String, word: &str) {
    if word.is_empty() {
        return;
    }
    // Words without a lowercase letter are taken for acronyms and kept as-is.
    if !word.chars().any(char::is_lowercase) {
        out.push_str(word);
        return;
    }
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
}
