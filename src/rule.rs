//! Rule data model and rule-list management.
//!
//! A [`Rule`] is one configured transformation step. Each operation family is
//! either an optional parameter struct (present means enabled) or a plain
//! boolean toggle; a single rule may enable several families at once, and the
//! pipeline applies them in a fixed internal order.
//!
//! [`RuleSet`] owns the ordered rule list: it assigns stable ids at insertion,
//! regenerates the positional display names after every structural change, and
//! supports replacing an edited copy of a rule in place via its id.

use serde::{Deserialize, Serialize};

/// Insert text at a character offset, `-1` meaning "append at the end".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertOp {
    /// The text to insert.
    pub text: String,
    /// Character offset; `-1` or anything past the end appends.
    #[serde(default = "append_offset")]
    pub at: i64,
}

/// Replace every occurrence of a search text, literally or as a regex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaceOp {
    /// The search text. An empty search text disables the operation.
    pub find: String,
    /// The replacement text.
    #[serde(default)]
    pub with: String,
    /// Treat `find` as a regular expression instead of a literal.
    #[serde(default)]
    pub regex: bool,
}

/// Remove the span between a start marker and an end marker.
///
/// Markers are carried as raw text plus a numeric-offset flag. They stay
/// textual so that numeric parsing happens when the rule is applied, where an
/// unparsable marker falls back to offset 0 and the fold continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveOp {
    /// Start marker: a literal substring to locate, or a numeric offset.
    #[serde(default)]
    pub start: String,
    /// Interpret `start` as a numeric offset rather than a substring.
    #[serde(default)]
    pub start_is_offset: bool,
    /// End marker: a numeric offset, or nominally a literal substring.
    #[serde(default)]
    pub end: String,
    /// Interpret `end` as a numeric offset rather than a substring.
    #[serde(default)]
    pub end_is_offset: bool,
}

/// Casing toggles. Not mutually exclusive; the pipeline applies them in the
/// order the fields are declared here, each acting on the previous output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOps {
    #[serde(default)]
    pub lowercase: bool,
    #[serde(default)]
    pub uppercase: bool,
    /// Capitalize each word; word boundaries come from the pipeline.
    #[serde(default)]
    pub title_words: bool,
    /// Uppercase only the first character, leaving the rest untouched.
    #[serde(default)]
    pub capitalize_first: bool,
}

/// Insert a random number with `digits + 1` decimal digits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomNumberOp {
    /// Exponent of the lower bound: the number is drawn from
    /// `[10^digits, 10^(digits + 1))`.
    #[serde(default)]
    pub digits: u32,
    /// Character offset for the insertion; `-1` appends.
    #[serde(default = "append_offset")]
    pub at: i64,
}

fn append_offset() -> i64 {
    -1
}

/// One renaming rule.
///
/// `id` and `name` are list-management fields owned by [`RuleSet`]; they do
/// not round-trip through rule files, and a freshly deserialized rule carries
/// their defaults until it is added to a set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Stable id, unique within the owning rule set and never reused.
    #[serde(skip)]
    pub id: u64,
    /// Positional display name, `"Rule N"` (1-based).
    #[serde(skip)]
    pub name: String,

    /// Include the extension in the text the rule operates on. When false,
    /// operations see only the stem and the original extension is reattached
    /// afterward.
    #[serde(default)]
    pub apply_to_extension: bool,

    #[serde(default)]
    pub insert: Option<InsertOp>,
    #[serde(default)]
    pub replace: Option<ReplaceOp>,
    #[serde(default)]
    pub remove: Option<RemoveOp>,
    #[serde(default)]
    pub casing: CaseOps,

    /// Trim whitespace from both ends.
    #[serde(default)]
    pub trim: bool,
    /// Collapse runs of spaces (two sequential literal passes).
    #[serde(default)]
    pub collapse_spaces: bool,

    #[serde(default)]
    pub random_number: Option<RandomNumberOp>,
    /// Replace the entire name with a random 9-digit number, overriding every
    /// other operation on this rule.
    #[serde(default)]
    pub randomize: bool,
}

/// The ordered rule list.
///
/// # Examples
///
/// ```
/// use batchren::rule::{Rule, RuleSet};
///
/// let mut set = RuleSet::new();
/// set.push(Rule::default());
/// set.push(Rule::default());
/// assert_eq!(set.rules()[0].name, "Rule 1");
/// assert_eq!(set.rules()[1].name, "Rule 2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    next_id: u64,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            next_id: 1,
        }
    }

    /// Builds a set from rules in list order, assigning fresh ids.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        let mut set = Self::new();
        for rule in rules {
            set.push(rule);
        }
        set
    }

    /// Appends a rule and returns its assigned id.
    pub fn push(&mut self, mut rule: Rule) -> u64 {
        let id = self.take_id();
        rule.id = id;
        self.rules.push(rule);
        self.renumber();
        id
    }

    /// Splices a rule in at `index` (clamped to the end) and returns its id.
    pub fn insert(&mut self, index: usize, mut rule: Rule) -> u64 {
        let id = self.take_id();
        rule.id = id;
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
        self.renumber();
        id
    }

    /// Removes the rule at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<Rule> {
        if index >= self.rules.len() {
            return None;
        }
        let removed = self.rules.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Replaces the rule whose id matches `edited.id` with the edited copy,
    /// keeping its list position. Returns false when no rule has that id.
    pub fn replace(&mut self, edited: Rule) -> bool {
        for slot in &mut self.rules {
            if slot.id == edited.id {
                *slot = edited;
                self.renumber();
                return true;
            }
        }
        false
    }

    /// Swaps the rule at `index` with its predecessor.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.rules.len() {
            return false;
        }
        self.rules.swap(index, index - 1);
        self.renumber();
        true
    }

    /// Swaps the rule at `index` with its successor.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.rules.len() {
            return false;
        }
        self.rules.swap(index, index + 1);
        self.renumber();
        true
    }

    /// Removes every rule. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// The rules in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn take_id(&mut self) -> u64 {
        // next_id defaults to 0 when the set came from Default.
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn renumber(&mut self) {
        for (index, rule) in self.rules.iter_mut().enumerate() {
            rule.name = format!("Rule {}", index + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_ids_and_names() {
        let mut set = RuleSet::new();
        let first = set.push(Rule::default());
        let second = set.push(Rule::default());

        assert_ne!(first, second);
        assert_eq!(set.rules()[0].name, "Rule 1");
        assert_eq!(set.rules()[1].name, "Rule 2");
    }

    #[test]
    fn test_remove_renumbers_remaining_rules() {
        let mut set = RuleSet::new();
        set.push(Rule::default());
        set.push(Rule::default());
        set.push(Rule::default());

        set.remove(0);

        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[0].name, "Rule 1");
        assert_eq!(set.rules()[1].name, "Rule 2");
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut set = RuleSet::new();
        let first = set.push(Rule::default());
        set.remove(0);
        let second = set.push(Rule::default());

        assert_ne!(first, second);
    }

    #[test]
    fn test_replace_by_id_keeps_position() {
        let mut set = RuleSet::new();
        set.push(Rule::default());
        let target = set.push(Rule::default());
        set.push(Rule::default());

        let edited = Rule {
            id: target,
            trim: true,
            ..Default::default()
        };
        assert!(set.replace(edited));

        assert!(set.rules()[1].trim);
        assert_eq!(set.rules()[1].id, target);
        assert_eq!(set.rules()[1].name, "Rule 2");
    }

    #[test]
    fn test_replace_unknown_id_is_rejected() {
        let mut set = RuleSet::new();
        set.push(Rule::default());

        let edited = Rule {
            id: 999,
            ..Default::default()
        };
        assert!(!set.replace(edited));
    }

    #[test]
    fn test_move_up_and_down() {
        let mut set = RuleSet::new();
        let first = set.push(Rule::default());
        let second = set.push(Rule::default());

        assert!(set.move_up(1));
        assert_eq!(set.rules()[0].id, second);
        assert_eq!(set.rules()[0].name, "Rule 1");

        assert!(set.move_down(0));
        assert_eq!(set.rules()[0].id, first);

        assert!(!set.move_up(0));
        assert!(!set.move_down(1));
    }

    #[test]
    fn test_insert_splices_at_position() {
        let mut set = RuleSet::new();
        set.push(Rule::default());
        set.push(Rule::default());

        let spliced = set.insert(
            1,
            Rule {
                trim: true,
                ..Default::default()
            },
        );

        assert_eq!(set.rules()[1].id, spliced);
        assert!(set.rules()[1].trim);
        assert_eq!(set.rules()[2].name, "Rule 3");
    }
}
