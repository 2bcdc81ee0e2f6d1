//! Ordered, possibly nested collections of rules.

use indexmap::IndexMap;

use crate::rule::Rule;
use crate::validators::{ObjectArrayMarker, ObjectMarker};

/// What a rule set holds under one property key.
#[derive(Debug, Clone)]
pub enum RuleEntry {
    /// A rule for a scalar (or file) field.
    Rule(Rule),
    /// Rules for a single nested object.
    Nested(RuleSet),
    /// Rules for selected elements of an array of objects, by index.
    Indexed(IndexMap<usize, RuleSet>),
    /// The field holds an instance of a registered type.
    Object(ObjectMarker),
    /// The field holds a list of instances of a registered type.
    ObjectArray(ObjectArrayMarker),
}

/// Ordered mapping from property key to [`RuleEntry`].
///
/// Insertion order is the order in which fields are validated and in which
/// failures appear in the report. Rule sets are cheap to build and are meant
/// to be rebuilt from the instance on every validation, which is how fields
/// that depend on other fields are expressed:
///
/// ```
/// use formguard_validator::rule::{Rule, RuleOptions, RuleSet};
///
/// fn registration_rules(account_type: &str) -> Result<RuleSet, formguard_validator::Error> {
///     let mut rules = RuleSet::new()
///         .rule(Rule::string("Account type", "accountType")?)
///         .rule(Rule::email("Email", "email")?);
///
///     if account_type == "business" {
///         rules = rules.rule(Rule::new("Business name", "businessName", RuleOptions::string().length(2, 150))?);
///     }
///     Ok(rules)
/// }
///
/// assert_eq!(registration_rules("business")?.len(), 3);
/// assert_eq!(registration_rules("personal")?.len(), 2);
/// # Ok::<(), formguard_validator::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: IndexMap<String, RuleEntry>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule under its own property key.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.push(rule);
        self
    }

    /// Adds rules for a nested object under `key`.
    #[must_use = "builder methods must be chained or built"]
    pub fn nested(mut self, key: impl Into<String>, rules: RuleSet) -> Self {
        self.insert(key, RuleEntry::Nested(rules));
        self
    }

    /// Adds per-index rules for an array of objects under `key`.
    #[must_use = "builder methods must be chained or built"]
    pub fn indexed(
        mut self,
        key: impl Into<String>,
        rules: impl IntoIterator<Item = (usize, RuleSet)>,
    ) -> Self {
        self.insert(key, RuleEntry::Indexed(rules.into_iter().collect()));
        self
    }

    /// Declares that `key` holds an instance of `type_key`.
    #[must_use = "builder methods must be chained or built"]
    pub fn object(mut self, key: impl Into<String>, type_key: impl Into<String>) -> Self {
        let key = key.into();
        let marker = ObjectMarker::new(key.clone(), type_key);
        self.insert(key, RuleEntry::Object(marker));
        self
    }

    /// Declares that `key` holds a list of instances of `type_key`.
    #[must_use = "builder methods must be chained or built"]
    pub fn object_array(mut self, key: impl Into<String>, type_key: impl Into<String>) -> Self {
        let key = key.into();
        let marker = ObjectArrayMarker::new(key.clone(), type_key);
        self.insert(key, RuleEntry::ObjectArray(marker));
        self
    }

    /// Adds a rule under its own property key, replacing any previous entry.
    pub fn push(&mut self, rule: Rule) {
        let key = rule.property().to_owned();
        self.entries.insert(key, RuleEntry::Rule(rule));
    }

    /// Inserts an entry. A replaced entry keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, entry: RuleEntry) -> Option<RuleEntry> {
        self.entries.insert(key.into(), entry)
    }

    /// Removes an entry, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<RuleEntry> {
        self.entries.shift_remove(key)
    }

    /// Looks up an entry.
    pub fn get(&self, key: &str) -> Option<&RuleEntry> {
        self.entries.get(key)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, RuleEntry> {
        self.entries.iter()
    }

    /// True when any entry, at any depth, is an unresolved marker.
    pub fn has_markers(&self) -> bool {
        self.entries.values().any(|entry| match entry {
            RuleEntry::Object(_) | RuleEntry::ObjectArray(_) => true,
            RuleEntry::Nested(set) => set.has_markers(),
            RuleEntry::Indexed(sets) => sets.values().any(RuleSet::has_markers),
            RuleEntry::Rule(_) => false,
        })
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = (&'a String, &'a RuleEntry);
    type IntoIter = indexmap::map::Iter<'a, String, RuleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for RuleSet {
    type Item = (String, RuleEntry);
    type IntoIter = indexmap::map::IntoIter<String, RuleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, RuleEntry)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, RuleEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        rules.into_iter().fold(Self::new(), RuleSet::rule)
    }
}
