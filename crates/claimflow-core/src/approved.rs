//! # Approved Code Set
//!
//! The operator-curated, ordered set of codes that will be submitted with a
//! claim. Membership is keyed by `code`.
//!
//! ## Operations
//!
//! | Operation | Effect | When `code` is absent |
//! |-----------|--------|-----------------------|
//! | `toggle`  | remove every entry with the code | append |
//! | `add`     | append unconditionally | append |
//! | `remove`  | remove every entry with the code | no-op |
//! | `update`  | shallow-patch every entry with the code | no-op |
//!
//! `toggle`, `remove`, and `update` never introduce a duplicate code.
//! `add` does not check for one: the manual-entry path is trusted to avoid
//! duplicates, and the same code under a different system is allowed.

use serde::{Deserialize, Serialize};

use crate::domain::{CodePatch, CodeSuggestion};

/// Ordered sequence of approved codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApprovedSet(Vec<CodeSuggestion>);

impl ApprovedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether an entry with `code` is present.
    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|s| s.code == code)
    }

    /// The first entry with `code`.
    pub fn get(&self, code: &str) -> Option<&CodeSuggestion> {
        self.0.iter().find(|s| s.code == code)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CodeSuggestion> {
        self.0.iter()
    }

    /// Entries as a slice.
    pub fn as_slice(&self) -> &[CodeSuggestion] {
        &self.0
    }

    /// Codes in insertion order.
    pub fn codes(&self) -> Vec<&str> {
        self.0.iter().map(|s| s.code.as_str()).collect()
    }

    /// Insert `suggestion` if its code is absent, otherwise remove it.
    ///
    /// Returns `true` if the code is present after the call.
    pub fn toggle(&mut self, suggestion: CodeSuggestion) -> bool {
        if self.contains(&suggestion.code) {
            self.0.retain(|s| s.code != suggestion.code);
            false
        } else {
            self.0.push(suggestion);
            true
        }
    }

    /// Append `suggestion` without checking for an existing entry.
    pub fn add(&mut self, suggestion: CodeSuggestion) {
        self.0.push(suggestion);
    }

    /// Remove every entry with `code`. Returns whether anything was removed.
    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|s| s.code != code);
        self.0.len() != before
    }

    /// Shallow-patch every entry with `code`. Returns whether anything matched.
    pub fn update(&mut self, code: &str, patch: &CodePatch) -> bool {
        let mut matched = false;
        for entry in self.0.iter_mut().filter(|s| s.code == code) {
            entry.apply(patch);
            matched = true;
        }
        matched
    }

    /// Consume the set, returning the entries.
    pub fn into_vec(self) -> Vec<CodeSuggestion> {
        self.0
    }
}

impl From<Vec<CodeSuggestion>> for ApprovedSet {
    fn from(entries: Vec<CodeSuggestion>) -> Self {
        Self(entries)
    }
}

impl<'a> IntoIterator for &'a ApprovedSet {
    type Item = &'a CodeSuggestion;
    type IntoIter = std::slice::Iter<'a, CodeSuggestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
