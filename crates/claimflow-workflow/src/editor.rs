//! # Approval Set Editor
//!
//! Operator-facing edits to the approved set. Toggling a suggestion is the
//! primary interaction; manual entry, description edits, and removal serve
//! correction on the Review stage.

use claimflow_core::{CodePatch, CodeSuggestion, CodeSystem};
use claimflow_store::DraftStore;

use crate::error::ValidationError;

/// Confidence assigned to manually entered codes.
pub const MANUAL_SCORE: f64 = 0.85;

/// Reason attached to manually entered codes.
pub const MANUAL_REASON: &str = "Manually added code";

/// A code typed in by the operator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualCode {
    pub code: String,
    /// Defaults to ICD-10.
    pub system: CodeSystem,
    pub description: String,
}

impl ManualCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            system: CodeSystem::default(),
            description: description.into(),
        }
    }

    pub fn with_system(mut self, system: impl Into<CodeSystem>) -> Self {
        self.system = system.into();
        self
    }

    /// Validate and convert into an approved entry.
    pub fn into_suggestion(self) -> Result<CodeSuggestion, ValidationError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(ValidationError::CodeRequired);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::DescriptionRequired);
        }
        Ok(CodeSuggestion {
            code: code.to_string(),
            system: self.system,
            description: description.to_string(),
            score: MANUAL_SCORE,
            reason: MANUAL_REASON.to_string(),
        })
    }
}

/// Edits the approved set of one draft.
#[derive(Debug, Clone, Copy)]
pub struct ApprovalEditor<'a> {
    draft: &'a DraftStore,
}

impl<'a> ApprovalEditor<'a> {
    pub fn new(draft: &'a DraftStore) -> Self {
        Self { draft }
    }

    /// Toggle `suggestion`. Returns whether it is approved afterwards.
    pub fn toggle(&self, suggestion: CodeSuggestion) -> bool {
        let code = suggestion.code.clone();
        let approved = self.draft.toggle_approved(suggestion);
        tracing::debug!(%code, approved, "toggled code");
        approved
    }

    /// Toggle the cached suggestion with `code`.
    ///
    /// Returns `None` when no cached suggestion has that code.
    pub fn toggle_suggested(&self, code: &str) -> Option<bool> {
        let suggestion = self
            .draft
            .read(|d| d.suggestions.iter().find(|s| s.code == code).cloned())?;
        Some(self.toggle(suggestion))
    }

    /// Validate and append a manual entry.
    ///
    /// The set does not reject a duplicate code; callers that care check
    /// [`ApprovalEditor::is_approved`] first.
    pub fn add_manual(&self, entry: ManualCode) -> Result<CodeSuggestion, ValidationError> {
        let suggestion = entry.into_suggestion()?;
        self.draft.add_approved(suggestion.clone());
        tracing::info!(code = %suggestion.code, system = %suggestion.system, "manual code added");
        Ok(suggestion)
    }

    /// Replace the description of the approved entry with `code`.
    ///
    /// Returns `Ok(false)` when no entry has that code.
    pub fn describe(&self, code: &str, description: &str) -> Result<bool, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::DescriptionRequired);
        }
        Ok(self
            .draft
            .update_approved(code, &CodePatch::description(description)))
    }

    /// Remove the approved entry with `code`. Returns whether one was removed.
    pub fn remove(&self, code: &str) -> bool {
        self.draft.remove_approved(code)
    }

    pub fn is_approved(&self, code: &str) -> bool {
        self.draft.read(|d| d.approved.contains(code))
    }
}
