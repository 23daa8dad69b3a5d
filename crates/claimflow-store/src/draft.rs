//! # Claim Draft Store
//!
//! Holds the single in-flight [`ClaimDraft`] and writes it through to the
//! `claim-storage` partition on every mutation.
//!
//! All operations run under one `parking_lot::RwLock`, which is never held
//! across an `.await`. The partition write happens under the same write lock
//! so the file always reflects the latest in-memory mutation.

use std::sync::Arc;

use claimflow_core::{
    claim::sanitize_amount, ApprovedSet, ClaimDraft, CodePatch, CodeSuggestion, Entity,
};
use parking_lot::RwLock;

use crate::partition::{LocalStorage, Partition};

/// Shared handle to the persisted claim draft.
#[derive(Debug, Clone)]
pub struct DraftStore {
    state: Arc<RwLock<ClaimDraft>>,
    partition: Partition,
}

impl DraftStore {
    /// Partition name for the draft.
    pub const PARTITION: &'static str = "claim-storage";

    /// Open the draft partition in `storage`, rehydrating any saved draft.
    pub fn open(storage: &LocalStorage) -> Self {
        let partition = storage.partition(Self::PARTITION);
        let draft: ClaimDraft = partition.load();
        tracing::debug!(
            approved = draft.approved.len(),
            has_text = draft.has_text(),
            "rehydrated claim draft"
        );
        Self {
            state: Arc::new(RwLock::new(draft)),
            partition,
        }
    }

    /// A store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            state: Arc::new(RwLock::new(ClaimDraft::new())),
            partition: Partition::ephemeral(Self::PARTITION),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// A copy of the whole draft.
    pub fn snapshot(&self) -> ClaimDraft {
        self.state.read().clone()
    }

    /// Run `f` against the current draft without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&ClaimDraft) -> R) -> R {
        f(&*self.state.read())
    }

    pub fn text(&self) -> String {
        self.read(|d| d.text.clone())
    }

    pub fn entities(&self) -> Vec<Entity> {
        self.read(|d| d.entities.clone())
    }

    pub fn suggestions(&self) -> Vec<CodeSuggestion> {
        self.read(|d| d.suggestions.clone())
    }

    pub fn approved(&self) -> ApprovedSet {
        self.read(|d| d.approved.clone())
    }

    pub fn amount(&self) -> f64 {
        self.read(|d| d.amount)
    }

    pub fn signed_by(&self) -> String {
        self.read(|d| d.signed_by.clone())
    }

    /// Current ingestion counter.
    pub fn ingestion(&self) -> u64 {
        self.read(|d| d.ingestion)
    }

    // ── Field setters ────────────────────────────────────────────────

    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|d| d.text = text);
    }

    pub fn set_entities(&self, entities: Vec<Entity>) {
        self.mutate(|d| d.entities = entities);
    }

    pub fn set_suggestions(&self, suggestions: Vec<CodeSuggestion>) {
        self.mutate(|d| d.suggestions = suggestions);
    }

    pub fn set_approved(&self, approved: ApprovedSet) {
        self.mutate(|d| d.approved = approved);
    }

    /// Set the amount. Negative or non-finite input is stored as `0.0`.
    pub fn set_amount(&self, amount: f64) {
        self.mutate(|d| d.amount = sanitize_amount(amount));
    }

    pub fn set_signed_by(&self, signed_by: impl Into<String>) {
        let signed_by = signed_by.into();
        self.mutate(|d| d.signed_by = signed_by);
    }

    /// Record a fresh ingestion: replace text and entities, replace the
    /// suggestion cache (empty unless the ingestion returned suggestions),
    /// and bump the ingestion counter. Approved codes are kept.
    ///
    /// Returns the new ingestion counter.
    pub fn apply_ingestion(
        &self,
        text: impl Into<String>,
        entities: Vec<Entity>,
        suggestions: Vec<CodeSuggestion>,
    ) -> u64 {
        let text = text.into();
        self.mutate(|d| {
            d.text = text;
            d.entities = entities;
            d.suggestions = suggestions;
            d.ingestion = d.ingestion.wrapping_add(1);
            d.ingestion
        })
    }

    /// Replace the suggestion cache only if no ingestion happened since
    /// `ingestion` was read. Returns whether the suggestions were applied.
    pub fn apply_suggestions(&self, ingestion: u64, suggestions: Vec<CodeSuggestion>) -> bool {
        let mut guard = self.state.write();
        if guard.ingestion != ingestion {
            return false;
        }
        guard.suggestions = suggestions;
        if let Err(e) = self.partition.save(&*guard) {
            tracing::warn!(partition = Self::PARTITION, "failed to persist claim draft: {e}");
        }
        true
    }

    // ── Approved set ─────────────────────────────────────────────────

    /// Insert if `suggestion.code` is absent, otherwise remove it.
    /// Returns whether the code is approved afterwards.
    pub fn toggle_approved(&self, suggestion: CodeSuggestion) -> bool {
        self.mutate(|d| d.approved.toggle(suggestion))
    }

    /// Append without a uniqueness check.
    pub fn add_approved(&self, suggestion: CodeSuggestion) {
        self.mutate(|d| d.approved.add(suggestion));
    }

    /// Shallow-patch the entry with `code`; no-op when absent.
    pub fn update_approved(&self, code: &str, patch: &CodePatch) -> bool {
        self.mutate(|d| d.approved.update(code, patch))
    }

    /// Remove the entry with `code`; no-op when absent.
    pub fn remove_approved(&self, code: &str) -> bool {
        self.mutate(|d| d.approved.remove(code))
    }

    /// Restore the empty draft.
    pub fn reset(&self) {
        self.mutate(ClaimDraft::clear);
        tracing::info!("claim draft reset");
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut ClaimDraft) -> R) -> R {
        let mut guard = self.state.write();
        let result = f(&mut *guard);
        if let Err(e) = self.partition.save(&*guard) {
            tracing::warn!(partition = Self::PARTITION, "failed to persist claim draft: {e}");
        }
        result
    }
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
