//! # Claim Draft and Claim Record
//!
//! `ClaimDraft` is the single in-flight claim's working state, owned by the
//! draft store. `ClaimRecord` is one finalized entry in the claims history,
//! owned by the history store. Neither references the other.

use serde::{Deserialize, Serialize};

use crate::approved::ApprovedSet;
use crate::domain::{CodeSuggestion, Entity};
use crate::temporal::Timestamp;

// ─── Claim Draft ────────────────────────────────────────────────────

/// Working state of the claim being prepared.
///
/// Every field defaults, so a persisted draft missing newer fields still
/// loads. `signedBy` keeps its camelCase name in persisted form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimDraft {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub suggestions: Vec<CodeSuggestion>,
    #[serde(default)]
    pub approved: ApprovedSet,
    /// Billable amount, never negative.
    #[serde(default)]
    pub amount: f64,
    #[serde(default, rename = "signedBy")]
    pub signed_by: String,
    /// Incremented on every ingestion; used to detect responses issued
    /// against an earlier document.
    #[serde(default)]
    pub ingestion: u64,
}

impl ClaimDraft {
    /// An empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a document has been ingested.
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Whether the signer is blank after trimming.
    pub fn signer_is_blank(&self) -> bool {
        self.signed_by.trim().is_empty()
    }

    /// Whether every working field is at its initial value.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.entities.is_empty()
            && self.suggestions.is_empty()
            && self.approved.is_empty()
            && self.amount == 0.0
            && self.signed_by.is_empty()
    }

    /// Restore every working field to its initial value. The ingestion
    /// counter is kept so responses addressed to the cleared document stay
    /// recognizably stale.
    pub fn clear(&mut self) {
        let ingestion = self.ingestion;
        *self = Self {
            ingestion,
            ..Self::default()
        };
    }
}

/// Coerce an amount into the draft's domain: non-finite or negative values
/// become `0.0`.
pub fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

// ─── Claim Record ───────────────────────────────────────────────────

/// Identifier assigned to a claim by the claim-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(pub String);

impl ClaimId {
    /// Wrap a service-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One generated claim in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: ClaimId,
    pub date: Timestamp,
    pub codes_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

impl ClaimRecord {
    /// Abbreviated transaction hash for display, if any.
    pub fn short_tx_hash(&self) -> Option<String> {
        self.tx_hash.as_deref().map(shorten_hash)
    }
}

/// Abbreviate a long hash as `0x742d...a9c5`. Hashes of ten characters or
/// fewer are returned unchanged.
pub fn shorten_hash(hash: &str) -> String {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() <= 10 {
        return hash.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CodeSystem;

    fn sample_draft() -> ClaimDraft {
        let mut draft = ClaimDraft::new();
        draft.text = "Patient has type 2 diabetes".into();
        draft.approved.add(CodeSuggestion {
            code: "E11.9".into(),
            system: CodeSystem::Icd10,
            description: "Type 2 diabetes mellitus without complications".into(),
            score: 0.92,
            reason: String::new(),
        });
        draft.amount = 250.0;
        draft.signed_by = "Dr. Smith".into();
        draft.ingestion = 3;
        draft
    }

    #[test]
    fn new_draft_is_empty() {
        assert!(ClaimDraft::new().is_empty());
        assert!(!sample_draft().is_empty());
    }

    #[test]
    fn clear_keeps_ingestion_counter() {
        let mut draft = sample_draft();
        draft.clear();
        assert!(draft.is_empty());
        assert_eq!(draft.ingestion, 3);
    }

    #[test]
    fn signer_blank_after_trim() {
        let mut draft = ClaimDraft::new();
        draft.signed_by = "   ".into();
        assert!(draft.signer_is_blank());
        draft.signed_by = " Dr. Smith ".into();
        assert!(!draft.signer_is_blank());
    }

    #[test]
    fn persisted_shape_uses_signed_by_camel_case() {
        let json = serde_json::to_value(sample_draft()).unwrap();
        assert_eq!(json["signedBy"], "Dr. Smith");
        assert!(json.get("signed_by").is_none());
    }

    #[test]
    fn partial_persisted_draft_loads_with_defaults() {
        let draft: ClaimDraft = serde_json::from_str(r#"{"text":"note"}"#).unwrap();
        assert_eq!(draft.text, "note");
        assert!(draft.approved.is_empty());
        assert_eq!(draft.ingestion, 0);
    }

    #[test]
    fn sanitize_amount_rejects_negative_and_nan() {
        assert_eq!(sanitize_amount(250.0), 250.0);
        assert_eq!(sanitize_amount(-1.0), 0.0);
        assert_eq!(sanitize_amount(f64::NAN), 0.0);
        assert_eq!(sanitize_amount(f64::INFINITY), 0.0);
    }

    #[test]
    fn record_omits_absent_optionals() {
        let record = ClaimRecord {
            id: ClaimId::new("CLM-001"),
            date: Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
            codes_count: 1,
            amount: None,
            tx_hash: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "CLM-001");
        assert_eq!(json["date"], "2026-01-15T12:00:00Z");
        assert!(json.get("amount").is_none());
        assert!(json.get("tx_hash").is_none());
    }

    #[test]
    fn shorten_hash_matches_badge_format() {
        assert_eq!(
            shorten_hash("0x742d35cc6634c0532925a3b844bc9e7fe6e0d3f1b3f3e9c2d0f5a9b5f3e7a9c5"),
            "0x742d...a9c5"
        );
        assert_eq!(shorten_hash("0xabc"), "0xabc");
    }
}
