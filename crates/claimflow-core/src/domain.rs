//! # Clinical Entities and Code Suggestions
//!
//! Wire-level shapes produced by the external extraction and suggestion
//! services. Field names match the coding service's JSON exactly.
//!
//! `EntityLabel` and `CodeSystem` are open enumerations: the well-known
//! values get variants, anything else is carried through as `Other(String)`
//! and serialized back unchanged.

use serde::{Deserialize, Serialize};

// ─── Entity ─────────────────────────────────────────────────────────

/// Category assigned to an extracted span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    /// A diagnosis mention.
    Diagnosis,
    /// A procedure mention.
    Procedure,
    /// Fallback span covering the whole clinical text.
    ClinicalText,
    /// Any other label emitted by the extractor.
    Other(String),
}

impl EntityLabel {
    /// The wire name of this label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Diagnosis => "DIAGNOSIS",
            Self::Procedure => "PROCEDURE",
            Self::ClinicalText => "CLINICAL_TEXT",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for EntityLabel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "DIAGNOSIS" => Self::Diagnosis,
            "PROCEDURE" => Self::Procedure,
            "CLINICAL_TEXT" => Self::ClinicalText,
            _ => Self::Other(s),
        }
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        match label {
            EntityLabel::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled span of the source text identified by the extraction service.
///
/// `start`/`end` are character offsets into the ingested text. They are
/// expected to satisfy `0 <= start < end <= len(text)`, but entities are
/// taken as delivered; [`Entity::span_in`] checks the bounds at use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

impl Entity {
    /// Whether the offsets form a non-empty span within a text of
    /// `text_len` characters.
    pub fn is_within(&self, text_len: usize) -> bool {
        self.start < self.end && self.end <= text_len
    }

    /// The slice of `source` covered by this entity, or `None` if the
    /// offsets fall outside it.
    pub fn span_in<'a>(&self, source: &'a str) -> Option<&'a str> {
        if !self.is_within(source.chars().count()) {
            return None;
        }
        let begin = source.char_indices().nth(self.start).map(|(i, _)| i)?;
        let finish = source
            .char_indices()
            .nth(self.end)
            .map(|(i, _)| i)
            .unwrap_or(source.len());
        source.get(begin..finish)
    }
}

// ─── Code Suggestion ────────────────────────────────────────────────

/// Medical code system of a suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CodeSystem {
    /// ICD-10 diagnosis codes.
    #[default]
    Icd10,
    /// CPT procedure codes.
    Cpt,
    /// Any other code system string.
    Other(String),
}

impl CodeSystem {
    /// The wire name of this code system.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Icd10 => "ICD-10",
            Self::Cpt => "CPT",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for CodeSystem {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ICD-10" => Self::Icd10,
            "CPT" => Self::Cpt,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for CodeSystem {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<CodeSystem> for String {
    fn from(system: CodeSystem) -> Self {
        match system {
            CodeSystem::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for CodeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate billing code with confidence and rationale.
///
/// The natural key is `code`. Uniqueness is enforced only inside the
/// approved set, never across suggestion lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSuggestion {
    pub code: String,
    pub system: CodeSystem,
    pub description: String,
    /// Confidence in `[0, 1]`.
    pub score: f64,
    /// The suggestion service may send `null` here.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reason: String,
}

impl CodeSuggestion {
    /// Confidence as a whole percentage, clamped to `0..=100`.
    pub fn score_percent(&self) -> u8 {
        if !self.score.is_finite() {
            return 0;
        }
        (self.score.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    /// Apply a shallow patch: every `Some` field in `patch` replaces the
    /// corresponding field. The code itself is never patched.
    pub fn apply(&mut self, patch: &CodePatch) {
        if let Some(system) = &patch.system {
            self.system = system.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(score) = patch.score {
            self.score = score;
        }
        if let Some(reason) = &patch.reason {
            self.reason = reason.clone();
        }
    }
}

/// Partial update for an approved code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<CodeSystem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CodePatch {
    /// A patch that only replaces the description.
    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
