//! Request and response bodies for the coding service.
//!
//! Field names match the service's JSON exactly. Responses tolerate missing
//! list fields; claim metadata is open and keeps keys it does not model.

use claimflow_core::{ClaimId, CodeSuggestion, Entity};
use serde::{Deserialize, Deserializer, Serialize};

/// Explorer used when the claim metadata carries a hash but no explorer link.
pub const FALLBACK_EXPLORER: &str = "https://mumbai.polygonscan.com/tx/";

// -- Ingestion ----------------------------------------------------------------

/// Response to both ingest-text and ingest-file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IngestResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Vec<Entity>,
    /// Present only when the upload asked for auto-suggestion.
    #[serde(default)]
    pub suggestions: Option<Vec<CodeSuggestion>>,
}

/// A document to upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// File name sent in the multipart part. The service picks the
    /// extraction path from its extension.
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Multipart flags for ingest-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Ask the extractor to keep only clinically relevant text.
    pub clinical_only: bool,
    /// Ask the service to return suggestions with the extraction.
    pub auto_suggest: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            clinical_only: true,
            auto_suggest: false,
        }
    }
}

// -- Suggestion ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SuggestResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Vec<Entity>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggestions: Vec<CodeSuggestion>,
}

// -- Claim generation ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateClaimRequest {
    pub approved: Vec<CodeSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateClaimResponse {
    pub claim_id: ClaimId,
    /// The codes the service accepted. May be empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub approved: Vec<CodeSuggestion>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: ClaimMetadata,
}

/// Open metadata attached to a generated claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<TxInfo>,
    /// Keys not modeled above, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Nested transaction object some service versions send.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ClaimMetadata {
    /// The notarization hash: top-level `tx_hash` if non-empty, else `tx.hash`.
    pub fn transaction_hash(&self) -> Option<&str> {
        let nested = self.tx.as_ref().and_then(|tx| tx.hash.as_deref());
        self.tx_hash
            .as_deref()
            .filter(|h| !h.is_empty())
            .or(nested)
            .filter(|h| !h.is_empty())
    }

    /// Explorer link for the transaction: the service-provided link, or the
    /// fallback explorer when only a hash is known.
    pub fn explorer_url(&self) -> Option<String> {
        if let Some(explorer) = self.explorer.as_deref().filter(|e| !e.is_empty()) {
            return Some(explorer.to_string());
        }
        self.transaction_hash()
            .map(|hash| format!("{FALLBACK_EXPLORER}{hash}"))
    }
}

// -- CMS-1500 -----------------------------------------------------------------

/// The nine derivable CMS-1500 header fields.
///
/// Serialized flat; absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referring_npi: Option<String>,
}

impl FormFields {
    /// Field names in form order.
    pub const NAMES: [&'static str; 9] = [
        "patient_name",
        "patient_id",
        "provider_name",
        "date_of_service",
        "patient_dob",
        "patient_sex",
        "patient_address",
        "place_of_service",
        "referring_npi",
    ];

    /// Mutable access to a field by wire name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        Some(match name {
            "patient_name" => &mut self.patient_name,
            "patient_id" => &mut self.patient_id,
            "provider_name" => &mut self.provider_name,
            "date_of_service" => &mut self.date_of_service,
            "patient_dob" => &mut self.patient_dob,
            "patient_sex" => &mut self.patient_sex,
            "patient_address" => &mut self.patient_address,
            "place_of_service" => &mut self.place_of_service,
            "referring_npi" => &mut self.referring_npi,
            _ => return None,
        })
    }

    /// `(name, value)` pairs in form order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("patient_name", self.patient_name.as_deref()),
            ("patient_id", self.patient_id.as_deref()),
            ("provider_name", self.provider_name.as_deref()),
            ("date_of_service", self.date_of_service.as_deref()),
            ("patient_dob", self.patient_dob.as_deref()),
            ("patient_sex", self.patient_sex.as_deref()),
            ("patient_address", self.patient_address.as_deref()),
            ("place_of_service", self.place_of_service.as_deref()),
            ("referring_npi", self.referring_npi.as_deref()),
        ]
    }

    /// Drop blank values so they are omitted on the wire.
    pub fn without_blanks(mut self) -> Self {
        for name in Self::NAMES {
            if let Some(slot) = self.field_mut(name) {
                if slot.as_deref().is_some_and(|v| v.trim().is_empty()) {
                    *slot = None;
                }
            }
        }
        self
    }
}

/// Body of `POST /cms1500`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormPdfRequest {
    pub approved: Vec<CodeSuggestion>,
    pub text: String,
    #[serde(flatten)]
    pub fields: FormFields,
    /// One pointer list per approved row, 1-based into the diagnosis list.
    pub diag_pointers: Vec<Vec<u32>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClaimPdfRequest<'a> {
    pub approved: &'a [CodeSuggestion],
}

#[derive(Debug, Serialize)]
pub(crate) struct TextRequest<'a> {
    pub text: &'a str,
}

// -- Health -------------------------------------------------------------------

/// Result of probing the service's health endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// 2xx from `/health`.
    Healthy,
    /// The service answered with a non-2xx status.
    Degraded { reason: String },
    /// No response.
    Unreachable { reason: String },
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::Degraded { reason } => write!(f, "Degraded: {reason}"),
            Self::Unreachable { reason } => write!(f, "Unreachable: {reason}"),
        }
    }
}

/// Health probe report.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub url: url::Url,
    pub status: HealthStatus,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tx_hash_prefers_top_level() {
        let meta: ClaimMetadata = serde_json::from_value(json!({
            "tx_hash": "0xtop",
            "tx": {"hash": "0xnested"}
        }))
        .unwrap();
        assert_eq!(meta.transaction_hash(), Some("0xtop"));
    }

    #[test]
    fn tx_hash_falls_back_to_nested() {
        let meta: ClaimMetadata = serde_json::from_value(json!({
            "tx": {"hash": "0xnested", "block": 12}
        }))
        .unwrap();
        assert_eq!(meta.transaction_hash(), Some("0xnested"));
        assert_eq!(meta.tx.unwrap().extra["block"], 12);
    }

    #[test]
    fn empty_top_level_hash_is_ignored() {
        let meta: ClaimMetadata = serde_json::from_value(json!({
            "tx_hash": "",
            "tx": {"hash": "0xnested"}
        }))
        .unwrap();
        assert_eq!(meta.transaction_hash(), Some("0xnested"));
    }

    #[test]
    fn explorer_falls_back_to_polygonscan() {
        let meta = ClaimMetadata {
            tx_hash: Some("0xabc".into()),
            ..ClaimMetadata::default()
        };
        assert_eq!(
            meta.explorer_url().as_deref(),
            Some("https://mumbai.polygonscan.com/tx/0xabc")
        );
        assert_eq!(ClaimMetadata::default().explorer_url(), None);
    }

    #[test]
    fn unknown_metadata_keys_are_preserved() {
        let meta: ClaimMetadata =
            serde_json::from_value(json!({"source": "local-skeleton"})).unwrap();
        assert_eq!(meta.extra["source"], "local-skeleton");
        assert_eq!(serde_json::to_value(&meta).unwrap()["source"], "local-skeleton");
    }

    #[test]
    fn generate_response_tolerates_null_metadata() {
        let resp: GenerateClaimResponse = serde_json::from_value(json!({
            "claim_id": "CLM-9",
            "approved": null,
            "metadata": null
        }))
        .unwrap();
        assert!(resp.approved.is_empty());
        assert_eq!(resp.metadata, ClaimMetadata::default());
    }

    #[test]
    fn generate_request_omits_absent_optionals() {
        let req = GenerateClaimRequest {
            approved: vec![],
            amount: None,
            signed_by: None,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"approved": []}));
    }

    #[test]
    fn form_request_is_flat_and_omits_blanks() {
        let fields = FormFields {
            patient_name: Some("Jane Doe".into()),
            patient_id: Some("   ".into()),
            ..FormFields::default()
        }
        .without_blanks();
        let req = FormPdfRequest {
            approved: vec![],
            text: "note".into(),
            fields,
            diag_pointers: vec![vec![1, 2]],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["patient_name"], "Jane Doe");
        assert!(value.get("patient_id").is_none());
        assert!(value.get("fields").is_none());
        assert_eq!(value["diag_pointers"], json!([[1, 2]]));
    }

    #[test]
    fn field_mut_covers_every_name() {
        let mut fields = FormFields::default();
        for name in FormFields::NAMES {
            *fields.field_mut(name).unwrap() = Some(name.to_string());
        }
        assert!(fields.entries().iter().all(|(n, v)| *v == Some(*n)));
        assert!(fields.field_mut("nope").is_none());
    }

    #[test]
    fn ingest_response_suggestions_are_optional() {
        let resp: IngestResponse =
            serde_json::from_value(json!({"text": "t", "entities": []})).unwrap();
        assert!(resp.suggestions.is_none());
    }
}
