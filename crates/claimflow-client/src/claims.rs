//! Typed client for claim generation and the claim summary PDF.

use claimflow_core::CodeSuggestion;

use crate::error::{check_status, decode, read_bytes, unreachable, ClientError};
use crate::types::{ClaimPdfRequest, GenerateClaimRequest, GenerateClaimResponse};
use crate::Timeouts;

/// Client for `POST /generate_claim` and `POST /claim_pdf`.
#[derive(Debug, Clone)]
pub struct ClaimsClient {
    http: reqwest::Client,
    base_url: url::Url,
    timeouts: Timeouts,
}

impl ClaimsClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url, timeouts: Timeouts) -> Self {
        Self {
            http,
            base_url,
            timeouts,
        }
    }

    /// Generate and notarize a claim.
    ///
    /// Calls `POST {base_url}/generate_claim`. Sent exactly once: a repeated
    /// request may create a second claim.
    pub async fn generate(
        &self,
        req: &GenerateClaimRequest,
    ) -> Result<GenerateClaimResponse, ClientError> {
        let endpoint = "POST /generate_claim";
        let url = format!("{}generate_claim", self.base_url);

        let resp = self
            .http
            .post(&url)
            .timeout(self.timeouts.json)
            .json(req)
            .send()
            .await
            .map_err(|e| unreachable(endpoint, &url, e))?;

        let resp = check_status(endpoint, resp).await?;
        let body: GenerateClaimResponse = decode(endpoint, resp).await?;
        tracing::info!(
            claim_id = %body.claim_id,
            codes = body.approved.len(),
            tx_hash = body.metadata.transaction_hash().unwrap_or("-"),
            "claim generated"
        );
        Ok(body)
    }

    /// Render the claim summary PDF for `approved`.
    ///
    /// Calls `POST {base_url}/claim_pdf`; returns the raw PDF bytes.
    pub async fn claim_pdf(&self, approved: &[CodeSuggestion]) -> Result<Vec<u8>, ClientError> {
        let endpoint = "POST /claim_pdf";
        let url = format!("{}claim_pdf", self.base_url);

        let resp = self
            .http
            .post(&url)
            .timeout(self.timeouts.transfer)
            .json(&ClaimPdfRequest { approved })
            .send()
            .await
            .map_err(|e| unreachable(endpoint, &url, e))?;

        let resp = check_status(endpoint, resp).await?;
        read_bytes(endpoint, &url, resp).await
    }
}
