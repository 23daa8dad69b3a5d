//! # claimflow-client -- Typed Rust client for the coding service
//!
//! Provides typed access to the external coding service that does the heavy
//! lifting for claimflow:
//! - **Intake** via `POST /upload` (plain text or multipart document)
//! - **Suggest** via `POST /suggest`
//! - **Claims** via `POST /generate_claim` and `POST /claim_pdf`
//! - **Forms** via `POST /cms1500/derive` and `POST /cms1500`
//!
//! ## Architecture
//!
//! This crate is the only component that crosses the process boundary. The
//! workflow layer depends on the [`CodingService`] trait, which
//! [`CodingClient`] implements by delegating to its sub-clients.
//!
//! ## Failure Classes
//!
//! Every call returns a typed [`ClientError`]: transport (no response; the
//! message names the unreachable URL), HTTP status (code, reason, body),
//! deserialization, or configuration. Only suggest retries
//! transport failures; nothing else is ever sent twice.

pub mod claims;
pub mod config;
pub mod error;
pub mod forms;
pub mod intake;
pub(crate) mod retry;
pub mod service;
pub mod suggest;
pub mod types;

pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use service::CodingService;
pub use types::{
    ClaimMetadata, FileUpload, FormFields, FormPdfRequest, GenerateClaimRequest,
    GenerateClaimResponse, HealthReport, HealthStatus, IngestOptions, IngestResponse,
    SuggestRequest, SuggestResponse,
};

use std::time::Duration;

use claimflow_core::CodeSuggestion;

/// Request timeouts by call class.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timeouts {
    pub json: Duration,
    pub transfer: Duration,
}

/// Top-level coding service client. Holds one sub-client per endpoint group.
#[derive(Debug, Clone)]
pub struct CodingClient {
    http: reqwest::Client,
    base_url: url::Url,
    timeouts: Timeouts,
    intake: intake::IntakeClient,
    suggest: suggest::SuggestClient,
    claims: claims::ClaimsClient,
    forms: forms::FormsClient,
}

impl CodingClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &config.api_token {
            let mut value =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                    .map_err(|_| ClientError::Config(ConfigError::InvalidToken))?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ClientError::Init)?;

        let timeouts = Timeouts {
            json: Duration::from_secs(config.timeout_secs),
            transfer: Duration::from_secs(config.transfer_timeout_secs),
        };
        let base_url = config.base_url;

        Ok(Self {
            intake: intake::IntakeClient::new(http.clone(), base_url.clone(), timeouts),
            suggest: suggest::SuggestClient::new(http.clone(), base_url.clone(), timeouts),
            claims: claims::ClaimsClient::new(http.clone(), base_url.clone(), timeouts),
            forms: forms::FormsClient::new(http.clone(), base_url.clone(), timeouts),
            http,
            base_url,
            timeouts,
        })
    }

    /// Create a client from `CLAIMFLOW_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The service base URL.
    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Access the ingestion client.
    pub fn intake(&self) -> &intake::IntakeClient {
        &self.intake
    }

    /// Access the suggestion client.
    pub fn suggest(&self) -> &suggest::SuggestClient {
        &self.suggest
    }

    /// Access the claim generation client.
    pub fn claims(&self) -> &claims::ClaimsClient {
        &self.claims
    }

    /// Access the CMS-1500 form client.
    pub fn forms(&self) -> &forms::FormsClient {
        &self.forms
    }

    /// Probe `GET {base_url}/health`. Never fails; problems are reported in
    /// the returned status.
    pub async fn health_check(&self) -> HealthReport {
        let url = match self.base_url.join("health") {
            Ok(url) => url,
            Err(e) => {
                return HealthReport {
                    url: self.base_url.clone(),
                    status: HealthStatus::Unreachable {
                        reason: e.to_string(),
                    },
                }
            }
        };

        let status = match self
            .http
            .get(url.clone())
            .timeout(self.timeouts.json)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => HealthStatus::Healthy,
            Ok(resp) => HealthStatus::Degraded {
                reason: format!("HTTP {}", resp.status()),
            },
            Err(e) => HealthStatus::Unreachable {
                reason: e.to_string(),
            },
        };
        tracing::debug!(url = %url, status = %status, "health check");
        HealthReport { url, status }
    }
}

impl CodingService for CodingClient {
    async fn ingest_text(&self, text: &str) -> Result<IngestResponse, ClientError> {
        self.intake.upload_text(text).await
    }

    async fn ingest_file(
        &self,
        file: FileUpload,
        options: IngestOptions,
    ) -> Result<IngestResponse, ClientError> {
        self.intake.upload_file(file, options).await
    }

    async fn suggest_codes(&self, req: &SuggestRequest) -> Result<SuggestResponse, ClientError> {
        self.suggest.suggest(req).await
    }

    async fn generate_claim(
        &self,
        req: &GenerateClaimRequest,
    ) -> Result<GenerateClaimResponse, ClientError> {
        self.claims.generate(req).await
    }

    async fn derive_form_fields(&self, text: &str) -> Result<FormFields, ClientError> {
        self.forms.derive(text).await
    }

    async fn render_form_pdf(&self, req: &FormPdfRequest) -> Result<Vec<u8>, ClientError> {
        self.forms.render(req).await
    }

    async fn render_claim_pdf(&self, approved: &[CodeSuggestion]) -> Result<Vec<u8>, ClientError> {
        self.claims.claim_pdf(approved).await
    }
}
