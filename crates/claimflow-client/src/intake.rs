//! Typed client for document ingestion.
//!
//! Both ingest paths hit `POST /upload`: plain text as JSON, documents as
//! multipart. Neither is retried.

use reqwest::multipart::{Form, Part};

use crate::error::{check_status, decode, unreachable, ClientError};
use crate::types::{FileUpload, IngestOptions, IngestResponse, TextRequest};
use crate::Timeouts;

/// Client for the ingestion endpoint.
#[derive(Debug, Clone)]
pub struct IntakeClient {
    http: reqwest::Client,
    base_url: url::Url,
    timeouts: Timeouts,
}

impl IntakeClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url, timeouts: Timeouts) -> Self {
        Self {
            http,
            base_url,
            timeouts,
        }
    }

    /// Extract entities from plain text.
    ///
    /// Calls `POST {base_url}/upload` with `{"text": ...}`.
    pub async fn upload_text(&self, text: &str) -> Result<IngestResponse, ClientError> {
        let endpoint = "POST /upload";
        let url = format!("{}upload", self.base_url);
        tracing::debug!(chars = text.chars().count(), "ingesting text");

        let resp = self
            .http
            .post(&url)
            .timeout(self.timeouts.json)
            .json(&TextRequest { text })
            .send()
            .await
            .map_err(|e| unreachable(endpoint, &url, e))?;

        let resp = check_status(endpoint, resp).await?;
        decode(endpoint, resp).await
    }

    /// Extract text and entities from a document.
    ///
    /// Calls `POST {base_url}/upload` as multipart with `file`,
    /// `clinical_only`, and (only when requested) `auto_suggest=true`.
    pub async fn upload_file(
        &self,
        file: FileUpload,
        options: IngestOptions,
    ) -> Result<IngestResponse, ClientError> {
        let endpoint = "POST /upload (multipart)";
        let url = format!("{}upload", self.base_url);
        tracing::debug!(
            filename = %file.filename,
            bytes = file.bytes.len(),
            clinical_only = options.clinical_only,
            auto_suggest = options.auto_suggest,
            "uploading document"
        );

        let mut form = Form::new()
            .part("file", Part::bytes(file.bytes).file_name(file.filename))
            .text("clinical_only", options.clinical_only.to_string());
        if options.auto_suggest {
            form = form.text("auto_suggest", "true");
        }

        let resp = self
            .http
            .post(&url)
            .timeout(self.timeouts.transfer)
            .multipart(form)
            .send()
            .await
            .map_err(|e| unreachable(endpoint, &url, e))?;

        let resp = check_status(endpoint, resp).await?;
        decode(endpoint, resp).await
    }
}
