//! Typed client for the CMS-1500 paper-claim form.

use crate::error::{check_status, decode, read_bytes, unreachable, ClientError};
use crate::types::{FormFields, FormPdfRequest, TextRequest};
use crate::Timeouts;

/// Client for `POST /cms1500/derive` and `POST /cms1500`.
#[derive(Debug, Clone)]
pub struct FormsClient {
    http: reqwest::Client,
    base_url: url::Url,
    timeouts: Timeouts,
}

impl FormsClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url, timeouts: Timeouts) -> Self {
        Self {
            http,
            base_url,
            timeouts,
        }
    }

    /// Header fields the service can infer from `text`.
    ///
    /// Calls `POST {base_url}/cms1500/derive`, once. Callers treat any
    /// failure as "no fields", so a slow service costs one JSON timeout.
    pub async fn derive(&self, text: &str) -> Result<FormFields, ClientError> {
        let endpoint = "POST /cms1500/derive";
        let url = format!("{}cms1500/derive", self.base_url);
        let body = TextRequest { text };

        let resp = self
            .http
            .post(&url)
            .timeout(self.timeouts.json)
            .json(&body)
            .send()
            .await
            .map_err(|e| unreachable(endpoint, &url, e))?;

        let resp = check_status(endpoint, resp).await?;
        decode(endpoint, resp).await
    }

    /// Render a filled CMS-1500.
    ///
    /// Calls `POST {base_url}/cms1500`; returns the raw PDF bytes.
    pub async fn render(&self, req: &FormPdfRequest) -> Result<Vec<u8>, ClientError> {
        let endpoint = "POST /cms1500";
        let url = format!("{}cms1500", self.base_url);

        let resp = self
            .http
            .post(&url)
            .timeout(self.timeouts.transfer)
            .json(req)
            .send()
            .await
            .map_err(|e| unreachable(endpoint, &url, e))?;

        let resp = check_status(endpoint, resp).await?;
        read_bytes(endpoint, &url, resp).await
    }
}
