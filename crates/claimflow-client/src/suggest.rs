//! Typed client for code suggestion.

use crate::error::{check_status, decode, unreachable, ClientError};
use crate::types::{SuggestRequest, SuggestResponse};
use crate::Timeouts;

/// Client for `POST /suggest`.
#[derive(Debug, Clone)]
pub struct SuggestClient {
    http: reqwest::Client,
    base_url: url::Url,
    timeouts: Timeouts,
}

impl SuggestClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url, timeouts: Timeouts) -> Self {
        Self {
            http,
            base_url,
            timeouts,
        }
    }

    /// Ranked code suggestions for `req.text`.
    ///
    /// Calls `POST {base_url}/suggest`. Transport failures are retried.
    pub async fn suggest(&self, req: &SuggestRequest) -> Result<SuggestResponse, ClientError> {
        let endpoint = "POST /suggest";
        let url = format!("{}suggest", self.base_url);

        let resp = crate::retry::retry_send(endpoint, || {
            self.http
                .post(&url)
                .timeout(self.timeouts.json)
                .json(req)
                .send()
        })
        .await
        .map_err(|e| unreachable(endpoint, &url, e))?;

        let resp = check_status(endpoint, resp).await?;
        let body: SuggestResponse = decode(endpoint, resp).await?;
        tracing::info!(
            suggestions = body.suggestions.len(),
            entities = body.entities.len(),
            "received code suggestions"
        );
        Ok(body)
    }
}
