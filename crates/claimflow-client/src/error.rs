//! Coding service client error types.

/// Errors from coding service calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response: connection refused, DNS failure, or timeout.
    #[error("could not reach the coding service at {url} ({endpoint}): {source}")]
    Unreachable {
        endpoint: String,
        url: String,
        source: reqwest::Error,
    },
    /// The service answered with a non-2xx status.
    #[error("{endpoint} returned {status} {reason}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        /// Canonical reason phrase for `status`, empty when unknown.
        reason: String,
        body: String,
    },
    /// Response body did not match the expected shape.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to initialize HTTP client: {0}")]
    Init(reqwest::Error),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ClientError {
    /// HTTP status code, when the service responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request never got a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

pub(crate) fn unreachable(endpoint: &str, url: &str, source: reqwest::Error) -> ClientError {
    ClientError::Unreachable {
        endpoint: endpoint.into(),
        url: url.into(),
        source,
    }
}

/// Pass 2xx responses through; turn anything else into [`ClientError::Status`].
pub(crate) async fn check_status(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status {
        endpoint: endpoint.into(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
        body,
    })
}

/// Decode a JSON response body.
pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    resp.json().await.map_err(|e| ClientError::Deserialization {
        endpoint: endpoint.into(),
        source: e,
    })
}

/// Read a binary response body.
pub(crate) async fn read_bytes(
    endpoint: &str,
    url: &str,
    resp: reqwest::Response,
) -> Result<Vec<u8>, ClientError> {
    resp.bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| unreachable(endpoint, url, e))
}

