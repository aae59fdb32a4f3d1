//! API client for communicating with the home server.

mod auth;
mod dashboard;

use hearth_types::ACCESS_HEADER;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the access password
    #[error("Unauthorized")]
    Unauthorized,
    /// Network error
    #[error("Network error: {0}")]
    Network(String),
    /// HTTP error with status code
    #[error("HTTP {0} error: {1}")]
    Http(u16, String),
    /// Deserialization error
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success HTTP status to an error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            _ => ApiError::Http(status, body),
        }
    }
}

/// Client for the home server REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    /// Access password sent with every request once known
    access_token: Option<String>,
}

impl ApiClient {
    /// Create a new API client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            access_token: None,
        }
    }

    /// Clone of this client that authenticates with `token`.
    pub fn with_access_token(&self, token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..self.clone()
        }
    }

    /// Get the base URL for the API.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Helper to add the access header to a request builder
    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref token) = self.access_token {
            builder.header(ACCESS_HEADER, token)
        } else {
            builder
        }
    }

    /// Send a GET request and decode the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .with_auth(self.client.get(&url))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error requesting {}: {}", path, e);
                ApiError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!("HTTP error {} for {}", status, path);
            return Err(ApiError::from_status(status, text));
        }

        response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response for {}: {}", path, e);
            ApiError::Decode(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_status_mapping() {
        assert_eq!(
            ApiError::from_status(401, "401: Unauthorized".to_string()),
            ApiError::Unauthorized
        );
        assert_eq!(
            ApiError::from_status(500, "boom".to_string()),
            ApiError::Http(500, "boom".to_string())
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ApiError::Network("connection refused".to_string()).to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            ApiError::Http(503, "unavailable".to_string()).to_string(),
            "HTTP 503 error: unavailable"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8123/");
        assert_eq!(client.base_url(), "http://localhost:8123");
    }

    #[test]
    fn test_with_access_token_keeps_base_url() {
        let client = ApiClient::new("http://hearth.local:8123");
        let authed = client.with_access_token("hunter2");
        assert_eq!(authed.base_url(), client.base_url());
        assert_eq!(authed.access_token.as_deref(), Some("hunter2"));
        assert_eq!(client.access_token, None);
    }
}
