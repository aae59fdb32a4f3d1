use hearth_types::ApiStatusResponse;

use super::*;

impl ApiClient {
    /// Check an access password against the API root.
    ///
    /// The client's own token is ignored; `password` is sent instead.
    pub async fn validate_password(&self, password: &str) -> ApiResult<ApiStatusResponse> {
        use tracing::info;

        info!("Validating access password against {}", self.base_url);

        let status: ApiStatusResponse = self.with_access_token(password).get_json("/api/").await?;

        info!("API reachable: {}", status.message);
        Ok(status)
    }
}
