use hearth_types::{ConfigResponse, EntityState};

use super::*;
use crate::dashboard::DashboardData;

impl ApiClient {
    /// Get the server configuration summary.
    pub async fn get_config(&self) -> ApiResult<ConfigResponse> {
        self.get_json("/api/config").await
    }

    /// List the current state of every entity.
    pub async fn get_states(&self) -> ApiResult<Vec<EntityState>> {
        let states: Vec<EntityState> = self.get_json("/api/states").await?;
        tracing::info!("Loaded {} entity states", states.len());
        Ok(states)
    }

    /// Load everything the dashboard needs after login.
    pub async fn load_dashboard(&self) -> ApiResult<DashboardData> {
        let config = self.get_config().await?;
        let states = self.get_states().await?;
        Ok(DashboardData::new(config, states))
    }
}
