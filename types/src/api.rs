//! API request and response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth API Types
// ============================================================================

/// Response of the API root, used as the password probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatusResponse {
    pub message: String,
}

// ============================================================================
// Dashboard API Types
// ============================================================================

/// Server configuration summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub location_name: String,
    pub version: String,
    /// Loaded integrations
    #[serde(default)]
    pub components: Vec<String>,
}

/// Current state of a single entity (light, sensor, switch, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    /// ISO 8601 timestamp of the last state change
    #[serde(default)]
    pub last_changed: String,
}

impl EntityState {
    /// The domain part of the entity id (`light` for `light.kitchen`).
    pub fn domain(&self) -> &str {
        self.entity_id
            .split_once('.')
            .map(|(domain, _)| domain)
            .unwrap_or(&self.entity_id)
    }

    /// Human readable name, falling back to the entity id.
    pub fn friendly_name(&self) -> &str {
        self.attributes
            .get("friendly_name")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.entity_id)
    }
}
