//! Project configuration access
//!
//! The project identity and collector endpoint are set once via `init` and
//! then read on every emission. Configuration is owned by the persisted
//! store; `ConfigAccessor` is a typed view over it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BeaconError, BeaconResult};
use crate::store::SharedStore;

/// Store key under which the project configuration is persisted
pub const CONFIG_KEY: &str = "config";

/// Persisted project identity and collector endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(rename = "project-id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(rename = "project-version-id", skip_serializing_if = "Option::is_none")]
    pub project_version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Typed reader/writer for the persisted project configuration
#[derive(Clone)]
pub struct ConfigAccessor {
    store: SharedStore,
}

impl ConfigAccessor {
    /// Create an accessor over the given store
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Persist the given configuration verbatim, overwriting any prior value
    pub async fn init(&self, config: ProjectConfig) -> BeaconResult<()> {
        let value = serde_json::to_value(&config)
            .map_err(|e| BeaconError::json(format!("Failed to serialize config: {}", e)))?;
        self.store.set(CONFIG_KEY, value).await?;
        debug!("Initialized project config");
        Ok(())
    }

    /// The persisted configuration, or the empty default when none exists.
    ///
    /// Total: store read failures and malformed records are logged and
    /// treated as absent rather than surfaced to callers.
    pub async fn config(&self) -> ProjectConfig {
        match self.store.get(CONFIG_KEY).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Stored project config is malformed: {}", e);
                    ProjectConfig::default()
                }
            },
            Ok(None) => ProjectConfig::default(),
            Err(e) => {
                warn!("Failed to read project config: {}", e);
                ProjectConfig::default()
            }
        }
    }

    /// Configured project id, if any
    pub async fn project_id(&self) -> Option<String> {
        self.config().await.project_id
    }

    /// Configured project version id, if any
    pub async fn project_version_id(&self) -> Option<String> {
        self.config().await.project_version_id
    }

    /// Configured collector endpoint, if any
    pub async fn endpoint(&self) -> Option<String> {
        self.config().await.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn accessor() -> ConfigAccessor {
        ConfigAccessor::new(Arc::new(MemoryStore::new()))
    }

    fn sample_config() -> ProjectConfig {
        ProjectConfig {
            project_id: Some("p-1".to_string()),
            project_version_id: Some("v-7".to_string()),
            endpoint: Some("https://collector.example/ingest".to_string()),
        }
    }

    #[tokio::test]
    async fn test_config_roundtrip() {
        let config = accessor();

        config.init(sample_config()).await.unwrap();

        assert_eq!(config.config().await, sample_config());
    }

    #[tokio::test]
    async fn test_config_absent_returns_default() {
        let config = accessor();

        assert_eq!(config.config().await, ProjectConfig::default());
        assert_eq!(config.project_id().await, None);
        assert_eq!(config.endpoint().await, None);
    }

    #[tokio::test]
    async fn test_init_overwrites() {
        let config = accessor();

        config.init(sample_config()).await.unwrap();
        config
            .init(ProjectConfig {
                project_id: Some("p-2".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(config.project_id().await, Some("p-2".to_string()));
        // Overwrite is verbatim: the old endpoint does not survive.
        assert_eq!(config.endpoint().await, None);
    }

    #[tokio::test]
    async fn test_accessors() {
        let config = accessor();
        config.init(sample_config()).await.unwrap();

        assert_eq!(config.project_id().await, Some("p-1".to_string()));
        assert_eq!(config.project_version_id().await, Some("v-7".to_string()));
        assert_eq!(
            config.endpoint().await,
            Some("https://collector.example/ingest".to_string())
        );
    }
}
