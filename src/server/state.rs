//! Application state for the crop recommendation server
//!
//! Holds the configuration and the prediction service shared by all
//! request handlers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::inference::PredictionService;
use crate::model::ModelLoader;
use crate::utils::error::Result;

/// Server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Path to the model artifact
    pub model_path: PathBuf,
    /// Deserialize the model before accepting requests
    pub preload_model: bool,
    /// Open the home page in a browser once the server is up
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            model_path: ModelLoader::default_model_path(),
            preload_model: false,
            open_browser: false,
        }
    }
}

impl ServerConfig {
    /// Address string for binding, e.g. `127.0.0.1:5000`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL of the home page
    pub fn home_url(&self) -> String {
        format!("http://{}/", self.bind_address())
    }
}

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Prediction service backed by the lazily loaded model
    pub service: PredictionService,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let loader = ModelLoader::new(config.model_path.clone());
        let service = PredictionService::new(Arc::new(loader));
        Self::with_service(config, service)
    }

    /// State around an already constructed service
    pub fn with_service(config: ServerConfig, service: PredictionService) -> Self {
        Self {
            config,
            service,
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;

/// Build the shared state for a server about to start.
///
/// Fails with `ModelNotFound` when the artifact is absent, and deserializes
/// the model up front when `preload_model` is set.
pub fn prepare_state(config: ServerConfig) -> Result<SharedState> {
    let state = AppState::new(config);

    let loader = state.service.loader();
    loader.ensure_present()?;
    if state.config.preload_model {
        loader.get_model()?;
    }

    Ok(Arc::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CropError;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert_eq!(config.home_url(), "http://127.0.0.1:5000/");
        assert_eq!(config.model_path, ModelLoader::default_model_path());
        assert!(!config.preload_model);
    }

    #[test]
    fn test_state_uses_configured_model_path() {
        let config = ServerConfig {
            model_path: PathBuf::from("/tmp/elsewhere/forest.json"),
            ..ServerConfig::default()
        };
        let state = AppState::new(config);
        assert_eq!(
            state.service.loader().path(),
            PathBuf::from("/tmp/elsewhere/forest.json")
        );
        assert!(!state.service.loader().is_loaded());
    }

    #[test]
    fn test_prepare_state_refuses_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            model_path: dir.path().join("absent.json"),
            ..ServerConfig::default()
        };

        let err = prepare_state(config).unwrap_err();
        assert!(matches!(err, CropError::ModelNotFound(_)));
    }

    #[test]
    fn test_prepare_state_stays_lazy_by_default() {
        let state = prepare_state(ServerConfig::default()).unwrap();
        assert!(!state.service.loader().is_loaded());
        assert_eq!(state.service.loader().load_count(), 0);
    }

    #[test]
    fn test_prepare_state_preloads_model() {
        let config = ServerConfig {
            preload_model: true,
            ..ServerConfig::default()
        };

        let state = prepare_state(config).unwrap();
        assert!(state.service.loader().is_loaded());
        assert_eq!(state.service.loader().load_count(), 1);
    }

    #[test]
    fn test_prepare_state_reports_broken_artifact_on_preload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{}").unwrap();
        let config = ServerConfig {
            model_path: path,
            preload_model: true,
            ..ServerConfig::default()
        };

        let err = prepare_state(config).unwrap_err();
        assert!(matches!(err, CropError::ModelLoad(_, _)));
    }
}
