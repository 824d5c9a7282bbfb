// Application state module
// Process-wide read-only state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::model::{ArtifactError, Predictor};

/// Application state
///
/// Built once before the listener is bound and never mutated afterwards,
/// so handlers read it through `Arc` without locking.
pub struct AppState {
    pub config: Config,
    pub predictor: Predictor,
}

impl AppState {
    pub const fn new(config: Config, predictor: Predictor) -> Self {
        Self { config, predictor }
    }

    /// Load the artifacts named in the config
    pub fn load(config: Config) -> Result<Arc<Self>, ArtifactError> {
        let predictor = Predictor::load(&config.model.model_path, &config.model.scaler_path)?;
        Ok(Arc::new(Self::new(config, predictor)))
    }

    /// Whether access logging is enabled
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
