use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, ValidationResult};

/// Application state: the validated configuration and what validation reported about it
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
}

impl App {
    /// Load and validate the configuration at `config_path`, or the default location
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let (config, validation) = Config::load_validated(config_path)?;
        Ok(Self::with_config(config, validation))
    }

    pub fn with_config(config: Config, validation: ValidationResult) -> Self {
        tracing::info!(
            "Application configured from {} ({} warnings)",
            config.config_dir.display(),
            validation.warnings.len()
        );

        Self {
            config: Arc::new(config),
            validation,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle for services that outlive a borrow of the app
    pub fn shared_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }
}
