//! # Config Loader
//!
//! Settings loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON settings files
//! - Apply environment overrides
//! - Validate settings
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let settings = ConfigLoader::load_from_path(Path::new("processor.toml")).unwrap();
//! println!("Environment: {}", settings.environment);
//! ```

mod env;
mod parser;
mod validator;

pub use contracts::DispatcherSettings;
pub use env::{ENV_DEADLINE_MARGIN_MS, ENV_ENVIRONMENT, ENV_MAX_CONCURRENCY};
pub use parser::ConfigFormat;
pub use validator::MAX_HANDLER_DELAY_MS;

use contracts::ContractError;
use std::path::Path;
use tracing::info;

/// Settings loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a file path
    ///
    /// Format is detected from the extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<DispatcherSettings, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load settings from a string
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<DispatcherSettings, ContractError> {
        let settings = parser::parse(content, format)?;
        validator::validate(&settings)?;
        Ok(settings)
    }

    /// Load from `path` when given (defaults otherwise), then apply
    /// process environment overrides and validate.
    pub fn load_with_env(path: Option<&Path>) -> Result<DispatcherSettings, ContractError> {
        Self::load_with_lookup(path, |key| std::env::var(key).ok())
    }

    /// As `load_with_env`, reading overrides through `lookup`
    pub fn load_with_lookup<F>(
        path: Option<&Path>,
        lookup: F,
    ) -> Result<DispatcherSettings, ContractError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match path {
            Some(path) => {
                info!(config = %path.display(), "Loading settings file");
                let format = Self::detect_format(path)?;
                parser::parse(&Self::read_file(path)?, format)?
            }
            None => DispatcherSettings::default(),
        };

        env::apply_overrides(&mut settings, lookup)?;
        validator::validate(&settings)?;
        Ok(settings)
    }

    /// Validate already-built settings
    pub fn validate(settings: &DispatcherSettings) -> Result<(), ContractError> {
        validator::validate(settings)
    }

    /// Serialize settings to a TOML string
    pub fn to_toml(settings: &DispatcherSettings) -> Result<String, ContractError> {
        toml::to_string_pretty(settings)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize settings to a JSON string
    pub fn to_json(settings: &DispatcherSettings) -> Result<String, ContractError> {
        serde_json::to_string_pretty(settings)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
