//! Configuration management for the Triene system

use crate::constants::*;
use crate::error::{Result, TrieneError};
use crate::integration::api_url_problem;
use crate::seed;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use triene_types::{IntegrationConfig, IntegrationProvider, StyleGuide};

/// Prefix for environment overrides, e.g. `TRIENE__INTEGRATION__PROVIDER=z-api`
const ENV_PREFIX: &str = "TRIENE";
const ENV_SEPARATOR: &str = "__";

/// Raw configuration structure matching the settings file exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    pub integration: RawIntegrationConfig,

    #[serde(default)]
    pub automation: AutomationConfig,

    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize)]
struct RawIntegrationConfig {
    #[serde(default = "default_provider")]
    pub provider: IntegrationProvider,

    #[serde(alias = "url")]     // Accept both 'api_url' and 'url'
    pub api_url: String,

    #[serde(alias = "api_key")] // Accept both 'token' and 'api_key'
    pub token: String,

    #[serde(alias = "is_connected", default = "default_connected")]
    pub connected: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrieneConfig {
    pub integration: IntegrationConfig,
    pub automation: AutomationConfig,
    pub content: ContentConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationConfig {
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,

    #[serde(default = "default_dispatch_timeout_secs")]
    pub dispatch_timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl AutomationConfig {
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: default_simulated_delay_ms(),
            dispatch_timeout_secs: default_dispatch_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default)]
    pub instagram_handle: String,

    #[serde(default = "seed::default_style_guide")]
    pub style_guide: StyleGuide,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            instagram_handle: String::new(),
            style_guide: seed::default_style_guide(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl ExportConfig {
    pub fn calendar_path(&self) -> PathBuf {
        self.output_dir.join(CALENDAR_EXPORT_FILE)
    }

    pub fn leads_path(&self) -> PathBuf {
        self.output_dir.join(LEADS_EXPORT_FILE)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { output_dir: default_output_dir() }
    }
}

// Default functions
fn default_provider() -> IntegrationProvider {
    IntegrationProvider::Digisac
}

fn default_connected() -> bool {
    true
}

fn default_simulated_delay_ms() -> u64 {
    DEFAULT_SIMULATED_DELAY_MS
}

fn default_dispatch_timeout_secs() -> u64 {
    DEFAULT_DISPATCH_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_backoff_ms() -> u64 {
    DEFAULT_RETRY_BACKOFF_MS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for TrieneConfig {
    fn default() -> Self {
        Self {
            integration: seed::default_integration(),
            automation: AutomationConfig::default(),
            content: ContentConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl TrieneConfig {
    /// Load configuration from a JSON file, then apply `TRIENE__*` environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TrieneError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string, then apply `TRIENE__*` environment overrides
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| TrieneError::Config(format!("Failed to parse config: {}", e)))?;

        let raw_config: RawConfig = settings
            .try_deserialize()
            .map_err(|e| TrieneError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self::from_raw_config(raw_config);
        config.validate()?;
        log::debug!(
            "Loaded configuration for provider {} at {}",
            config.integration.provider,
            config.integration.api_url
        );
        Ok(config)
    }

    fn from_raw_config(raw: RawConfig) -> Self {
        let integration = IntegrationConfig {
            provider: raw.integration.provider,
            api_url: raw.integration.api_url,
            token: raw.integration.token,
            is_connected: raw.integration.connected,
        };

        Self {
            integration,
            automation: raw.automation,
            content: raw.content,
            export: raw.export,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(problem) = api_url_problem(self.integration.api_url.trim()) {
            return Err(TrieneError::Config(problem));
        }

        if self.integration.token.trim().is_empty() {
            return Err(TrieneError::Config("Integration token is required".to_string()));
        }

        if self.automation.dispatch_timeout_secs == 0 {
            return Err(TrieneError::Config("Dispatch timeout must be greater than zero".to_string()));
        }

        if self.content.style_guide.cta.trim().is_empty() {
            return Err(TrieneError::Config("Style guide CTA is required".to_string()));
        }

        Ok(())
    }
}
