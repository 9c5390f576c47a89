use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub transcription: TranscriptionConfig,
    pub summarizer: SummarizerConfig,
    pub email: EmailConfig,
}

/// Deployment mode. Bulk destructive operations are only permitted in
/// development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    Development,
    Production,
}

impl Default for Deployment {
    fn default() -> Self {
        Deployment::Development
    }
}

impl Deployment {
    pub fn is_production(&self) -> bool {
        matches!(self, Deployment::Production)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub deployment: Deployment,
    /// Base URL used when deriving dashboard/transcript navigation links
    /// in pipeline responses.
    pub dashboard_base_url: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Override for the SQLite file location. Defaults to the platform
    /// data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub api_key: Option<String>,
    pub api_endpoint: Option<String>,
    pub model: Option<String>,
    /// Default language hint: "english" or "hinglish".
    pub language: Option<String>,
    /// Confidence reported on the synthetic fallback transcript.
    pub fallback_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub api_key: Option<String>,
    pub api_endpoint: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7090,
            deployment: Deployment::Development,
            dashboard_base_url: "http://127.0.0.1:7090".to_string(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: None,
            model: Some("scribe_v1".to_string()),
            language: Some("hinglish".to_string()),
            fallback_confidence: 0.8,
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: None,
            model: Some("deepseek-chat".to_string()),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: 25,
            username: None,
            password: None,
            from: "Meeting Assistant <no-reply@localhost>".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 7090);
        assert_eq!(config.server.deployment, Deployment::Development);
        assert!(!config.email.enabled);
        assert_eq!(config.transcription.fallback_confidence, 0.8);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000
            deployment = "production"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert!(config.server.deployment.is_production());
        // Untouched sections fall back to defaults
        assert_eq!(config.summarizer.model.as_deref(), Some("deepseek-chat"));
        assert_eq!(config.email.smtp_port, 25);
    }
}
