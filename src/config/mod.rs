use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::whisper::{DEFAULT_MODEL, DEFAULT_TRANSCRIPTION_URL};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whisper API settings
    pub whisper: WhisperConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperConfig {
    /// Transcription endpoint URL
    pub endpoint: String,

    /// Model identifier sent with every upload
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Working directory for transient audio downloads
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            whisper: WhisperConfig {
                endpoint: DEFAULT_TRANSCRIPTION_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
            },
            app: AppConfig {
                data_dir: PathBuf::from("data"),
            },
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save().await?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt-whisper").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        Url::parse(&self.whisper.endpoint)
            .context("Whisper endpoint must be a valid URL")?;

        if self.whisper.model.is_empty() {
            anyhow::bail!("Whisper model must be configured");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Whisper Endpoint: {}", self.whisper.endpoint);
        println!("  Whisper Model: {}", self.whisper.model);
        println!("  Data Directory: {}", self.app.data_dir.display());
    }
}
