use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Where transcoded files are written before being handed to the caller.
    pub temp_dir: PathBuf,
    /// Interface language (`hl`) sent to YouTube.
    pub language: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("temp"),
            language: "id".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolsConfig {
    pub yt_dlp: PathBuf,
    pub ffmpeg: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            yt_dlp: PathBuf::from("yt-dlp"),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("ytmusic-dl")
        .join("config.toml")
}

pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_config(&content),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
            Config::default()
        }
    }
}

/// Parse TOML config text. Invalid input falls back to defaults.
pub fn parse_config(content: &str) -> Config {
    toml::from_str(content).unwrap_or_else(|e| {
        warn!(error = %e, "invalid config, using defaults");
        Config::default()
    })
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(&path, content)?;
    Ok(())
}
