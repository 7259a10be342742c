//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::carousel::CarouselConfig;
use crate::constants::CONFIG_DIR_NAME;
use crate::services::{AdminCredentials, FileValidator, DEFAULT_MAX_UPLOAD_BYTES};

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Where records and uploaded media live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Data directory; defaults to `<config dir>/data`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Upload rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted file in bytes (inclusive)
    pub max_size_bytes: u64,
    /// Accepted MIME type prefixes
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: vec!["image/".to_string()],
        }
    }
}

/// Admin login. `VILLA_ADMIN_USERNAME` / `VILLA_ADMIN_PASSWORD` take
/// precedence over these values.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// Admin username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Admin password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Admin API listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/VillaShowcase/config.toml`
/// - macOS: `~/Library/Application Support/VillaShowcase/config.toml`
/// - Windows: `%APPDATA%\VillaShowcase\config.toml`
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Carousel geometry and input tuning
    pub carousel: CarouselConfig,
    /// Data locations
    pub storage: StorageConfig,
    /// Upload rules
    pub upload: UploadConfig,
    /// Admin credentials
    pub admin: AdminConfig,
    /// Admin API listener
    pub server: ServerConfig,
    /// UI preferences
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/VillaShowcase/`
    /// - macOS: `~/Library/Application Support/VillaShowcase/`
    /// - Windows: `%APPDATA%\VillaShowcase\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the platform config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        fs::rename(&temp_path, path).with_context(|| {
            format!("Failed to rename temp config file to: {}", path.display())
        })?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - carousel widths are positive, gap and thresholds non-negative,
    ///   debounce window non-zero
    /// - at least one allowed upload type and a non-zero size ceiling
    /// - a non-empty host and non-zero port
    pub fn validate(&self) -> Result<()> {
        self.carousel.validate()?;

        if self.upload.max_size_bytes == 0 {
            anyhow::bail!("upload.max_size_bytes must be greater than 0");
        }
        if self.upload.allowed_types.is_empty()
            || self.upload.allowed_types.iter().any(|t| t.trim().is_empty())
        {
            anyhow::bail!("upload.allowed_types must list at least one non-empty MIME prefix");
        }

        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host cannot be empty");
        }
        if self.server.port == 0 {
            anyhow::bail!("server.port must be between 1 and 65535");
        }

        Ok(())
    }

    /// Resolves the data directory: the configured one, or `<config dir>/data`.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("data")),
        }
    }

    /// Upload validator built from `[upload]`.
    #[must_use]
    pub fn file_validator(&self) -> FileValidator {
        FileValidator::new(self.upload.allowed_types.clone(), self.upload.max_size_bytes)
    }

    /// Admin credentials from the environment or `[admin]`.
    #[must_use]
    pub fn admin_credentials(&self) -> Option<AdminCredentials> {
        AdminCredentials::resolve(self.admin.username.as_deref(), self.admin.password.as_deref())
    }
}
