//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\tagfix\config.toml
//! - macOS: ~/Library/Application Support/tagfix/config.toml
//! - Linux: ~/.config/tagfix/config.toml
//!
//! The config is loaded once at startup into an immutable [`Config`] value and
//! passed by reference to the provider cascade and batch jobs. Nothing in the
//! core reads configuration from global state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::batch::BatchPolicy;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cover art fetching
    pub covers: CoversConfig,

    /// Lyrics fetching
    pub lyrics: LyricsConfig,

    /// HTTP and worker pool settings
    pub network: NetworkConfig,

    /// Provider base URLs
    pub endpoints: Endpoints,
}

/// Which cover provider is tried first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSource {
    /// iTunes search-by-name, MusicBrainz as fallback
    #[default]
    Itunes,
    /// MusicBrainz release database, iTunes as fallback
    MusicBrainz,
}

impl std::str::FromStr for CoverSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "itunes" => Ok(Self::Itunes),
            "musicbrainz" | "mb" => Ok(Self::MusicBrainz),
            other => Err(format!("unknown cover source '{other}'")),
        }
    }
}

/// Cover art settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoversConfig {
    /// Primary cover provider
    pub source: CoverSource,

    /// Request 500x500 artwork (false = 1000x1000 / original)
    pub force_500px: bool,
}

impl Default for CoversConfig {
    fn default() -> Self {
        Self {
            source: CoverSource::Itunes,
            force_500px: true,
        }
    }
}

/// Lyrics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Only accept synced lyrics
    pub strict_mode: bool,

    /// Write a `.lrc` sidecar next to the audio file
    pub save_lrc: bool,

    /// Skip files that already carry synced lyrics
    pub skip_existing: bool,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            strict_mode: true,
            save_lrc: false,
            skip_existing: true,
        }
    }
}

impl LyricsConfig {
    /// Batch policy derived from these settings
    pub fn policy(&self) -> BatchPolicy {
        BatchPolicy {
            skip_existing: self.skip_existing,
            strict_mode: self.strict_mode,
            save_sidecar: self.save_lrc,
        }
    }
}

/// Network settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Batch worker pool size
    pub workers: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            workers: 5,
        }
    }
}

impl NetworkConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Provider base URLs (overridable for testing or mirrors)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub itunes_search: String,
    pub musicbrainz: String,
    pub cover_art_archive: String,
    pub lrclib: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            itunes_search: "https://itunes.apple.com/search".to_string(),
            musicbrainz: "https://musicbrainz.org/ws/2".to_string(),
            cover_art_archive: "https://coverartarchive.org".to_string(),
            lrclib: "https://lrclib.net/api".to_string(),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tagfix"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if file doesn't exist or can't be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to an explicit path
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
