//! Configuration system for Area window chrome
//!
//! Loads configuration from TOML file at `~/.config/area-chrome/config.toml`
//! Auto-generates default config file on first run if missing.
//!
//! The file only carries raw choices. `ChromeConfig::resolve` validates them
//! against the running platform and produces the immutable `ChromeSettings`
//! a window is built from; an invalid value fails there, before any window
//! state exists.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::platform::Platform;
use crate::theme::{Appearance, Rgba};

/// First OS build treated as the modern platform variant (snap layouts, mica)
pub const DEFAULT_MODERN_BUILD: u32 = 22000;

/// Backdrop selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackdropMode {
    /// Acrylic tint only
    Off,
    /// Mica; rejected on platforms older than the modern variant
    On,
    /// Mica on the modern variant, acrylic otherwise
    Auto,
}

impl FromStr for BackdropMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" | "false" => Ok(Self::Off),
            "on" | "true" => Ok(Self::On),
            "auto" | "if available" => Ok(Self::Auto),
            other => Err(ConfigError::InvalidBackdrop(other.to_string())),
        }
    }
}

impl TryFrom<String> for BackdropMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for BackdropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Auto => "auto",
        })
    }
}

impl From<BackdropMode> for String {
    fn from(mode: BackdropMode) -> Self {
        mode.to_string()
    }
}

/// Theme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ThemeMode {
    /// Follow the persisted system preference
    Auto,
    Dark,
    Light,
}

impl FromStr for ThemeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(ConfigError::InvalidTheme(other.to_string())),
        }
    }
}

impl TryFrom<String> for ThemeMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Dark => "dark",
            Self::Light => "light",
        })
    }
}

impl From<ThemeMode> for String {
    fn from(mode: ThemeMode) -> Self {
        mode.to_string()
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    pub backdrop: BackdropMode,
    pub theme: ThemeMode,
    /// Background tint, 8 hex digits RRGGBBAA
    pub color: String,
    /// OS build at which the modern variant starts
    pub modern_build_threshold: u32,
    /// Width of the resize bands along each window edge
    pub border_width: i32,
    /// How long the backdrop stays off after a move/resize burst
    pub effect_cooldown_ms: u64,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            backdrop: BackdropMode::Off,
            theme: ThemeMode::Auto,
            color: "F2F2F299".to_string(),
            modern_build_threshold: DEFAULT_MODERN_BUILD,
            border_width: 4,
            effect_cooldown_ms: 100,
        }
    }
}

impl ChromeConfig {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            if let Err(e) = Self::save_default(&config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let config = Self::from_toml_str(&content).context("Failed to parse config file")?;

        info!("Configuration loaded from {:?}", path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("area-chrome");

        Ok(config_dir.join("config.toml"))
    }

    /// Save default configuration to file
    fn save_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;

        fs::write(path, toml_string).context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }

    /// Validate against the running platform and fix every derived choice
    pub fn resolve(&self, platform: &impl Platform) -> Result<ChromeSettings, ConfigError> {
        if self.border_width < 1 {
            return Err(ConfigError::InvalidBorderWidth(self.border_width));
        }
        if self.effect_cooldown_ms == 0 {
            return Err(ConfigError::InvalidCooldown(self.effect_cooldown_ms));
        }

        let build = platform.os_build_number();
        let is_modern = build >= self.modern_build_threshold;

        let use_mica = match self.backdrop {
            BackdropMode::On if !is_modern => {
                return Err(ConfigError::MicaUnsupported {
                    build,
                    threshold: self.modern_build_threshold,
                });
            }
            BackdropMode::On => true,
            BackdropMode::Auto => is_modern,
            BackdropMode::Off => false,
        };

        let dark_mode = match self.theme {
            ThemeMode::Dark => true,
            ThemeMode::Light => false,
            ThemeMode::Auto => platform.prefers_dark_theme().unwrap_or_else(|| {
                debug!("System theme preference unreadable, assuming light");
                false
            }),
        };

        let base: Rgba = self.color.parse()?;
        let acrylic_color = if dark_mode { base.darken_for_dark_mode() } else { base };

        let settings = ChromeSettings {
            is_modern,
            use_mica,
            appearance: Appearance::from_dark(dark_mode),
            acrylic_color,
            border_width: self.border_width,
            effect_cooldown: Duration::from_millis(self.effect_cooldown_ms),
        };
        debug!("Resolved chrome settings: {:?}", settings);
        Ok(settings)
    }
}

/// Validated, immutable settings of one chrome window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeSettings {
    /// Running on the modern platform variant
    pub is_modern: bool,
    pub use_mica: bool,
    pub appearance: Appearance,
    /// Acrylic tint, already darkened in dark mode
    pub acrylic_color: Rgba,
    pub border_width: i32,
    pub effect_cooldown: Duration,
}
