use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::styling::StyleOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub display: DisplayConfig,
    pub popup: PopupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Send column change notifications to the backend
    pub enabled: bool,

    /// Scheme, host and port of the backend, e.g. "http://localhost:40000"
    pub base_url: String,

    /// First path segment of every backend route
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for icons
    pub use_glyphs: bool,

    /// Show negative numbers in red
    pub red_negatives: bool,

    /// Icons for locked/unlocked columns (can be overridden)
    pub icons: IconConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub lock: String,
    pub unlock: String,
    pub sort_asc: String,
    pub sort_desc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Default detached window width in pixels
    pub width: u32,

    /// Default detached window height in pixels
    pub height: u32,

    /// Horizontal offset from the invoking control
    pub offset_x: i32,

    /// Vertical offset from the invoking control
    pub offset_y: i32,

    pub describe: PopupSize,
    pub histogram: PopupSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupSize {
    pub width: u32,
    pub height: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:40000".to_string(),
            namespace: "dtale".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            red_negatives: false,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            lock: "🔒".to_string(),
            unlock: "🔓".to_string(),
            sort_asc: "↑".to_string(),
            sort_desc: "↓".to_string(),
        }
    }
}

impl IconConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            lock: "[L]".to_string(),
            unlock: "[ ]".to_string(),
            sort_asc: "^".to_string(),
            sort_desc: "v".to_string(),
        }
    }
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 450,
            offset_x: 0,
            offset_y: 0,
            describe: PopupSize {
                width: 1100,
                height: 670,
            },
            histogram: PopupSize {
                width: 400,
                height: 425,
            },
        }
    }
}

impl Config {
    /// Load config from the default location, creating it when missing
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            info!(target: "config", "Created default config at {}", config_path.display());
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config {}", path.display()))?;

        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        debug!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("column-state").join("config.toml"))
    }

    /// Style switches for cell rendering
    pub fn style_options(&self) -> StyleOptions {
        StyleOptions {
            red_negs: self.display.red_negatives,
        }
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# column-state configuration
# Location: ~/.config/column-state/config.toml (Linux)
#           ~/Library/Application Support/column-state/config.toml (macOS)
#           %APPDATA%\column-state\config.toml (Windows)

[backend]
# Notify the backend when columns are moved, locked or unlocked
enabled = false

# Where the backend listens
base_url = "http://localhost:40000"

# First path segment of the notification routes
namespace = "dtale"

[display]
# Set to false for ASCII-only icons
use_glyphs = true

# Render negative numbers in red in numeric columns
red_negatives = false

[display.icons]
lock = "🔒"
unlock = "🔓"
sort_asc = "↑"
sort_desc = "↓"

[popup]
# Detached window size used when a popup has no size of its own
width = 500
height = 450

# Offset of detached windows from the control that opened them
offset_x = 0
offset_y = 0

[popup.describe]
width = 1100
height = 670

[popup.histogram]
width = 400
height = 425
"#
        .to_string()
    }
}
