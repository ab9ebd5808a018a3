use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Path of the book collection under the API origin
pub const BOOKS_PATH: &str = "/api/books";

/// Application configuration loaded from file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShelfdashConfig {
    /// Book REST API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Dialog and notification timing
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Book list view settings
    #[serde(default)]
    pub list: ListConfig,
}

/// Book REST API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin serving `/api/books`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Dialog and notification timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Delay between hiding a dialog and dropping it (exit transition)
    #[serde(default = "default_retirement_delay_ms")]
    pub retirement_delay_ms: u64,

    /// Auto-hide duration for feedback notifications
    #[serde(default = "default_auto_hide_ms")]
    pub notification_auto_hide_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            retirement_delay_ms: default_retirement_delay_ms(),
            notification_auto_hide_ms: default_auto_hide_ms(),
        }
    }
}

impl OverlayConfig {
    pub fn retirement_delay(&self) -> Duration {
        Duration::from_millis(self.retirement_delay_ms)
    }

    pub fn notification_auto_hide(&self) -> Duration {
        Duration::from_millis(self.notification_auto_hide_ms)
    }
}

fn default_retirement_delay_ms() -> u64 {
    1000
}

fn default_auto_hide_ms() -> u64 {
    3000
}

/// Book list view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

impl ShelfdashConfig {
    /// Get the default configuration path
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new().map_or_else(
            || PathBuf::from("~/.config/shelfdash/config.toml"),
            |dirs| dirs.config_dir().join("shelfdash").join("config.toml"),
        )
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Generate example configuration file content
    pub fn example() -> String {
        r#"# Shelfdash Configuration
# Place this file at ~/.config/shelfdash/config.toml

[api]
# Origin serving /api/books
base_url = "http://localhost:3000"

# Per-request timeout in seconds
timeout_secs = 10

[overlay]
# How long a closed dialog lingers for its exit transition
retirement_delay_ms = 1000

# How long success/error notifications stay up
notification_auto_hide_ms = 3000

[list]
# Rows per page in the book list
page_size = 10
"#
        .to_string()
    }
}

/// Tokyo Night color palette
pub mod colors {
    use super::Color;

    pub const BG: Color = Color::Rgb(26, 27, 38); // #1a1b26
    pub const BG_LIGHT: Color = Color::Rgb(41, 46, 66); // #292e42 lighter bg
    pub const FG: Color = Color::Rgb(192, 202, 245); // #c0caf5
    pub const SUCCESS: Color = Color::Rgb(158, 206, 106); // #9ece6a green
    pub const INFO: Color = Color::Rgb(122, 162, 247); // #7aa2f7 blue
    pub const WARNING: Color = Color::Rgb(224, 175, 104); // #e0af68 yellow
    pub const ERROR: Color = Color::Rgb(247, 118, 142); // #f7768e red
    pub const MUTED: Color = Color::Rgb(86, 95, 137); // #565f89 gray
    pub const BORDER: Color = Color::Rgb(59, 66, 97); // #3b4261
    pub const HIGHLIGHT: Color = Color::Rgb(187, 154, 247); // #bb9af7 purple
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ShelfdashConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.overlay.retirement_delay(), Duration::from_millis(1000));
        assert_eq!(
            config.overlay.notification_auto_hide(),
            Duration::from_millis(3000)
        );
        assert_eq!(config.list.page_size, 10);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ShelfdashConfig::load_from_path(temp.path().join("nope.toml"));
        assert_eq!(config.list.page_size, 10);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[overlay]\nretirement_delay_ms = 250\n").unwrap();

        let config = ShelfdashConfig::load_from_path(path);
        assert_eq!(config.overlay.retirement_delay_ms, 250);
        assert_eq!(config.overlay.notification_auto_hide_ms, 3000);
        assert_eq!(config.api.timeout_secs, 10);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[list\npage_size = ").unwrap();

        let config = ShelfdashConfig::load_from_path(path);
        assert_eq!(config.list.page_size, 10);
    }

    #[test]
    fn test_example_parses() {
        let config: ShelfdashConfig = toml::from_str(&ShelfdashConfig::example()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.overlay.retirement_delay_ms, 1000);
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = ShelfdashConfig::default();
        config.list.page_size = 25;

        config.save_to_path(&path).unwrap();
        let loaded = ShelfdashConfig::load_from_path(path);
        assert_eq!(loaded.list.page_size, 25);
    }
}
