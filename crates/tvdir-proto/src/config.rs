use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::catalog::{default_panels, PanelSpec};
use super::loader::ResourceNames;
use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default = "default_panels")]
    pub panels: Vec<PanelSpec>,
}

/// Where the directory resources are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Either an `http(s)://` base URL or a local directory path.
    #[serde(default = "default_base")]
    pub base: String,
    #[serde(default = "default_channels_file")]
    pub channels_file: String,
    #[serde(default = "default_texts_file")]
    pub texts_file: String,
}

impl SourceConfig {
    pub fn resource_names(&self) -> ResourceNames {
        ResourceNames {
            channels: self.channels_file.clone(),
            texts: self.texts_file.clone(),
        }
    }
}

/// Clock formatting. `date_format` is a chrono pattern rendered with `locale`;
/// the year is appended separately so it can be shown in the Buddhist era.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_buddhist_era")]
    pub buddhist_era: bool,
}

/// Text shown before (or instead of) the text bundle and the directory messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    #[serde(default = "default_running_placeholder")]
    pub running_placeholder: String,
    #[serde(default = "default_footer_placeholder")]
    pub footer_placeholder: String,
    #[serde(default = "default_loading_message")]
    pub loading_message: String,
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
}

/// How an activated channel is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Program that receives the channel URL as its last argument.
    /// Empty disables navigation.
    #[serde(default = "default_player_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Pause between emitting the analytics event and launching the player.
    #[serde(default = "default_navigate_delay_ms")]
    pub navigate_delay_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Endpoint receiving `channel_click` events as JSON. None = no analytics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            channels_file: default_channels_file(),
            texts_file: default_texts_file(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            buddhist_era: default_buddhist_era(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            running_placeholder: default_running_placeholder(),
            footer_placeholder: default_footer_placeholder(),
            loading_message: default_loading_message(),
            empty_message: default_empty_message(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            args: Vec::new(),
            navigate_delay_ms: default_navigate_delay_ms(),
        }
    }
}

fn default_base() -> String {
    platform::data_dir()
        .join("site")
        .to_string_lossy()
        .into_owned()
}

fn default_channels_file() -> String {
    "channels.json".to_string()
}

fn default_texts_file() -> String {
    "texts.json".to_string()
}

fn default_locale() -> String {
    "th_TH".to_string()
}

fn default_date_format() -> String {
    "%A ที่ %-d %B".to_string()
}

fn default_time_format() -> String {
    "%H:%M".to_string()
}

fn default_buddhist_era() -> bool {
    true
}

fn default_running_placeholder() -> String {
    "กำลังโหลดข้อความประกาศ...".to_string()
}

fn default_footer_placeholder() -> String {
    "กำลังโหลดข้อความท้ายหน้า...".to_string()
}

fn default_loading_message() -> String {
    "กำลังโหลดช่อง...".to_string()
}

fn default_empty_message() -> String {
    "ไม่พบช่องในหมวดหมู่นี้".to_string()
}

fn default_player_command() -> String {
    platform::default_opener().to_string()
}

fn default_navigate_delay_ms() -> u64 {
    200
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            clock: ClockConfig::default(),
            text: TextConfig::default(),
            player: PlayerConfig::default(),
            analytics: AnalyticsConfig::default(),
            panels: default_panels(),
        }
    }
}
