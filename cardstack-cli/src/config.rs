use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use cardstack_core::navigation::DEFAULT_PAGE_ID;
use cardstack_core::sync::{
    StoreIdentifier, StoreMode, DEFAULT_BIN_NAME, DEFAULT_COLLECTION_URL, DEFAULT_UPLOAD_URL,
};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

fn default_upload_url() -> String {
    DEFAULT_UPLOAD_URL.to_string()
}

fn default_collection_url() -> String {
    DEFAULT_COLLECTION_URL.to_string()
}

fn default_bin_name() -> String {
    DEFAULT_BIN_NAME.to_string()
}

/// Image host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageHostConfig {
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
    /// API key sent with every upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            upload_url: default_upload_url(),
            api_key: None,
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `fixed` uses `bin_id`; `auto` creates a document per device
    #[serde(default)]
    pub mode: StoreMode,
    #[serde(default = "default_collection_url")]
    pub collection_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_id: Option<String>,
    /// Name for documents created in auto mode
    #[serde(default = "default_bin_name")]
    pub bin_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: StoreMode::default(),
            collection_url: default_collection_url(),
            master_key: None,
            bin_id: None,
            bin_name: default_bin_name(),
        }
    }
}

impl StoreConfig {
    /// Returns true if the store has credentials and, in fixed mode, a document id
    pub fn is_configured(&self) -> bool {
        self.master_key.is_some() && self.store_identifier().is_some()
    }

    pub fn store_identifier(&self) -> Option<StoreIdentifier> {
        match self.mode {
            StoreMode::Fixed => self.bin_id.clone().map(StoreIdentifier::Fixed),
            StoreMode::Auto => Some(StoreIdentifier::AutoProvisioned {
                bin_name: self.bin_name.clone(),
            }),
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the local key/value store
    pub data_dir: ConfigValue<PathBuf>,
    /// Page shown when neither --page nor --query is given
    pub default_page: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub image_host: ImageHostConfig,
    pub store: StoreConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    default_page: Option<String>,
    image_host: Option<ImageHostConfig>,
    store: Option<StoreConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut default_page =
            ConfigValue::new(DEFAULT_PAGE_ID.to_string(), ConfigSource::Default);
        let mut config_file = None;
        let mut image_host = ImageHostConfig::default();
        let mut store = StoreConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(page) = file_config.default_page.filter(|p| !p.is_empty()) {
                default_page = ConfigValue::new(page, ConfigSource::File);
            }
            if let Some(host) = file_config.image_host {
                image_host = host;
            }
            if let Some(store_config) = file_config.store {
                store = store_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("CARDSTACK_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(page) = std::env::var("CARDSTACK_DEFAULT_PAGE") {
            default_page = ConfigValue::new(page, ConfigSource::Environment);
        }
        if let Ok(key) = std::env::var("CARDSTACK_IMAGE_HOST_KEY") {
            image_host.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("CARDSTACK_STORE_KEY") {
            store.master_key = Some(key);
        }
        if let Ok(bin_id) = std::env::var("CARDSTACK_STORE_BIN_ID") {
            store.bin_id = Some(bin_id);
        }

        Ok(Self {
            data_dir,
            default_page,
            config_file,
            image_host,
            store,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/cardstack/
    /// - macOS: ~/Library/Application Support/cardstack/
    /// - Windows: %APPDATA%/cardstack/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cardstack")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/cardstack/
    /// - macOS: ~/Library/Application Support/cardstack/
    /// - Windows: %APPDATA%/cardstack/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cardstack")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
