use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of recommendations shown when none is requested.
pub const DEFAULT_TOP_N: usize = 10;

/// Configuration for vitrine.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (VITRINE_* prefix)
/// 3. Config file (~/.config/vitrine/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the catalog CSV.
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/catalog.csv
    /// - ENV: VITRINE_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/catalog.csv"
    /// - Default: data/clean_data.csv
    pub catalog_path: PathBuf,

    /// How many recommendations to return by default.
    pub top_n: usize,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            top_n: DEFAULT_TOP_N,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of: trace, debug, info, warn, error.
    pub level: String,
    pub coloured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            coloured: true,
        }
    }
}

impl LoggingConfig {
    /// The configured level as a twyg level. Unknown names fall back to info.
    pub fn twyg_level(&self) -> twyg::LogLevel {
        match self.level.to_lowercase().as_str() {
            "trace" => twyg::LogLevel::Trace,
            "debug" => twyg::LogLevel::Debug,
            "warn" | "warning" => twyg::LogLevel::Warn,
            "error" => twyg::LogLevel::Error,
            _ => twyg::LogLevel::Info,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("vitrine");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration, overriding the catalog path from the --catalog flag.
    pub fn load_with_catalog_path(catalog_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.catalog_path = catalog_path;
        Ok(config)
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data").join("clean_data.csv")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/vitrine/config.toml
/// - macOS: ~/Library/Application Support/vitrine/config.toml
/// - Windows: %APPDATA%\vitrine\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vitrine")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Vitrine Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (VITRINE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Catalog CSV with columns: Name, Tags, ReviewCount, Brand, ImageURL, Rating
#
# Can also be set via:
# - CLI: vitrine --catalog /path/to/catalog.csv recommend "Item Name"
# - Environment: VITRINE_CATALOG_PATH=/path/to/catalog.csv
catalog_path = "data/clean_data.csv"

# Number of recommendations returned when --top-n is not given
top_n = 10

[logging]
# trace, debug, info, warn or error
level = "info"
coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    ensure_config_file_at(&config_file_path())
}

/// Write the example config to `config_path` unless a file is already there.
pub fn ensure_config_file_at(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

/// Set up twyg as the `log` backend.
pub fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let opts = twyg::OptsBuilder::new()
        .coloured(logging.coloured)
        .level(logging.twyg_level())
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid logging options: {e}"))?;

    twyg::setup(opts).map_err(|e| anyhow::anyhow!("Failed to set up logging: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog_path, PathBuf::from("data/clean_data.csv"));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.coloured);
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_catalog_path() {
        let custom_path = PathBuf::from("/tmp/catalog.csv");
        let config = Config::load_with_catalog_path(custom_path.clone());
        assert!(config.is_ok());
        assert_eq!(config.unwrap().catalog_path, custom_path);
    }

    #[test]
    fn test_example_config_parses() {
        let doc: toml_edit::DocumentMut = example_config().parse().unwrap();
        assert_eq!(doc["top_n"].as_integer(), Some(10));
        assert_eq!(doc["logging"]["level"].as_str(), Some("info"));
    }

    #[test]
    fn test_ensure_config_file_at_creates_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("vitrine").join("config.toml");

        assert!(ensure_config_file_at(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), example_config());

        std::fs::write(&path, "top_n = 3\n").unwrap();
        assert!(!ensure_config_file_at(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "top_n = 3\n");
    }

    #[test]
    fn test_twyg_level_mapping() {
        let mut logging = LoggingConfig::default();
        assert!(matches!(logging.twyg_level(), twyg::LogLevel::Info));

        logging.level = String::from("DEBUG");
        assert!(matches!(logging.twyg_level(), twyg::LogLevel::Debug));

        logging.level = String::from("nonsense");
        assert!(matches!(logging.twyg_level(), twyg::LogLevel::Info));
    }
}
