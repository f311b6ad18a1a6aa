//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for texpipe
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub raster: RasterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root holding the numbered stage directories
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub dpi: u32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            dpi: texpipe_raster::DEFAULT_DPI,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./texpipe.toml (current directory)
    /// 2. ~/.config/texpipe/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("texpipe.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "texpipe") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.data.dir, PathBuf::from("./data"));
        assert_eq!(config.raster.dpi, 72);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[data]
dir = "/mnt/arxiv"

[raster]
dpi = 150
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.data.dir, PathBuf::from("/mnt/arxiv"));
        assert_eq!(config.raster.dpi, 150);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = toml::from_str("[raster]\ndpi = 300\n").unwrap();
        assert_eq!(config.data.dir, PathBuf::from("./data"));
        assert_eq!(config.raster.dpi, 300);
    }

    #[test]
    fn from_file_reports_path_on_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("texpipe.toml");
        std::fs::write(&path, "[raster]\ndpi = \"high\"\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("texpipe.toml"));
    }
}
