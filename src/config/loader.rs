// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::core::OracleConfig;
use super::validation::ConfigValidator;

pub struct ConfigLoader {
    config_path: PathBuf,
    format: ConfigFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigLoader {
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let path = config_path.as_ref().to_path_buf();
        let format = Self::detect_format(&path)?;

        Ok(Self {
            config_path: path,
            format,
        })
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| anyhow::anyhow!("Could not determine config file format"))?;

        match extension {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(anyhow::anyhow!("Unsupported config file format: {}", extension)),
        }
    }

    pub fn load_config(&self) -> Result<OracleConfig> {
        let content = std::fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file: {:?}", self.config_path))?;

        let mut config = self.parse(&content)?;

        apply_env_overrides(&mut config)?;

        ConfigValidator::validate_oracle_config(&config)?;

        debug!(
            "Loaded oracle config from {:?}: signal={}, mode={:?}, window={}",
            self.config_path,
            config.requester.comparison_signal.as_str(),
            config.requester.match_mode,
            config.requester.window_capacity
        );

        Ok(config)
    }

    fn parse(&self, content: &str) -> Result<OracleConfig> {
        let parsed: Result<OracleConfig> = match self.format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(anyhow::Error::from),
            ConfigFormat::Toml => toml::from_str(content).map_err(anyhow::Error::from),
            ConfigFormat::Json => serde_json::from_str(content).map_err(anyhow::Error::from),
        };
        parsed.with_context(|| format!("Failed to parse {:?} config", self.format))
    }

    pub fn save_config(&self, config: &OracleConfig) -> Result<()> {
        ConfigValidator::validate_oracle_config(config)?;

        let content = match self.format {
            ConfigFormat::Yaml => serde_yaml::to_string(config)?,
            ConfigFormat::Toml => toml::to_string_pretty(config)?,
            ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        };

        std::fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", self.config_path))?;

        Ok(())
    }
}

/// Defaults plus environment overrides, for runs without a config file
pub fn load_from_env() -> Result<OracleConfig> {
    let mut config = OracleConfig::default();
    apply_env_overrides(&mut config)?;
    ConfigValidator::validate_oracle_config(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut OracleConfig) -> Result<()> {
    if let Ok(signal) = std::env::var("ORACLE_COMPARISON_SIGNAL") {
        config.requester.comparison_signal = signal
            .parse()
            .context("Invalid ORACLE_COMPARISON_SIGNAL")?;
    }

    if let Ok(mode) = std::env::var("ORACLE_MATCH_MODE") {
        config.requester.match_mode = mode.parse().context("Invalid ORACLE_MATCH_MODE")?;
    }

    if let Ok(deviation) = std::env::var("ORACLE_ACCEPTABLE_DEVIATION") {
        config.requester.acceptable_deviation = deviation
            .parse()
            .context("Invalid ORACLE_ACCEPTABLE_DEVIATION")?;
    }

    if let Ok(capacity) = std::env::var("ORACLE_WINDOW_CAPACITY") {
        config.requester.window_capacity = capacity
            .parse()
            .context("Invalid ORACLE_WINDOW_CAPACITY")?;
    }

    if let Ok(timeout) = std::env::var("ORACLE_HTTP_TIMEOUT") {
        config.http.timeout_secs = timeout.parse().context("Invalid ORACLE_HTTP_TIMEOUT")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ComparisonSignal, MatchMode};
    use std::io::Write;

    fn write_config(ext: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{}", ext)).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(ConfigLoader::detect_format(Path::new("a.yml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigLoader::detect_format(Path::new("a.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigLoader::detect_format(Path::new("a.json")).unwrap(), ConfigFormat::Json);
        assert!(ConfigLoader::detect_format(Path::new("a.ini")).is_err());
        assert!(ConfigLoader::detect_format(Path::new("noext")).is_err());
    }

    #[test]
    fn test_parse_toml() {
        let file = write_config(
            "toml",
            "[requester]\ncomparison_signal = \"text\"\nmatch_mode = \"strict\"\nwindow_capacity = 5\n",
        );
        let loader = ConfigLoader::new(file.path()).unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        let config = loader.parse(&content).unwrap();
        assert_eq!(config.requester.comparison_signal, ComparisonSignal::Text);
        assert_eq!(config.requester.match_mode, MatchMode::Strict);
        assert_eq!(config.requester.window_capacity, 5);
    }

    #[test]
    fn test_parse_json() {
        let file = write_config("json", r#"{"http": {"timeout_secs": 5, "method": "POST"}}"#);
        let loader = ConfigLoader::new(file.path()).unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        let config = loader.parse(&content).unwrap();
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.requester.window_capacity, 10);
    }

    #[test]
    fn test_save_then_load_yaml() {
        let file = write_config("yaml", "");
        let loader = ConfigLoader::new(file.path()).unwrap();
        let mut config = OracleConfig::default();
        config.requester.window_capacity = 7;
        loader.save_config(&config).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let parsed = loader.parse(&content).unwrap();
        assert_eq!(parsed.requester.window_capacity, 7);
    }
}
