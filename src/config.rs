use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game::{Level, ScoringPolicy};

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(serde_yaml_ng::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(e) => write!(f, "Config validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        ConfigError::ParseError(e)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: u16,
    pub base_interval_ms: u64,
    pub level: Level,
    pub scoring: ScoringPolicy,
    pub player_name: String,
    pub high_score_file: String,
    pub high_score_limit: usize,
    pub log_file: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            grid_size: 20,
            base_interval_ms: 250,
            level: Level::Easy,
            scoring: ScoringPolicy::GrowthOnly,
            player_name: String::new(),
            high_score_file: "snake_scores.yaml".to_string(),
            high_score_limit: 10,
            log_file: None,
        }
    }
}

impl GameConfig {
    pub fn base_interval(&self) -> Duration {
        Duration::from_millis(self.base_interval_ms)
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < 5 || self.grid_size > 60 {
            return Err("Grid size must be between 5 and 60".to_string());
        }
        if self.base_interval_ms < 20 || self.base_interval_ms > 5000 {
            return Err("Base interval must be between 20ms and 5000ms".to_string());
        }
        if self.high_score_limit < 1 || self.high_score_limit > 100 {
            return Err("High score limit must be between 1 and 100".to_string());
        }
        Ok(())
    }
}

/// Reads the YAML config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let config = match std::fs::read_to_string(path) {
        Ok(content) => serde_yaml_ng::from_str::<GameConfig>(&content)?,
        Err(err) if err.kind() == ErrorKind::NotFound => GameConfig::default(),
        Err(err) => return Err(err.into()),
    };

    config.validate().map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &GameConfig) -> Result<(), ConfigError> {
    config.validate().map_err(ConfigError::Invalid)?;
    let content = serde_yaml_ng::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("torus_snake_{}_{}.yaml", name, std::process::id()))
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_path("missing_config");
        let _ = std::fs::remove_file(&path);
        assert_eq!(load_config(&path).unwrap(), GameConfig::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let path = temp_path("partial_config");
        std::fs::write(&path, "grid_size: 30\nlevel: hard\nscoring: full_length\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.grid_size, 30);
        assert_eq!(config.level, Level::Hard);
        assert_eq!(config.scoring, ScoringPolicy::FullLength);
        assert_eq!(config.base_interval_ms, 250);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let path = temp_path("invalid_config");
        std::fs::write(&path, "grid_size: 2\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "grid_size: [oops\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::ParseError(_))));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved_config");
        let config = GameConfig {
            player_name: "ana".to_string(),
            level: Level::Medium,
            log_file: Some("snake.log".to_string()),
            ..GameConfig::default()
        };

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_rejects_invalid_config() {
        let path = temp_path("rejected_config");
        let config = GameConfig { base_interval_ms: 1, ..GameConfig::default() };
        assert!(matches!(save_config(&path, &config), Err(ConfigError::Invalid(_))));
        assert!(!path.exists());
    }
}
