use std::fmt;

use crate::config::ConfigError;
use crate::high_score::HighScoreError;

#[derive(Debug)]
pub enum SnakeError {
    Terminal(crossterm::ErrorKind),
    Config(ConfigError),
    HighScore(HighScoreError),
    Logger(std::io::Error),
    TerminalTooSmall { needed: (u16, u16), available: (u16, u16) },
    InvalidField(u16),
}

impl fmt::Display for SnakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnakeError::Terminal(e) => write!(f, "Terminal error: {}", e),
            SnakeError::Config(e) => write!(f, "{}", e),
            SnakeError::HighScore(e) => write!(f, "{}", e),
            SnakeError::Logger(e) => write!(f, "Failed to open log file: {}", e),
            SnakeError::TerminalTooSmall { needed, available } => write!(
                f,
                "Terminal too small: need {}x{}, have {}x{}",
                needed.0, needed.1, available.0, available.1
            ),
            SnakeError::InvalidField(size) => write!(f, "Invalid field size: {}", size),
        }
    }
}

impl std::error::Error for SnakeError {}

impl From<crossterm::ErrorKind> for SnakeError {
    fn from(e: crossterm::ErrorKind) -> Self {
        SnakeError::Terminal(e)
    }
}

impl From<ConfigError> for SnakeError {
    fn from(e: ConfigError) -> Self {
        SnakeError::Config(e)
    }
}

impl From<HighScoreError> for SnakeError {
    fn from(e: HighScoreError) -> Self {
        SnakeError::HighScore(e)
    }
}
