use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::log;

#[derive(Debug)]
pub enum HighScoreError {
    IoError(std::io::Error),
    SerializeError(serde_yaml_ng::Error),
}

impl fmt::Display for HighScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighScoreError::IoError(e) => write!(f, "High score file error: {}", e),
            HighScoreError::SerializeError(e) => write!(f, "High score format error: {}", e),
        }
    }
}

impl std::error::Error for HighScoreError {}

impl From<std::io::Error> for HighScoreError {
    fn from(e: std::io::Error) -> Self {
        HighScoreError::IoError(e)
    }
}

impl From<serde_yaml_ng::Error> for HighScoreError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        HighScoreError::SerializeError(e)
    }
}

/// One row of the ranking table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScore {
    pub rank: usize,
    pub name: String,
    pub score: u64,
}

impl fmt::Display for HighScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}: {}", self.rank, self.name, self.score)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PlayerRecord {
    name: String,
    highest_score: u64,
}

/// Best score per player, kept in a YAML file and rewritten on every change.
pub struct HighScoreStore {
    path: PathBuf,
    players: Vec<PlayerRecord>,
}

impl HighScoreStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HighScoreError> {
        let path = path.as_ref().to_path_buf();

        let players = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => vec![],
            Ok(content) => serde_yaml_ng::from_str(&content)?,
            Err(err) if err.kind() == ErrorKind::NotFound => vec![],
            Err(err) => return Err(err.into()),
        };

        Ok(HighScoreStore { path, players })
    }

    /// Registers the player with a zero score. Existing records are kept.
    pub fn create_user(&mut self, name: &str) -> Result<(), HighScoreError> {
        if name.is_empty() || self.find(name).is_some() {
            return Ok(());
        }

        self.players.push(PlayerRecord { name: name.to_string(), highest_score: 0 });
        self.save()
    }

    pub fn update_highest_score(&mut self, name: &str, score: u64) -> Result<(), HighScoreError> {
        if name.is_empty() {
            return Ok(());
        }

        match self.players.iter_mut().find(|p| p.name == name) {
            Some(record) if record.highest_score >= score => return Ok(()),
            Some(record) => record.highest_score = score,
            None => self.players.push(PlayerRecord { name: name.to_string(), highest_score: score }),
        }

        log!("New highest score for {}: {}", name, score);
        self.save()
    }

    pub fn highest_score(&self, name: &str) -> Option<u64> {
        self.find(name).map(|p| p.highest_score)
    }

    pub fn highest_scores(&self, limit: usize) -> Vec<HighScore> {
        let mut sorted: Vec<&PlayerRecord> = self.players.iter().collect();
        sorted.sort_by(|a, b| b.highest_score.cmp(&a.highest_score).then_with(|| a.name.cmp(&b.name)));

        sorted
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, p)| HighScore { rank: i + 1, name: p.name.clone(), score: p.highest_score })
            .collect()
    }

    fn find(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.name == name)
    }

    fn save(&self) -> Result<(), HighScoreError> {
        let content = serde_yaml_ng::to_string(&self.players)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("torus_snake_{}_{}.yaml", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let path = temp_path("scores_missing");
        let store = HighScoreStore::open(&path).unwrap();
        assert!(store.highest_scores(10).is_empty());
        assert_eq!(store.highest_score("nobody"), None);
    }

    #[test]
    fn test_create_user_does_not_overwrite() {
        let path = temp_path("scores_create");
        let mut store = HighScoreStore::open(&path).unwrap();

        store.create_user("ana").unwrap();
        assert_eq!(store.highest_score("ana"), Some(0));

        store.update_highest_score("ana", 12).unwrap();
        store.create_user("ana").unwrap();
        assert_eq!(store.highest_score("ana"), Some(12));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_update_keeps_maximum() {
        let path = temp_path("scores_max");
        let mut store = HighScoreStore::open(&path).unwrap();

        store.update_highest_score("bo", 8).unwrap();
        store.update_highest_score("bo", 3).unwrap();
        assert_eq!(store.highest_score("bo"), Some(8));
        store.update_highest_score("bo", 20).unwrap();
        assert_eq!(store.highest_score("bo"), Some(20));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_name_is_not_recorded() {
        let path = temp_path("scores_anonymous");
        let mut store = HighScoreStore::open(&path).unwrap();

        store.create_user("").unwrap();
        store.update_highest_score("", 50).unwrap();
        assert!(store.highest_scores(10).is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_ranking_is_sorted_and_limited() {
        let path = temp_path("scores_ranking");
        let mut store = HighScoreStore::open(&path).unwrap();

        store.update_highest_score("cy", 5).unwrap();
        store.update_highest_score("ana", 9).unwrap();
        store.update_highest_score("bo", 9).unwrap();
        store.update_highest_score("dee", 1).unwrap();

        let top = store.highest_scores(3);
        assert_eq!(top, vec![
            HighScore { rank: 1, name: "ana".to_string(), score: 9 },
            HighScore { rank: 2, name: "bo".to_string(), score: 9 },
            HighScore { rank: 3, name: "cy".to_string(), score: 5 },
        ]);
        assert_eq!(top[0].to_string(), "1. ana: 9");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_scores_survive_reopen() {
        let path = temp_path("scores_reopen");
        {
            let mut store = HighScoreStore::open(&path).unwrap();
            store.update_highest_score("ana", 14).unwrap();
        }

        let store = HighScoreStore::open(&path).unwrap();
        assert_eq!(store.highest_score("ana"), Some(14));

        std::fs::remove_file(&path).unwrap();
    }
}
