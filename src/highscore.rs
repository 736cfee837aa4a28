//! Best score persisted across sessions as `{"high_score": N}`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::GameState;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stored high score. Missing or unreadable files count as 0.
    pub fn load(&self) -> u32 {
        let Ok(bytes) = fs::read(&self.path) else {
            log::info!("no high score at {}", self.path.display());
            return 0;
        };
        match serde_json::from_slice::<HighScoreFile>(&bytes) {
            Ok(file) => file.high_score,
            Err(e) => {
                log::warn!("ignoring corrupt high score file {}: {}", self.path.display(), e);
                0
            }
        }
    }

    pub fn save(&self, high_score: u32) -> Result<()> {
        let text = serde_json::to_string(&HighScoreFile { high_score })?;
        fs::write(&self.path, text)
            .with_context(|| format!("write high score {}", self.path.display()))?;
        log::debug!("high score {} saved", high_score);
        Ok(())
    }

    /// Write the session's high score if it changed since the last sync.
    ///
    /// Returns true when a new value was written. Write failures are logged.
    pub fn sync(&self, game: &mut GameState) -> bool {
        let Some(high_score) = game.take_high_score_update() else {
            return false;
        };
        match self.save(high_score) {
            Ok(()) => true,
            Err(e) => {
                log::error!("{:#}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameAction;

    fn scratch_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "blockfall-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_is_zero() {
        let store = HighScoreStore::new(scratch_path("hs-missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("hs-save");
        let store = HighScoreStore::new(&path);
        store.save(12_345).unwrap();
        assert_eq!(store.load(), 12_345);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"high_score":12345}"#);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_is_zero() {
        let path = scratch_path("hs-corrupt");
        fs::write(&path, "high score: lots").unwrap();
        assert_eq!(HighScoreStore::new(&path).load(), 0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_sync_writes_new_best_mid_game() {
        let path = scratch_path("hs-sync");
        let store = HighScoreStore::new(&path);
        let mut game = GameState::with_high_score(3, 10);
        game.start();
        assert!(!store.sync(&mut game));
        assert_eq!(store.load(), 0);

        assert!(game.apply_action(GameAction::HardDrop));
        assert!(game.high_score() > 10);
        assert!(store.sync(&mut game));
        assert!(!game.game_over());
        assert_eq!(store.load(), game.high_score());

        // Nothing new to write.
        assert!(!store.sync(&mut game));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let store = HighScoreStore::new(
            std::env::temp_dir()
                .join(format!("blockfall-nodir-{}", std::process::id()))
                .join("highscore.json"),
        );
        assert!(store.save(1).is_err());
    }
}
