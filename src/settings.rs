//! Player settings and the data directory.
//!
//! Everything blockfall writes lives in one directory: `$BLOCKFALL_HOME` if set,
//! otherwise `~/.blockfall`. Settings are plain JSON; missing fields take their
//! defaults so older files keep loading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::GameConfig;
use crate::input::DEFAULT_KEY_RELEASE_TIMEOUT_MS;
use crate::types::{DEFAULT_ARR_MS, DEFAULT_DAS_MS, INITIAL_LEVEL, MAX_LEVEL};

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("BLOCKFALL_HOME") {
            return Self::new(explicit);
        }
        let root = std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".blockfall"))
            .unwrap_or_else(|| PathBuf::from(".blockfall"));
        Self::new(root)
    }

    /// Create the directory if needed.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create data directory {}", self.root.display()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn highscore_path(&self) -> PathBuf {
        self.root.join("highscore.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("blockfall.log")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed piece sequence seed; a clock-derived seed is used when absent
    pub seed: Option<u32>,
    pub start_level: u32,
    /// Delay before a held left/right key starts repeating
    pub das_ms: u32,
    /// Interval between repeats
    pub arr_ms: u32,
    /// Held keys are released after this long without a press, for terminals
    /// that never report key releases
    pub key_release_timeout_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            start_level: INITIAL_LEVEL,
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }
}

impl Settings {
    pub fn sanitized(mut self) -> Self {
        self.start_level = self.start_level.clamp(1, MAX_LEVEL);
        self.arr_ms = self.arr_ms.max(1);
        self
    }

    /// Read settings from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("read settings {}", path.display()))
            }
        };
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parse settings {}", path.display()))?;
        Ok(settings.sanitized())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("write settings {}", path.display()))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            initial_level: self.start_level,
            ..GameConfig::default()
        }
        .sanitized()
    }

    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(clock_seed)
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
