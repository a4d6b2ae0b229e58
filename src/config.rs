use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::Result;

pub const DEFAULT_FRAME_MS: u64 = 16;

/// Player preferences. Round rules are fixed and not configurable here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Ring the terminal bell on misses.
    pub sound: bool,
    /// Ring on every panel activation too.
    pub activation_cue: bool,
    /// Particle burst on hits.
    pub effects: bool,
    /// Redraw interval of the terminal loop.
    pub frame_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sound: true,
            activation_cue: true,
            effects: true,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_load(&self) -> Result<Config> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice::<Config>(&bytes)?)
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files fall back to defaults.
    fn load(&self) -> Config {
        match self.try_load() {
            Ok(cfg) => cfg,
            Err(crate::error::GameError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Config::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring config file");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
